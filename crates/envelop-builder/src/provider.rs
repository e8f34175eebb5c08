//! # Identity and Time Providers
//!
//! The builder draws the envelope id and creation time from a provider
//! instead of ambient globals, so fixtures can pin both and produce stable
//! signatures.

use chrono::{DateTime, FixedOffset, Utc};
use uuid::Uuid;

/// Source of envelope ids and creation timestamps.
pub trait IdentityProvider: Send + Sync {
    /// Returns a fresh unique identifier.
    fn new_id(&self) -> String;

    /// Returns the current time.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Random UUID v4 ids and the system clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIdentity;

impl IdentityProvider for SystemIdentity {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().fixed_offset()
    }
}

/// Returns the same id and time on every call. For tests and fixtures.
#[derive(Debug, Clone)]
pub struct FixedIdentity {
    id: String,
    now: DateTime<FixedOffset>,
}

impl FixedIdentity {
    pub fn new(id: impl Into<String>, now: DateTime<FixedOffset>) -> Self {
        Self { id: id.into(), now }
    }
}

impl IdentityProvider for FixedIdentity {
    fn new_id(&self) -> String {
        self.id.clone()
    }

    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }
}
