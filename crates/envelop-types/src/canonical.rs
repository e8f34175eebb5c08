//! # Canonical Rendering
//!
//! The one textual rendering shared by every producer and consumer:
//!
//! - JSON is compact, keys stay in insertion order, `/` and non-ASCII code
//!   points are emitted literally.
//! - Timestamps are RFC 3339 with a numeric offset and no fractional seconds,
//!   e.g. `2024-01-15T10:30:00+00:00`.

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde_json::Value;

use crate::errors::{EnvelopeError, Result};

/// `strftime` pattern of the canonical timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Renders a JSON value in canonical form.
///
/// `serde_json` never escapes `/` and writes non-ASCII characters as UTF-8,
/// so its compact writer already produces the canonical form. Object key order
/// is preserved by the `preserve_order` feature.
#[must_use]
pub fn render_json(value: &Value) -> String {
    value.to_string()
}

/// Renders a timestamp in canonical form.
#[must_use]
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses an RFC 3339 timestamp, dropping any fractional seconds.
pub fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text.trim())
        .map(truncate_to_seconds)
        .map_err(|e| EnvelopeError::MalformedEnvelope(format!("invalid created '{text}': {e}")))
}

/// Drops sub-second precision, which the canonical form cannot carry.
#[must_use]
pub fn truncate_to_seconds(ts: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    ts.with_nanosecond(0).unwrap_or(ts)
}

/// Current UTC time at whole-second precision.
#[must_use]
pub fn now_seconds() -> DateTime<FixedOffset> {
    truncate_to_seconds(Utc::now().fixed_offset())
}
