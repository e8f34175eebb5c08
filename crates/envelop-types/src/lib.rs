//! # Envelop Types
//!
//! The envelope value object and everything needed to reproduce its bytes:
//!
//! - [`Envelope`]: immutable record of identity, routing, payload and the
//!   optional signature/expiry metadata.
//! - [`canonical`]: the fixed JSON and timestamp rendering shared across
//!   implementations.
//! - [`security`]: HMAC-SHA256 signing and constant-time verification over
//!   the signature payload.
//!
//! ## Design Principles
//!
//! - **Immutable values**: an envelope is never mutated after construction.
//! - **Byte-exact rendering**: field order, null handling and escaping are
//!   fixed, because any divergence breaks signature verification.

pub mod body;
pub mod canonical;
pub mod envelope;
pub mod errors;
pub mod headers;
pub mod security;

pub use body::Body;
pub use envelope::{Envelope, EnvelopeParts, DEFAULT_VERSION, FIELD_ORDER, PAYLOAD_SEPARATOR};
pub use errors::{EnvelopeError, Result};
pub use headers::Headers;
pub use security::{sign, verify};
