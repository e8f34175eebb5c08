//! # Envelop Builder
//!
//! Fluent construction of [`Envelope`](envelop_types::Envelope) values.
//!
//! ```rust,ignore
//! use envelop_builder::EnvelopeBuilder;
//!
//! let envelope = EnvelopeBuilder::start()
//!     .kind("chat.message")
//!     .sender("a")
//!     .receiver("b")
//!     .body("hi")
//!     .sign("k1")
//!     .build();
//! ```

pub mod builder;
pub mod mime;
pub mod provider;

pub use builder::{EnvelopeBuilder, FILENAME_HEADER, LINK_CONTENT_TYPE};
pub use provider::{FixedIdentity, IdentityProvider, SystemIdentity};
