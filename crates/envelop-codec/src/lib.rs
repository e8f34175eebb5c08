//! # Envelop Codec
//!
//! The encode/decode boundary between envelopes and transportable text.
//!
//! ## Wire Format
//!
//! - `none`: the envelope's canonical JSON text
//! - `gzip`: canonical JSON, gzip level 6, standard padded base64
//!
//! ## Verification Policy
//!
//! Decoding checks the signature only when a secret is supplied. A failed
//! check rejects the envelope only when `signature_required` is set, so
//! untrusted messages can still be decoded for inspection.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use envelop_codec::{decode, encode, Compression, DecodeOptions, EncodeOptions};
//!
//! let wire = encode(&envelope, &EncodeOptions::with_compression(Compression::Gzip))?;
//! let options = DecodeOptions::with_compression(Compression::Gzip)
//!     .verify_with("k1")
//!     .require_signature(true);
//! let received = decode(&wire, &options)?;
//! ```

pub mod codec;
pub mod config;
pub mod options;

pub use codec::{decode, decode_with_report, encode, Decoded, GZIP_LEVEL};
pub use config::{CodecConfig, ConfigError};
pub use options::{Compression, DecodeOptions, EncodeOptions, DEFAULT_MAX_DECOMPRESSED_LEN};
