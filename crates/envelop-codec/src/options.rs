//! # Codec Options
//!
//! Per-call settings for [`encode`](crate::encode) and
//! [`decode`](crate::decode). Decode options must name the same compression
//! the encoder used; the wire text does not say.

use std::fmt;
use std::str::FromStr;

use envelop_types::EnvelopeError;

/// Compression applied to the canonical text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compression {
    /// Canonical text is the wire text.
    #[default]
    None,
    /// Gzip at level 6, then standard padded base64.
    Gzip,
}

impl Compression {
    /// Name used in configuration and on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compression {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Compression::None),
            "gzip" => Ok(Compression::Gzip),
            other => Err(EnvelopeError::UnsupportedCompression(other.to_string())),
        }
    }
}

/// Options for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    pub compression: Compression,
}

impl EncodeOptions {
    /// Options with the given compression.
    #[must_use]
    pub fn with_compression(compression: Compression) -> Self {
        Self { compression }
    }
}

/// Upper bound on decompressed canonical text, in bytes.
pub const DEFAULT_MAX_DECOMPRESSED_LEN: usize = 16 * 1024 * 1024;

/// Options for decoding.
///
/// When `verify_with_secret` is set the signature is checked. A failed check
/// is an error only if `signature_required` is also set; otherwise the
/// outcome is reported but the envelope is still returned.
#[derive(Clone)]
pub struct DecodeOptions {
    pub compression: Compression,
    pub verify_with_secret: Option<Vec<u8>>,
    pub signature_required: bool,
    /// Gzip input inflating past this many bytes is rejected.
    pub max_decompressed_len: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            compression: Compression::None,
            verify_with_secret: None,
            signature_required: false,
            max_decompressed_len: DEFAULT_MAX_DECOMPRESSED_LEN,
        }
    }
}

impl DecodeOptions {
    /// Options with the given compression and no verification.
    #[must_use]
    pub fn with_compression(compression: Compression) -> Self {
        Self {
            compression,
            ..Self::default()
        }
    }

    /// Caps the size of decompressed text.
    #[must_use]
    pub fn max_decompressed_len(mut self, limit: usize) -> Self {
        self.max_decompressed_len = limit;
        self
    }

    /// Verifies signatures with `secret`.
    #[must_use]
    pub fn verify_with(mut self, secret: impl AsRef<[u8]>) -> Self {
        self.verify_with_secret = Some(secret.as_ref().to_vec());
        self
    }

    /// Sets whether a missing or mismatched signature fails the decode.
    #[must_use]
    pub fn require_signature(mut self, required: bool) -> Self {
        self.signature_required = required;
        self
    }
}

impl fmt::Debug for DecodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeOptions")
            .field("compression", &self.compression)
            .field(
                "verify_with_secret",
                &self.verify_with_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("signature_required", &self.signature_required)
            .field("max_decompressed_len", &self.max_decompressed_len)
            .finish()
    }
}
