//! # Codec Configuration
//!
//! Process-wide defaults for the codec, read from the environment.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ENVELOP_COMPRESSION` | `none` | `none` or `gzip` |
//! | `ENVELOP_SECRET` | unset | Shared HMAC secret |
//! | `ENVELOP_SIGNATURE_REQUIRED` | `false` | Reject unsigned or mismatched envelopes |
//!
//! ## Security Requirements
//!
//! - A secret MUST be configured when signatures are required
//! - Secrets shorter than [`MIN_SECRET_LEN`] bytes are refused for production

use std::env;

use thiserror::Error;

use envelop_types::EnvelopeError;

use crate::options::{Compression, DecodeOptions, EncodeOptions};

/// Minimum secret length accepted by [`CodecConfig::validate_for_production`].
pub const MIN_SECRET_LEN: usize = 16;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A configured value could not be parsed.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// Signatures are required but no secret is configured.
    #[error(
        "SECURITY VIOLATION: signatures are required but no secret is set. \
         Set ENVELOP_SECRET or provide one in config."
    )]
    MissingSecret,

    /// Secret too short to be trusted.
    #[error("SECURITY VIOLATION: secret is {len} bytes, need at least {}", MIN_SECRET_LEN)]
    InsecureSecret { len: usize },
}

/// Codec configuration.
#[derive(Clone, Default)]
pub struct CodecConfig {
    /// Compression used for encoding and expected when decoding.
    pub compression: Compression,
    /// Shared HMAC secret for signing and verification.
    pub secret: Option<String>,
    /// Whether decoding fails on missing or mismatched signatures.
    pub signature_required: bool,
}

impl CodecConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let compression = match lookup("ENVELOP_COMPRESSION") {
            Some(value) => value.parse::<Compression>()?,
            None => Compression::None,
        };

        let secret = lookup("ENVELOP_SECRET").filter(|s| !s.is_empty());

        let signature_required = lookup("ENVELOP_SIGNATURE_REQUIRED")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            compression,
            secret,
            signature_required,
        })
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - signatures are required but no secret is configured
    /// - the secret is shorter than [`MIN_SECRET_LEN`] bytes
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        match &self.secret {
            None if self.signature_required => Err(ConfigError::MissingSecret),
            Some(secret) if secret.len() < MIN_SECRET_LEN => {
                Err(ConfigError::InsecureSecret { len: secret.len() })
            }
            _ => Ok(()),
        }
    }

    /// Encode options derived from this configuration.
    #[must_use]
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions::with_compression(self.compression)
    }

    /// Decode options derived from this configuration.
    #[must_use]
    pub fn decode_options(&self) -> DecodeOptions {
        let mut options = DecodeOptions::with_compression(self.compression)
            .require_signature(self.signature_required);
        if let Some(secret) = &self.secret {
            options = options.verify_with(secret);
        }
        options
    }
}

impl std::fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecConfig")
            .field("compression", &self.compression)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("signature_required", &self.signature_required)
            .finish()
    }
}
