//! # Error Types
//!
//! Every failure the envelope core can report. Nothing is retried internally;
//! each variant is terminal for the call that produced it.

use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, EnvelopeError>;

/// Errors raised while building, encoding or decoding envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// Compression kind not understood by the codec.
    #[error("Unsupported compression: {0}")]
    UnsupportedCompression(String),

    /// Gzip writer failed while encoding.
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    /// Wire payload is not valid base64.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Gzip inflate failed while decoding.
    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    /// Canonical text could not be parsed into an envelope.
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Signature required but missing or not matching.
    #[error("Signature missing or invalid")]
    SignatureInvalid,

    /// Attachment source could not be read.
    #[error("Failed to read attachment {path}: {reason}")]
    AttachmentReadFailed { path: String, reason: String },
}

impl EnvelopeError {
    /// Stable tag for logs and process exit reporting.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            EnvelopeError::UnsupportedCompression(_) => "unsupported_compression",
            EnvelopeError::CompressionFailed(_) => "compression_failed",
            EnvelopeError::InvalidEncoding(_) => "invalid_encoding",
            EnvelopeError::DecompressionFailed(_) => "decompression_failed",
            EnvelopeError::MalformedEnvelope(_) => "malformed_envelope",
            EnvelopeError::SignatureInvalid => "signature_invalid",
            EnvelopeError::AttachmentReadFailed { .. } => "attachment_read_failed",
        }
    }
}
