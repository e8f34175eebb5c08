//! # Envelope Codec
//!
//! Converts envelopes to and from transportable text.
//!
//! ```text
//! encode: Envelope -> canonical text -> [gzip -> base64] -> wire
//! decode: wire -> [base64 -> gunzip] -> canonical text -> Envelope -> [verify]
//! ```
//!
//! Both directions are stateless; identical inputs and options always give
//! identical results.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::{debug, warn};

use envelop_types::{Envelope, EnvelopeError, Result};

use crate::options::{Compression, DecodeOptions, EncodeOptions};

/// Gzip level used on the wire.
pub const GZIP_LEVEL: u32 = 6;

/// A decoded envelope plus the signature check outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub envelope: Envelope,
    /// `None` when no secret was supplied.
    pub verified: Option<bool>,
}

/// Encodes an envelope for transport.
///
/// The result is always printable text: canonical JSON, or base64 of the
/// gzip-compressed canonical JSON.
pub fn encode(envelope: &Envelope, options: &EncodeOptions) -> Result<String> {
    let text = envelope.to_canonical_text();

    let wire = match options.compression {
        Compression::None => text,
        Compression::Gzip => STANDARD.encode(gzip(text.as_bytes())?),
    };

    debug!(
        envelope_id = %envelope.id(),
        compression = %options.compression,
        bytes = wire.len(),
        "Envelope encoded"
    );

    Ok(wire)
}

/// Decodes wire text into an envelope, enforcing the signature policy.
pub fn decode(wire: &str, options: &DecodeOptions) -> Result<Envelope> {
    decode_with_report(wire, options).map(|decoded| decoded.envelope)
}

/// Like [`decode`], but also reports whether the signature checked out.
///
/// # Errors
///
/// - `InvalidEncoding` if gzip wire text is not valid base64
/// - `DecompressionFailed` if the gzip stream is corrupt
/// - `MalformedEnvelope` if the text is not an envelope object
/// - `SignatureInvalid` if a signature is required and does not verify
pub fn decode_with_report(wire: &str, options: &DecodeOptions) -> Result<Decoded> {
    let text = match options.compression {
        Compression::None => wire.to_string(),
        Compression::Gzip => {
            let raw = STANDARD
                .decode(wire.trim())
                .map_err(|e| EnvelopeError::InvalidEncoding(e.to_string()))?;
            gunzip(&raw, options.max_decompressed_len)?
        }
    };

    let envelope = Envelope::from_canonical_text(&text)?;

    let verified = match options.verify_with_secret.as_deref() {
        Some(secret) => {
            let ok = envelope.check_signature(secret);
            if !ok && options.signature_required {
                warn!(
                    envelope_id = %envelope.id(),
                    signed = envelope.is_signed(),
                    "Rejecting envelope: signature missing or invalid"
                );
                return Err(EnvelopeError::SignatureInvalid);
            }
            if !ok {
                debug!(
                    envelope_id = %envelope.id(),
                    "Signature did not verify; accepted because it is not required"
                );
            }
            Some(ok)
        }
        None => {
            if options.signature_required {
                warn!(
                    envelope_id = %envelope.id(),
                    "Signature required but no secret supplied; signature not checked"
                );
            }
            None
        }
    };

    debug!(
        envelope_id = %envelope.id(),
        compression = %options.compression,
        verified = ?verified,
        "Envelope decoded"
    );

    Ok(Decoded { envelope, verified })
}

fn gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::new(GZIP_LEVEL));
    encoder
        .write_all(bytes)
        .map_err(|e| EnvelopeError::CompressionFailed(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| EnvelopeError::CompressionFailed(e.to_string()))
}

fn gunzip(bytes: &[u8], limit: usize) -> Result<String> {
    // One byte past the limit is enough to tell an oversized stream apart.
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .take(cap)
        .read_to_end(&mut out)
        .map_err(|e| EnvelopeError::DecompressionFailed(e.to_string()))?;
    if out.len() > limit {
        return Err(EnvelopeError::DecompressionFailed(format!(
            "decompressed text exceeds {limit} bytes"
        )));
    }
    String::from_utf8(out)
        .map_err(|e| EnvelopeError::MalformedEnvelope(format!("decompressed text is not UTF-8: {e}")))
}
