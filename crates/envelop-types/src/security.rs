//! # Envelope Signing
//!
//! Stateless HMAC-SHA256 signer and verifier over
//! [`Envelope::signature_payload`].
//!
//! ## Security Properties
//!
//! - **Integrity and authenticity only**: a shared secret proves who produced
//!   the signed fields and that they were not altered. Nothing is encrypted.
//! - **Constant-time comparison**: stored and recomputed signatures are compared
//!   with `subtle`, so verification time does not leak matching prefixes.
//! - **Wire format**: lowercase hex, 64 characters.

use hmac::digest::{Key, KeyInit};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::envelope::Envelope;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded signature.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// Signs an arbitrary payload, returning the lowercase hex digest.
pub fn sign_payload(payload: &[u8], secret: &[u8]) -> String {
    let mut mac = keyed_mac(secret);
    Mac::update(&mut mac, payload);
    hex::encode(mac.finalize().into_bytes())
}

/// HMAC keyed with `secret` reduced to one SHA-256 block.
///
/// Keys longer than the block are hashed first and shorter ones are
/// zero-padded, as HMAC prescribes, so every secret length is accepted.
fn keyed_mac(secret: &[u8]) -> HmacSha256 {
    let mut key = Key::<HmacSha256>::default();
    if secret.len() > key.len() {
        let digest = <Sha256 as Digest>::digest(secret);
        key[..digest.len()].copy_from_slice(&digest);
    } else {
        key[..secret.len()].copy_from_slice(secret);
    }
    <HmacSha256 as KeyInit>::new(&key)
}

/// Computes the signature of an envelope under `secret`.
///
/// The envelope is not modified; attach the result with
/// [`Envelope::with_signature`] or through the builder.
pub fn sign(envelope: &Envelope, secret: impl AsRef<[u8]>) -> String {
    sign_payload(envelope.signature_payload().as_bytes(), secret.as_ref())
}

/// Checks an envelope's stored signature against `secret`.
///
/// # Returns
///
/// - `false` if the signature is absent or empty
/// - `false` if it does not match, whatever its shape
/// - `true` only if it equals the recomputed digest
pub fn verify(envelope: &Envelope, secret: &[u8]) -> bool {
    let Some(stored) = envelope.signature().filter(|s| !s.is_empty()) else {
        debug!(envelope_id = %envelope.id(), "Envelope carries no signature");
        return false;
    };
    let expected = sign_payload(envelope.signature_payload().as_bytes(), secret);
    let matches = constant_time_compare(&expected, stored);
    if !matches {
        debug!(envelope_id = %envelope.id(), "Signature mismatch");
    }
    matches
}

/// Constant-time string comparison.
///
/// Both inputs are padded to the longer length with different fill bytes, so
/// the time taken does not depend on where the first mismatch is.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    let max_len = std::cmp::max(a.len(), b.len());

    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];

    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);

    (lengths_equal & contents_equal).into()
}

// =============================================================================
// TESTS
// =============================================================================
