//! # Interoperability Fixtures
//!
//! Wire text and signatures produced by an independent producer (zlib gzip,
//! a separate HMAC implementation). Decoding them pins the wire format;
//! re-signing pins the signature payload byte for byte.

/// Shared secret behind every signed fixture.
pub const FIXTURE_SECRET: &str = "k1";

/// Signed chat message, canonical JSON.
pub const CHAT_CANONICAL: &str = r#"{"id":"msg-0001","type":"chat.message","version":"1.0","created":"2024-01-15T10:30:00+00:00","trace":"trace-9","reference":null,"sender":"alice","receiver":"bob","headers":{"x-priority":"high"},"body":"hello, world","content":"text/plain","ttl":300,"reply":null,"signature":"b902de838d89d1d0fcbdd058fcb7fd210b2b1a8947f7d973e0398ebc94d4b413"}"#;

/// [`CHAT_CANONICAL`] gzipped (level 6, zero mtime) and base64 encoded.
pub const CHAT_GZIP: &str = "H4sIAAAAAAAAAz2OQY7DIAxFrzJiO0nHJKkSco5eALCTIFGIgHYaVb37mCxmg+Xnj/3ewqGYxT2vLQBI0Yhy7MTEbrpc7pSzXonpk1J2MfBAXoB7m0gXql876IYWZCuvNwlzDzPAN9S37kra1mVnbRWTRAslCpWGh/eNyBSQEme0d5bOhCX3PJGJhsFGmhNZzG/xavfkYnLl4Onm1k18Gk7h2ZL3sfn6jcljFYyhUCj1OL3Kz+61C9WoeMGSUO/s/vi3cGvQ5ZGqrFHQIU39hJNCibBYgwjXieu4YCfBdEbqSQ3jMqIae4JeTWSsGnAwg+zF5w9PyWSBVQEAAA==";

/// HMAC-SHA256 under [`FIXTURE_SECRET`] of the order fixture's payload.
pub const ORDER_SIGNATURE: &str = "7e0a87cc3ef53a3806c74bcf1a00535e1a062cfb69d5eb5645e15d7244595cc9";

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::DateTime;
    use serde_json::json;

    use envelop_codec::{decode, encode, Compression, DecodeOptions, EncodeOptions};
    use envelop_types::{sign, Body, Envelope, EnvelopeParts};

    fn required(compression: Compression) -> DecodeOptions {
        DecodeOptions::with_compression(compression)
            .verify_with(FIXTURE_SECRET)
            .require_signature(true)
    }

    #[test]
    fn test_decode_foreign_gzip_wire() {
        let envelope = decode(CHAT_GZIP, &required(Compression::Gzip)).unwrap();

        assert_eq!(envelope.id(), "msg-0001");
        assert_eq!(envelope.trace(), Some("trace-9"));
        assert_eq!(envelope.reference(), None);
        assert_eq!(envelope.headers().get("x-priority"), Some("high"));
        assert_eq!(envelope.body().as_text(), Some("hello, world"));
        assert_eq!(envelope.ttl(), Some(300));
    }

    #[test]
    fn test_foreign_canonical_text_reencodes_identically() {
        let envelope = decode(CHAT_CANONICAL, &required(Compression::None)).unwrap();
        let wire = encode(&envelope, &EncodeOptions::default()).unwrap();
        assert_eq!(wire, CHAT_CANONICAL);
    }

    #[test]
    fn test_gzip_wire_tolerates_surrounding_whitespace() {
        let padded = format!("  {CHAT_GZIP}\n");
        assert!(decode(&padded, &required(Compression::Gzip)).is_ok());
    }

    #[test]
    fn test_signature_matches_foreign_producer() {
        // Non-UTC offset, structured body with non-ASCII text and a slash.
        let created = DateTime::parse_from_rfc3339("2024-03-01T08:00:00+02:00").unwrap();
        let mut parts = EnvelopeParts::new("order-7", "order.created", created);
        parts.reference = Some("ref-1".into());
        parts.sender = Some("shop".into());
        parts.receiver = Some("billing".into());
        parts.body = Body::Structured(json!({"sku": "A-1", "qty": 2, "note": "ünïcode/ok"}));
        let envelope = Envelope::from_parts(parts);

        assert_eq!(
            envelope.signature_payload(),
            r#"order-7|order.created|1.0|2024-03-01T08:00:00+02:00||ref-1|shop|billing|[]|{"sku":"A-1","qty":2,"note":"ünïcode/ok"}"#
        );
        assert_eq!(sign(&envelope, FIXTURE_SECRET), ORDER_SIGNATURE);
    }
}
