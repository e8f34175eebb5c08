//! # End-to-end Flows
//!
//! A producer builds and seals an envelope, a consumer opens it under its
//! own decode policy.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::{DateTime, Duration, FixedOffset};
    use serde_json::json;

    use envelop_builder::{EnvelopeBuilder, FixedIdentity, FILENAME_HEADER, LINK_CONTENT_TYPE};
    use envelop_codec::{decode, decode_with_report, encode, Compression, DecodeOptions, EncodeOptions};
    use envelop_types::{Body, EnvelopeError};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn at(ts: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(ts).unwrap()
    }

    fn gzip_options(secret: &str) -> DecodeOptions {
        DecodeOptions::with_compression(Compression::Gzip)
            .verify_with(secret)
            .require_signature(true)
    }

    fn chat_message() -> EnvelopeBuilder {
        let identity = FixedIdentity::new("msg-42", at("2024-01-15T10:30:00+00:00"));
        EnvelopeBuilder::with_provider(&identity)
            .kind("chat.message")
            .sender("a")
            .receiver("b")
            .body("hi")
    }

    // =============================================================================
    // SEAL AND OPEN
    // =============================================================================

    #[test]
    fn test_signed_gzip_chat_message() {
        let sealed = chat_message().sign("k1").build();
        let wire = encode(&sealed, &EncodeOptions::with_compression(Compression::Gzip)).unwrap();
        assert!(wire.is_ascii());
        assert!(!wire.contains('{'));

        let opened = decode(&wire, &gzip_options("k1")).unwrap();
        assert_eq!(opened, sealed);
        assert_eq!(opened.signature(), sealed.signature());
        assert_eq!(opened.body().as_text(), Some("hi"));
        assert_eq!(opened.content(), Some("text/plain"));

        assert_eq!(
            decode(&wire, &gzip_options("wrong")),
            Err(EnvelopeError::SignatureInvalid)
        );
    }

    #[test]
    fn test_wrong_secret_still_decodes_when_not_required() {
        let sealed = chat_message().sign("k1").build();
        let wire = encode(&sealed, &EncodeOptions::default()).unwrap();

        let options = DecodeOptions::default().verify_with("wrong");
        let decoded = decode_with_report(&wire, &options).unwrap();
        assert_eq!(decoded.verified, Some(false));
        assert_eq!(decoded.envelope, sealed);
    }

    #[test]
    fn test_unsigned_rejected_when_signature_required() {
        let unsigned = chat_message().build();
        let wire = encode(&unsigned, &EncodeOptions::default()).unwrap();
        let options = DecodeOptions::default().verify_with("k1").require_signature(true);
        assert_eq!(decode(&wire, &options), Err(EnvelopeError::SignatureInvalid));

        // Without a secret there is nothing to check against.
        let options = DecodeOptions::default().require_signature(true);
        assert_eq!(decode(&wire, &options).unwrap(), unsigned);
    }

    #[test]
    fn test_compression_mismatch_fails() {
        let sealed = chat_message().build();

        let plain = encode(&sealed, &EncodeOptions::default()).unwrap();
        let err = decode(&plain, &DecodeOptions::with_compression(Compression::Gzip)).unwrap_err();
        assert_eq!(err.kind(), "invalid_encoding");

        let packed = encode(&sealed, &EncodeOptions::with_compression(Compression::Gzip)).unwrap();
        let err = decode(&packed, &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.kind(), "malformed_envelope");
    }

    #[test]
    fn test_structured_body_survives_transport() {
        let body = json!({"order": {"id": 7, "lines": [{"sku": "A-1", "qty": 2}]}, "note": "ünïcode/ok"});
        let sealed = chat_message()
            .kind("order.created")
            .body(body.clone())
            .header("x-tenant", "acme")
            .reference("ref-1")
            .trace("trace-1")
            .reply("msg-41")
            .ttl(120)
            .sign("k1")
            .build();

        for compression in [Compression::None, Compression::Gzip] {
            let wire = encode(&sealed, &EncodeOptions::with_compression(compression)).unwrap();
            let options = DecodeOptions::with_compression(compression)
                .verify_with("k1")
                .require_signature(true);
            let opened = decode(&wire, &options).unwrap();

            assert_eq!(opened.body(), &Body::Structured(body.clone()));
            assert_eq!(opened.content(), Some("application/json"));
            assert_eq!(opened.headers().get("x-tenant"), Some("acme"));
            assert_eq!(opened.ttl(), Some(120));
            assert_eq!(opened.reply(), Some("msg-41"));
        }
    }

    // =============================================================================
    // EXPIRY
    // =============================================================================

    #[test]
    fn test_expiry_after_transport() {
        let sealed = chat_message().ttl(60).build();
        let wire = encode(&sealed, &EncodeOptions::default()).unwrap();
        let opened = decode(&wire, &DecodeOptions::default()).unwrap();

        let created = at("2024-01-15T10:30:00+00:00");
        assert!(!opened.is_expired_at(&(created + Duration::seconds(60))));
        assert!(opened.is_expired_at(&(created + Duration::seconds(61))));
        assert!(opened.is_expired());

        let forever = decode(
            &encode(&chat_message().build(), &EncodeOptions::default()).unwrap(),
            &DecodeOptions::default(),
        )
        .unwrap();
        assert!(!forever.is_expired());
    }

    // =============================================================================
    // ATTACHMENTS AND LINKS
    // =============================================================================

    #[test]
    fn test_attachment_round_trip() {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine as _;

        let bytes = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        let mut file = tempfile::Builder::new().suffix(".bin").tempfile().unwrap();
        file.write_all(bytes).unwrap();

        let sealed = chat_message()
            .kind("file.upload")
            .attach(file.path())
            .unwrap()
            .sign("k1")
            .build();
        let wire = encode(&sealed, &EncodeOptions::with_compression(Compression::Gzip)).unwrap();
        let opened = decode(&wire, &gzip_options("k1")).unwrap();

        assert_eq!(opened.content(), Some("image/png"));
        let name = file.path().file_name().unwrap().to_string_lossy();
        assert_eq!(opened.headers().get(FILENAME_HEADER), Some(name.as_ref()));
        let restored = STANDARD.decode(opened.body().as_text().unwrap()).unwrap();
        assert_eq!(restored, bytes);
    }

    #[test]
    fn test_missing_attachment_reports_path() {
        let err = chat_message().attach("/definitely/not/here.txt").unwrap_err();
        assert_eq!(err.kind(), "attachment_read_failed");
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn test_link_round_trip() {
        let sealed = chat_message()
            .link("https://files.example/report.pdf", [("Size", "1024"), ("Checksum", "abc")])
            .build();
        let opened = decode(
            &encode(&sealed, &EncodeOptions::default()).unwrap(),
            &DecodeOptions::default(),
        )
        .unwrap();

        assert_eq!(opened.content(), Some(LINK_CONTENT_TYPE));
        assert_eq!(opened.body().as_text(), Some("https://files.example/report.pdf"));
        assert_eq!(opened.headers().get("x-size"), Some("1024"));
        assert_eq!(opened.headers().get("x-checksum"), Some("abc"));
    }
}
