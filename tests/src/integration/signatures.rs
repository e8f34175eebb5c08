//! # Signature Coverage
//!
//! Every covered field changes the signature; uncovered fields do not.

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration};
    use proptest::prelude::*;
    use serde_json::json;

    use envelop_types::{sign, Body, Envelope, EnvelopeParts};

    const SECRET: &[u8] = b"k1";

    fn base_parts() -> EnvelopeParts {
        let created = DateTime::parse_from_rfc3339("2024-01-15T10:30:00+00:00").unwrap();
        let mut parts = EnvelopeParts::new("msg-1", "chat.message", created);
        parts.trace = Some("t".into());
        parts.reference = Some("r".into());
        parts.sender = Some("a".into());
        parts.receiver = Some("b".into());
        parts.headers.insert("x-a", "1");
        parts.body = Body::Text("hi".into());
        parts
    }

    fn signed(parts: EnvelopeParts) -> Envelope {
        let envelope = Envelope::from_parts(parts);
        let signature = sign(&envelope, SECRET);
        envelope.with_signature(signature)
    }

    type Mutation = (&'static str, fn(&mut EnvelopeParts));

    fn bump_id(p: &mut EnvelopeParts) {
        p.id = "msg-2".into();
    }
    fn change_type(p: &mut EnvelopeParts) {
        p.kind = "chat.edit".into();
    }
    fn change_version(p: &mut EnvelopeParts) {
        p.version = "2.0".into();
    }
    fn shift_created(p: &mut EnvelopeParts) {
        p.created += Duration::seconds(1);
    }
    fn drop_trace(p: &mut EnvelopeParts) {
        p.trace = None;
    }
    fn change_reference(p: &mut EnvelopeParts) {
        p.reference = Some("r2".into());
    }
    fn spoof_sender(p: &mut EnvelopeParts) {
        p.sender = Some("mallory".into());
    }
    fn redirect_receiver(p: &mut EnvelopeParts) {
        p.receiver = Some("eve".into());
    }
    fn edit_header(p: &mut EnvelopeParts) {
        p.headers.insert("x-a", "2");
    }
    fn edit_body(p: &mut EnvelopeParts) {
        p.body = Body::Structured(json!({"text": "hi"}));
    }

    const COVERED: [Mutation; 10] = [
        ("id", bump_id),
        ("type", change_type),
        ("version", change_version),
        ("created", shift_created),
        ("trace", drop_trace),
        ("reference", change_reference),
        ("sender", spoof_sender),
        ("receiver", redirect_receiver),
        ("headers", edit_header),
        ("body", edit_body),
    ];

    #[test]
    fn test_tampering_any_covered_field_breaks_signature() {
        let original = signed(base_parts());
        assert!(original.check_signature(SECRET));

        for (field, mutate) in COVERED {
            let mut parts = original.clone().into_parts();
            mutate(&mut parts);
            let tampered = Envelope::from_parts(parts);
            assert!(tampered.is_signed(), "{field}: signature should be carried over");
            assert!(
                !tampered.check_signature(SECRET),
                "{field}: tampering was not detected"
            );
        }
    }

    #[test]
    fn test_uncovered_fields_keep_signature_valid() {
        let original = signed(base_parts());
        let mut parts = original.into_parts();
        parts.content = Some("application/x-custom".into());
        parts.ttl = Some(5);
        parts.reply = Some("msg-0".into());

        assert!(Envelope::from_parts(parts).check_signature(SECRET));
    }

    #[test]
    fn test_created_offset_is_part_of_signature() {
        // Same instant, different rendering.
        let original = signed(base_parts());
        let mut parts = original.clone().into_parts();
        parts.created = DateTime::parse_from_rfc3339("2024-01-15T12:30:00+02:00").unwrap();
        assert_eq!(parts.created, *original.created());
        assert!(!Envelope::from_parts(parts).check_signature(SECRET));
    }

    proptest! {
        #[test]
        fn prop_signature_tracks_body_text(a in ".{0,64}", b in ".{0,64}") {
            prop_assume!(a != b);
            let mut left = base_parts();
            left.body = Body::Text(a);
            let mut right = base_parts();
            right.body = Body::Text(b);
            prop_assert_ne!(
                sign(&Envelope::from_parts(left), SECRET),
                sign(&Envelope::from_parts(right), SECRET)
            );
        }
    }
}
