//! # Message Envelope
//!
//! The immutable record that carries an application payload between
//! producers and consumers.
//!
//! ## Properties
//!
//! - **Immutable**: fields are read through accessors. Changing a field means
//!   taking the parts out with [`Envelope::into_parts`] and building a new value.
//! - **Canonical**: [`Envelope::to_canonical_text`] renders all 14 fields as a
//!   JSON object in fixed key order, absent fields as explicit `null`.
//! - **Signable**: [`Envelope::signature_payload`] is the byte sequence that
//!   HMAC-SHA256 signatures cover.
//!
//! ## Known limitation
//!
//! The signature payload joins fields with `|` and does not escape it. Two
//! envelopes whose signed fields differ only in where a `|` falls (say
//! `sender = "a|b", receiver = ""` versus `sender = "a", receiver = "b"`)
//! produce the same payload. Escaping would break compatibility with existing
//! signers, so callers that need to rule this out must keep `|` out of the
//! signed fields.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::body::Body;
use crate::canonical::{self, format_timestamp, render_json};
use crate::errors::{EnvelopeError, Result};
use crate::headers::Headers;
use crate::security;

/// Separator between fields of the signature payload.
pub const PAYLOAD_SEPARATOR: char = '|';

/// Protocol version assumed when none is given.
pub const DEFAULT_VERSION: &str = "1.0";

/// Wire keys, in canonical order.
pub const FIELD_ORDER: [&str; 14] = [
    "id",
    "type",
    "version",
    "created",
    "trace",
    "reference",
    "sender",
    "receiver",
    "headers",
    "body",
    "content",
    "ttl",
    "reply",
    "signature",
];

/// Field values of an envelope, open for editing.
///
/// This is the only mutable form. [`Envelope::from_parts`] freezes it.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeParts {
    pub id: String,
    pub kind: String,
    pub version: String,
    pub created: DateTime<FixedOffset>,
    pub trace: Option<String>,
    pub reference: Option<String>,
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub headers: Headers,
    pub body: Body,
    pub content: Option<String>,
    pub ttl: Option<u64>,
    pub reply: Option<String>,
    pub signature: Option<String>,
}

impl EnvelopeParts {
    /// Parts with the required fields set and everything else absent.
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        created: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            version: DEFAULT_VERSION.to_string(),
            created,
            trace: None,
            reference: None,
            sender: None,
            receiver: None,
            headers: Headers::new(),
            body: Body::Empty,
            content: None,
            ttl: None,
            reply: None,
            signature: None,
        }
    }
}

/// The immutable message envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    parts: EnvelopeParts,
}

impl Envelope {
    /// Freezes a set of parts into an envelope.
    ///
    /// `created` is truncated to whole seconds, the precision the canonical
    /// form carries, and the body is normalized, so a decoded copy always
    /// compares equal.
    #[must_use]
    pub fn from_parts(mut parts: EnvelopeParts) -> Self {
        parts.created = canonical::truncate_to_seconds(parts.created);
        parts.body = parts.body.normalized();
        Self { parts }
    }

    /// Releases the fields for building a modified copy.
    #[must_use]
    pub fn into_parts(self) -> EnvelopeParts {
        self.parts
    }

    /// Returns a copy carrying the given signature.
    #[must_use]
    pub fn with_signature(self, signature: impl Into<String>) -> Self {
        let mut parts = self.parts;
        parts.signature = Some(signature.into());
        Self { parts }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn id(&self) -> &str {
        &self.parts.id
    }

    /// Message category, the `type` key on the wire.
    pub fn kind(&self) -> &str {
        &self.parts.kind
    }

    pub fn version(&self) -> &str {
        &self.parts.version
    }

    pub fn created(&self) -> &DateTime<FixedOffset> {
        &self.parts.created
    }

    pub fn trace(&self) -> Option<&str> {
        self.parts.trace.as_deref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.parts.reference.as_deref()
    }

    pub fn sender(&self) -> Option<&str> {
        self.parts.sender.as_deref()
    }

    pub fn receiver(&self) -> Option<&str> {
        self.parts.receiver.as_deref()
    }

    pub fn headers(&self) -> &Headers {
        &self.parts.headers
    }

    pub fn body(&self) -> &Body {
        &self.parts.body
    }

    /// MIME type describing the body.
    pub fn content(&self) -> Option<&str> {
        self.parts.content.as_deref()
    }

    /// Lifetime in seconds from `created`.
    pub fn ttl(&self) -> Option<u64> {
        self.parts.ttl
    }

    /// Id of the envelope this one replies to.
    pub fn reply(&self) -> Option<&str> {
        self.parts.reply.as_deref()
    }

    /// Lowercase hex HMAC-SHA256, when signed.
    pub fn signature(&self) -> Option<&str> {
        self.parts.signature.as_deref()
    }

    /// Returns true if a non-empty signature is attached.
    pub fn is_signed(&self) -> bool {
        self.signature().is_some_and(|s| !s.is_empty())
    }

    // =========================================================================
    // SIGNATURE PAYLOAD
    // =========================================================================

    /// The string covered by the HMAC signature.
    ///
    /// Fields in order: id, type, version, created, trace, reference, sender,
    /// receiver, headers (canonical JSON), body (canonical JSON), joined by
    /// `|`. Absent optional fields contribute an empty string. `content`,
    /// `ttl`, `reply` and `signature` are not covered.
    #[must_use]
    pub fn signature_payload(&self) -> String {
        let p = &self.parts;
        let fields = [
            p.id.clone(),
            p.kind.clone(),
            p.version.clone(),
            format_timestamp(&p.created),
            p.trace.clone().unwrap_or_default(),
            p.reference.clone().unwrap_or_default(),
            p.sender.clone().unwrap_or_default(),
            p.receiver.clone().unwrap_or_default(),
            render_json(&p.headers.to_value()),
            render_json(&p.body.to_value()),
        ];
        fields.join(&PAYLOAD_SEPARATOR.to_string())
    }

    /// Checks the stored signature against `secret`.
    ///
    /// Absent, empty or malformed signatures simply do not match.
    pub fn check_signature(&self, secret: impl AsRef<[u8]>) -> bool {
        security::verify(self, secret.as_ref())
    }

    // =========================================================================
    // EXPIRY
    // =========================================================================

    /// Instant after which the envelope is expired, if it has a TTL.
    pub fn expires_at(&self) -> Option<DateTime<FixedOffset>> {
        let ttl = self.parts.ttl?;
        let secs = i64::try_from(ttl).ok()?;
        self.parts
            .created
            .checked_add_signed(Duration::try_seconds(secs)?)
    }

    /// Expiry against the current clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(&Utc::now())
    }

    /// Returns true iff `now > created + ttl`, at whole-second resolution.
    ///
    /// Never expired without a TTL; not yet expired exactly at the expiry
    /// instant.
    pub fn is_expired_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        let Some(ttl) = self.parts.ttl else {
            return false;
        };
        let expires_at = i128::from(self.parts.created.timestamp()) + i128::from(ttl);
        i128::from(now.timestamp()) > expires_at
    }

    // =========================================================================
    // CANONICAL TEXT
    // =========================================================================

    /// JSON object view with all 14 keys in canonical order.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let p = &self.parts;
        let mut map = Map::new();
        map.insert("id".into(), Value::String(p.id.clone()));
        map.insert("type".into(), Value::String(p.kind.clone()));
        map.insert("version".into(), Value::String(p.version.clone()));
        map.insert("created".into(), Value::String(format_timestamp(&p.created)));
        map.insert("trace".into(), optional(&p.trace));
        map.insert("reference".into(), optional(&p.reference));
        map.insert("sender".into(), optional(&p.sender));
        map.insert("receiver".into(), optional(&p.receiver));
        map.insert("headers".into(), p.headers.to_value());
        map.insert("body".into(), p.body.to_value());
        map.insert("content".into(), optional(&p.content));
        map.insert("ttl".into(), p.ttl.map_or(Value::Null, Value::from));
        map.insert("reply".into(), optional(&p.reply));
        map.insert("signature".into(), optional(&p.signature));
        Value::Object(map)
    }

    /// Canonical JSON text of the whole envelope.
    #[must_use]
    pub fn to_canonical_text(&self) -> String {
        render_json(&self.to_value())
    }

    /// Parses canonical JSON text.
    ///
    /// Fails with `MalformedEnvelope` on invalid JSON or a non-object top level.
    pub fn from_canonical_text(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| EnvelopeError::MalformedEnvelope(e.to_string()))?;
        Self::from_value(value)
    }

    /// Builds an envelope from a decoded JSON object.
    ///
    /// Decoding is lenient: missing `version` becomes `"1.0"`, missing
    /// `created` becomes the current time, unusable `headers` become empty,
    /// and other missing fields are absent. Unknown keys are ignored.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(EnvelopeError::MalformedEnvelope(
                "top level is not a JSON object".to_string(),
            ));
        };

        let created = match map.get("created") {
            None | Some(Value::Null) => canonical::now_seconds(),
            Some(Value::String(text)) => canonical::parse_timestamp(text)?,
            Some(other) => {
                return Err(EnvelopeError::MalformedEnvelope(format!(
                    "created must be a string, got {other}"
                )))
            }
        };

        let parts = EnvelopeParts {
            id: scalar_text(map.get("id"), "id")?.unwrap_or_default(),
            kind: scalar_text(map.get("type"), "type")?.unwrap_or_default(),
            version: scalar_text(map.get("version"), "version")?
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            created,
            trace: optional_text(map.get("trace"), "trace")?,
            reference: optional_text(map.get("reference"), "reference")?,
            sender: optional_text(map.get("sender"), "sender")?,
            receiver: optional_text(map.get("receiver"), "receiver")?,
            headers: map.get("headers").map(Headers::from_value).unwrap_or_default(),
            body: Body::from_value(map.get("body").cloned().unwrap_or(Value::Null)),
            content: optional_text(map.get("content"), "content")?,
            ttl: map.get("ttl").and_then(ttl_value),
            reply: optional_text(map.get("reply"), "reply")?,
            signature: optional_text(map.get("signature"), "signature")?,
        };

        Ok(Self::from_parts(parts))
    }
}

fn optional(value: &Option<String>) -> Value {
    value.clone().map_or(Value::Null, Value::String)
}

/// Required text fields accept any scalar, the way loosely typed producers
/// write them.
fn scalar_text(value: Option<&Value>, field: &str) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(true)) => Ok(Some("1".to_string())),
        Some(Value::Bool(false)) => Ok(Some(String::new())),
        Some(_) => Err(EnvelopeError::MalformedEnvelope(format!(
            "{field} must be a scalar"
        ))),
    }
}

fn optional_text(value: Option<&Value>, field: &str) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(EnvelopeError::MalformedEnvelope(format!(
            "{field} must be a string or null, got {other}"
        ))),
    }
}

fn ttl_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Envelope::from_value(value).map_err(serde::de::Error::custom)
    }
}
