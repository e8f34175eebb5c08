//! # Envelope Body
//!
//! Payloads are either text (plain strings, base64 file contents, link URLs)
//! or a structured JSON tree. File and link bodies are plain `Text` with the
//! describing metadata carried in headers and `content`.

use serde_json::Value;

/// Message payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Body {
    /// No payload. Renders as JSON `null`.
    #[default]
    Empty,
    /// Text payload.
    Text(String),
    /// Structured payload, key order as provided.
    Structured(Value),
}

impl Body {
    /// JSON view used for the canonical rendering.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Body::Empty => Value::Null,
            Body::Text(text) => Value::String(text.clone()),
            Body::Structured(value) => value.clone(),
        }
    }

    /// Classifies a decoded JSON value.
    ///
    /// `null` is `Empty` and a JSON string is `Text`, so a `Structured` body
    /// never wraps either.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Body::Empty,
            Value::String(text) => Body::Text(text),
            other => Body::Structured(other),
        }
    }

    /// Collapses a `Structured` null or string into `Empty` or `Text`.
    ///
    /// Both render identically, so only the collapsed form survives a decode.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Body::Structured(value) => Body::from_value(value),
            other => other,
        }
    }

    /// Returns the text payload, if this is a `Text` body.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the structured payload, if this is a `Structured` body.
    #[must_use]
    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            Body::Structured(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::from_value(value)
    }
}
