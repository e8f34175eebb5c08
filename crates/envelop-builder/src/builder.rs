//! # Envelope Builder
//!
//! Accumulates field values and freezes them into an [`Envelope`].
//!
//! ## Defaults
//!
//! - `id` and `created` come from the [`IdentityProvider`] at `start`
//! - `version` is `"1.0"`, `content` is `application/json`
//! - headers are empty and the body is empty
//!
//! ## Signing
//!
//! [`EnvelopeBuilder::sign`] records the secret; the signature is computed in
//! [`EnvelopeBuilder::build`] over the final field values, so setters called
//! after `sign` are still covered.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::debug;

use envelop_types::{security, Body, Envelope, EnvelopeError, EnvelopeParts, Result};

use crate::mime;
use crate::provider::{IdentityProvider, SystemIdentity};

/// Content type for link bodies.
pub const LINK_CONTENT_TYPE: &str = "application/x.file.link";

/// Header carrying an attachment's file name.
pub const FILENAME_HEADER: &str = "x-filename";

const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain";

/// Fluent builder for [`Envelope`].
#[derive(Clone)]
pub struct EnvelopeBuilder {
    parts: EnvelopeParts,
    secret: Option<Vec<u8>>,
}

impl EnvelopeBuilder {
    /// Starts a builder with a random id and the current time.
    #[must_use]
    pub fn start() -> Self {
        Self::with_provider(&SystemIdentity)
    }

    /// Starts a builder drawing id and time from `provider`.
    #[must_use]
    pub fn with_provider(provider: &dyn IdentityProvider) -> Self {
        let mut parts = EnvelopeParts::new(provider.new_id(), "", provider.now());
        parts.content = Some(JSON_CONTENT_TYPE.to_string());
        Self {
            parts,
            secret: None,
        }
    }

    /// Sets the message type, e.g. `chat.message`.
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.parts.kind = kind.into();
        self
    }

    /// Sets the protocol version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.parts.version = version.into();
        self
    }

    #[must_use]
    pub fn sender(mut self, id: impl Into<String>) -> Self {
        self.parts.sender = Some(id.into());
        self
    }

    #[must_use]
    pub fn receiver(mut self, id: impl Into<String>) -> Self {
        self.parts.receiver = Some(id.into());
        self
    }

    /// Sets the caller-assigned correlation id.
    #[must_use]
    pub fn reference(mut self, id: impl Into<String>) -> Self {
        self.parts.reference = Some(id.into());
        self
    }

    /// Sets the trace id.
    #[must_use]
    pub fn trace(mut self, id: impl Into<String>) -> Self {
        self.parts.trace = Some(id.into());
        self
    }

    /// Marks this envelope as a reply to `id`.
    #[must_use]
    pub fn reply(mut self, id: impl Into<String>) -> Self {
        self.parts.reply = Some(id.into());
        self
    }

    /// Adds or replaces a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.headers.insert(key, value);
        self
    }

    /// Adds or replaces several headers.
    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.parts.headers.extend(headers);
        self
    }

    /// Sets the body. Text bodies get `text/plain`, structured bodies
    /// `application/json`.
    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        let body = body.into();
        match &body {
            Body::Text(_) => self.parts.content = Some(TEXT_CONTENT_TYPE.to_string()),
            Body::Structured(_) => self.parts.content = Some(JSON_CONTENT_TYPE.to_string()),
            Body::Empty => {}
        }
        self.parts.body = body;
        self
    }

    /// Overrides the content type.
    #[must_use]
    pub fn content(mut self, mime: impl Into<String>) -> Self {
        self.parts.content = Some(mime.into());
        self
    }

    /// Sets the time-to-live in seconds.
    #[must_use]
    pub fn ttl(mut self, seconds: u64) -> Self {
        self.parts.ttl = Some(seconds);
        self
    }

    /// Attaches a local file as a base64 text body.
    ///
    /// Sets `content` from the detected MIME type and the `x-filename` header
    /// from the file name.
    pub fn attach(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| EnvelopeError::AttachmentReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = mime::detect(path, &bytes);

        debug!(file = %name, bytes = bytes.len(), mime, "Attaching file");

        Ok(self.attach_bytes(name, mime, &bytes))
    }

    /// Attaches in-memory bytes as a base64 text body.
    #[must_use]
    pub fn attach_bytes(mut self, name: impl Into<String>, mime: impl Into<String>, bytes: &[u8]) -> Self {
        self.parts.body = Body::Text(STANDARD.encode(bytes));
        self.parts.content = Some(mime.into());
        self.parts.headers.insert(FILENAME_HEADER, name);
        self
    }

    /// Links to an external file.
    ///
    /// The URL becomes the text body; each metadata entry becomes an
    /// `x-<lowercased key>` header.
    #[must_use]
    pub fn link<I, K, V>(mut self, url: impl Into<String>, meta: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.parts.body = Body::Text(url.into());
        self.parts.content = Some(LINK_CONTENT_TYPE.to_string());
        for (key, value) in meta {
            let key = format!("x-{}", key.as_ref().to_lowercase());
            self.parts.headers.insert(key, value);
        }
        self
    }

    /// Signs the envelope with HMAC-SHA256 under `secret` when built.
    #[must_use]
    pub fn sign(mut self, secret: impl AsRef<[u8]>) -> Self {
        self.secret = Some(secret.as_ref().to_vec());
        self
    }

    /// Freezes the accumulated fields into an envelope.
    #[must_use]
    pub fn build(self) -> Envelope {
        let mut parts = self.parts;
        parts.signature = None;
        let unsigned = Envelope::from_parts(parts);

        match self.secret {
            Some(secret) => {
                let signature = security::sign(&unsigned, &secret);
                debug!(envelope_id = %unsigned.id(), kind = %unsigned.kind(), "Envelope signed");
                unsigned.with_signature(signature)
            }
            None => unsigned,
        }
    }
}

impl Default for EnvelopeBuilder {
    fn default() -> Self {
        Self::start()
    }
}

impl std::fmt::Debug for EnvelopeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeBuilder")
            .field("parts", &self.parts)
            .field("signed", &self.secret.is_some())
            .finish()
    }
}
