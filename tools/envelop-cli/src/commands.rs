//! Command implementations, kept free of process I/O so they can be tested.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset};
use serde_json::{json, Value};

use envelop_builder::EnvelopeBuilder;
use envelop_codec::{decode, decode_with_report, encode, CodecConfig, Compression, ConfigError};
use envelop_telemetry::log_event;
use envelop_types::canonical::format_timestamp;

use crate::cli::{CodecArgs, OpenArgs, SealArgs};

/// Applies command line overrides on top of the environment configuration.
///
/// With `--strict` the result must also pass
/// [`CodecConfig::validate_for_production`].
pub fn resolve_config(mut config: CodecConfig, args: &CodecArgs) -> Result<CodecConfig> {
    if let Some(compression) = &args.compression {
        config.compression = compression
            .parse::<Compression>()
            .context("invalid --compression")?;
    }
    if let Some(secret) = &args.secret {
        config.secret = Some(secret.clone()).filter(|s| !s.is_empty());
    }
    if args.strict {
        config
            .validate_for_production()
            .context("configuration refused by --strict")?;
    }
    Ok(config)
}

/// Builds an envelope and returns its wire text.
pub fn seal(args: &SealArgs, config: &CodecConfig, stdin_body: Option<String>) -> Result<String> {
    let mut builder = EnvelopeBuilder::start()
        .kind(&args.kind)
        .headers(args.headers.iter().cloned());

    if let Some(sender) = &args.sender {
        builder = builder.sender(sender);
    }
    if let Some(receiver) = &args.receiver {
        builder = builder.receiver(receiver);
    }
    if let Some(reference) = &args.reference {
        builder = builder.reference(reference);
    }
    if let Some(trace) = &args.trace {
        builder = builder.trace(trace);
    }
    if let Some(reply) = &args.reply {
        builder = builder.reply(reply);
    }
    if let Some(ttl) = args.ttl {
        builder = builder.ttl(ttl);
    }

    builder = if let Some(url) = &args.link {
        builder.link(url, args.meta.iter().cloned())
    } else if let Some(path) = &args.attach {
        builder.attach(path)?
    } else if let Some(text) = args.body.clone().or(stdin_body) {
        if args.json {
            let value: Value = serde_json::from_str(&text).context("body is not valid JSON")?;
            builder.body(value)
        } else {
            builder.body(text)
        }
    } else {
        builder
    };

    if args.sign {
        let Some(secret) = &config.secret else {
            bail!("--sign needs --secret or ENVELOP_SECRET");
        };
        builder = builder.sign(secret);
    }

    let envelope = builder.build();
    let wire = encode(&envelope, &config.encode_options())?;

    log_event!(
        info,
        "cli",
        "Envelope sealed",
        envelope_id = %envelope.id(),
        kind = %envelope.kind(),
        signed = envelope.is_signed(),
        compression = %config.compression
    );

    Ok(wire)
}

/// Decodes wire text under the configured policy and pretty-prints it.
pub fn open(wire: &str, args: &OpenArgs, config: &CodecConfig) -> Result<String> {
    let mut config = config.clone();
    if args.require_signature {
        config.signature_required = true;
        config
            .validate_for_production()
            .or_else(|err| match err {
                ConfigError::InsecureSecret { .. } if !args.codec.strict => Ok(()),
                other => Err(other),
            })
            .context("--require-signature")?;
    }

    let envelope = decode(wire, &config.decode_options())?;
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Decodes wire text without enforcing a signature and summarises it.
pub fn inspect(
    wire: &str,
    config: &CodecConfig,
    now: &DateTime<FixedOffset>,
) -> Result<Value> {
    let options = config.decode_options().require_signature(false);
    let report = decode_with_report(wire, &options)?;
    let envelope = &report.envelope;

    Ok(json!({
        "id": envelope.id(),
        "type": envelope.kind(),
        "created": format_timestamp(envelope.created()),
        "signed": envelope.is_signed(),
        "verified": report.verified,
        "expired": envelope.is_expired_at(now),
        "expires_at": envelope.expires_at().map(|t| format_timestamp(&t)),
        "content": envelope.content(),
    }))
}
