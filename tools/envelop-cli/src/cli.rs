//! Command line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// envelop-cli: seal, open and inspect message envelopes
#[derive(Parser, Debug)]
#[command(name = "envelop-cli")]
#[command(about = "Seal, open and inspect signed message envelopes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build an envelope and print its wire text
    Seal(SealArgs),
    /// Decode wire text and print the envelope as JSON
    Open(OpenArgs),
    /// Decode wire text without enforcing a signature and report its state
    Inspect(InspectArgs),
}

/// Codec settings; unset flags fall back to `ENVELOP_*` variables.
#[derive(Args, Debug, Default, Clone)]
pub struct CodecArgs {
    /// Compression: none or gzip
    #[arg(short, long)]
    pub compression: Option<String>,

    /// Shared HMAC secret
    #[arg(long)]
    pub secret: Option<String>,

    /// Refuse short secrets and a signature requirement without a secret
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug, Default, Clone)]
pub struct SealArgs {
    /// Message type, e.g. chat.message
    #[arg(short = 't', long = "type")]
    pub kind: String,

    #[arg(long)]
    pub sender: Option<String>,

    #[arg(long)]
    pub receiver: Option<String>,

    /// Caller-assigned correlation id
    #[arg(long)]
    pub reference: Option<String>,

    #[arg(long)]
    pub trace: Option<String>,

    /// Id of the envelope being replied to
    #[arg(long)]
    pub reply: Option<String>,

    /// Header as key=value, repeatable
    #[arg(short = 'H', long = "header", value_parser = parse_key_value)]
    pub headers: Vec<(String, String)>,

    /// Time-to-live in seconds
    #[arg(long)]
    pub ttl: Option<u64>,

    /// Body text; read from stdin when no body source is given
    #[arg(short, long, conflicts_with_all = ["attach", "link"])]
    pub body: Option<String>,

    /// Parse the body as JSON
    #[arg(long)]
    pub json: bool,

    /// Attach a local file
    #[arg(long, conflicts_with = "link")]
    pub attach: Option<PathBuf>,

    /// Link to an external file
    #[arg(long)]
    pub link: Option<String>,

    /// Link metadata as key=value, repeatable
    #[arg(long = "meta", value_parser = parse_key_value, requires = "link")]
    pub meta: Vec<(String, String)>,

    /// Sign with the configured secret
    #[arg(long)]
    pub sign: bool,

    #[command(flatten)]
    pub codec: CodecArgs,
}

#[derive(Args, Debug, Default, Clone)]
pub struct OpenArgs {
    /// Fail unless the signature verifies
    #[arg(long)]
    pub require_signature: bool,

    /// Read wire text from a file instead of stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub codec: CodecArgs,
}

#[derive(Args, Debug, Default, Clone)]
pub struct InspectArgs {
    /// Read wire text from a file instead of stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub codec: CodecArgs,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
