//! # Envelop CLI
//!
//! Seal, open and inspect envelopes from the shell.
//!
//! ```text
//! envelop-cli seal -t chat.message --sender a --receiver b --body hi --sign --secret k1 -c gzip
//! envelop-cli open --require-signature --secret k1 -c gzip < wire.txt
//! envelop-cli inspect -i wire.txt
//! ```
//!
//! Codec settings fall back to `ENVELOP_COMPRESSION`, `ENVELOP_SECRET` and
//! `ENVELOP_SIGNATURE_REQUIRED` when the matching flag is absent.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command};
