//! envelop-cli entry point.

use std::io::{self, IsTerminal, Read};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use envelop_cli::cli::{Cli, Command};
use envelop_cli::commands;
use envelop_codec::CodecConfig;
use envelop_telemetry::{init_logging, log_event, TelemetryConfig};
use envelop_types::EnvelopeError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // A subscriber may already be installed when embedded; logging is optional here.
    let _ = init_logging(&TelemetryConfig::for_service("envelop-cli"));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(envelope_err) = err.downcast_ref::<EnvelopeError>() {
                log_event!(error, "cli", "Command failed", kind = envelope_err.kind());
            }
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let base = CodecConfig::from_env().context("invalid ENVELOP_* configuration")?;

    match cli.command {
        Command::Seal(args) => {
            let config = commands::resolve_config(base, &args.codec)?;
            let needs_stdin = args.body.is_none() && args.attach.is_none() && args.link.is_none();
            let stdin_body = if needs_stdin { read_stdin()? } else { None };
            println!("{}", commands::seal(&args, &config, stdin_body)?);
        }
        Command::Open(args) => {
            let config = commands::resolve_config(base, &args.codec)?;
            let wire = read_wire(args.input.as_deref())?;
            println!("{}", commands::open(&wire, &args, &config)?);
        }
        Command::Inspect(args) => {
            let config = commands::resolve_config(base, &args.codec)?;
            let wire = read_wire(args.input.as_deref())?;
            let now = chrono::Utc::now().fixed_offset();
            let report = commands::inspect(&wire, &config, &now)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Reads piped stdin; an interactive terminal yields no body.
fn read_stdin() -> Result<Option<String>> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut text = String::new();
    stdin.read_to_string(&mut text).context("failed to read stdin")?;
    Ok(Some(text))
}

fn read_wire(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => Ok(read_stdin()?.unwrap_or_default()),
    }
}
