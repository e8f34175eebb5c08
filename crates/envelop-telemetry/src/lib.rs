//! # Envelop Telemetry
//!
//! Structured logging for Envelop tools and services.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use envelop_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ENVELOP_SERVICE_NAME` | `envelop` | Service name in the startup line |
//! | `ENVELOP_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `ENVELOP_JSON_LOGS` | `false` | JSON formatted logs |
//! | `ENVELOP_LOG_ANSI` | `true` | Coloured console output |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
