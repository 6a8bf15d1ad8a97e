//! Logging setup for the `generate-uml` binary
//!
//! The library only emits `tracing` events: per-file progress at `debug`,
//! unreadable sources and missing imports at `warn`, run summaries at `info`.
//! The binary installs a `tracing-subscriber` writing to stderr, so prompts on
//! stdout stay readable.
//!
//! Level and format come from the CLI, then `UML_GENERATOR_LOG_LEVEL` /
//! `UML_GENERATOR_LOG_FORMAT`, then `RUST_LOG`, defaulting to `warn` and
//! `compact`.

use std::io::IsTerminal;
use std::str::FromStr;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Initialize the global tracing subscriber
///
/// Fails if the format is unknown or a subscriber is already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = level
        .map(|s| s.to_string())
        .or_else(|| std::env::var("UML_GENERATOR_LOG_LEVEL").ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "warn".to_string());

    let log_format = format
        .map(|s| s.to_string())
        .or_else(|| std::env::var("UML_GENERATOR_LOG_FORMAT").ok())
        .unwrap_or_else(|| "compact".to_string());

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let format = LogFormat::from_str(&log_format)?;
    let ansi = std::io::stderr().is_terminal();

    match format {
        LogFormat::Compact => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_ansi(ansi)
                        .with_target(false)
                        .with_level(true)
                        .with_span_events(FmtSpan::NONE)
                        .compact(),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_ansi(ansi)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .pretty(),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .json(),
                )
                .try_init()?;
        }
    }

    Ok(())
}
