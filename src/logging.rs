// src/logging.rs
//! Log output for the binary.
//!
//! The crawler emits `tracing` events (one per fetched node, one per failure,
//! debug events for skips and cutoffs). This module installs the subscriber
//! that prints them: human-readable text by default, one JSON object per
//! line with `--log-format json`. Logs go to stderr so `--json` output on
//! stdout stays machine-readable.
//!
//! `RUST_LOG` overrides the configured level, e.g.
//! `RUST_LOG=graph_crawler=debug`.

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration for log output.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// The default log level if RUST_LOG is not set
    pub default_level: Level,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            default_level: Level::WARN,
        }
    }
}

impl LoggingConfig {
    pub fn json() -> Self {
        Self {
            format: LogFormat::Json,
            ..Default::default()
        }
    }

    pub fn text() -> Self {
        Self::default()
    }

    /// Set the default log level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_level.to_string()));

    match config.format {
        LogFormat::Json => {
            let subscriber = tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_target(true),
            );
            // Err only means a subscriber is already installed; keep that one
            tracing::subscriber::set_global_default(subscriber).ok();
        }
        LogFormat::Text => {
            let subscriber = tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            );
            // Err only means a subscriber is already installed; keep that one
            tracing::subscriber::set_global_default(subscriber).ok();
        }
    }
}
