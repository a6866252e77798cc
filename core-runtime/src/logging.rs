//! # Logging & Tracing Infrastructure
//!
//! Structured logging via the `tracing` crate:
//! - Pretty, compact, and JSON output formats
//! - Module-level filtering through `RUST_LOG` / explicit directives
//!
//! ## Usage
//!
//! ```no_run
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//!
//! let config = LoggingConfig::default()
//!     .with_format(LogFormat::Pretty)
//!     .with_directives("core_player=debug,core_dashboard=debug");
//! init_logging(config).expect("failed to initialize logging");
//!
//! tracing::info!("client core started");
//! ```

use crate::error::{Error, Result};
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line format for development.
    Pretty,
    /// Single-line format for production consoles.
    Compact,
    /// Structured JSON for machine ingestion.
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Compact;
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Filter directives applied when `RUST_LOG` is unset
    /// (e.g. `"info,core_player=debug"`).
    pub directives: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            directives: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Set the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the default filter directives.
    pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = directives.into();
        self
    }
}

/// Initialize the global tracing subscriber.
///
/// Must be called at most once per process; subsequent calls return
/// [`Error::Logging`].
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.directives))
        .map_err(|e| Error::Logging(format!("invalid filter directives: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    result.map_err(|e| Error::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_info_directives() {
        let config = LoggingConfig::default();
        assert_eq!(config.directives, "info");
    }

    #[test]
    fn builder_overrides() {
        let config = LoggingConfig::default()
            .with_format(LogFormat::Json)
            .with_directives("debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.directives, "debug");
    }

    #[test]
    fn double_init_fails() {
        let first = init_logging(LoggingConfig::default());
        let second = init_logging(LoggingConfig::default());
        // Whichever call ran first wins; the other must fail.
        assert!(!(first.is_ok() && second.is_ok()));
    }
}
