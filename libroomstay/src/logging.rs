//! Tracing subscriber setup for hosts embedding the booking engine
//!
//! The library itself only emits `tracing` events under the `libroomstay`
//! target. A host installs a subscriber once at startup, either from
//! `ROOMSTAY_LOG_FORMAT` / `ROOMSTAY_LOG_LEVEL` via [`init_default`] or from
//! an explicit [`LoggingConfig`].
//!
//! ```no_run
//! use libroomstay::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::new(LogFormat::Json, "debug").install();
//! ```
//!
//! `RUST_LOG`, when set, replaces the computed directives entirely.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

const FORMAT_VAR: &str = "ROOMSTAY_LOG_FORMAT";
const LEVEL_VAR: &str = "ROOMSTAY_LOG_LEVEL";

/// Level for everything outside this crate
const DEPENDENCY_LEVEL: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain lines without colors
    #[default]
    Text,
    /// One JSON object per event, fields flattened
    Json,
    /// Multi-line colored output with source locations
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(ConfigError::Invalid(format!(
                "unknown log format '{}' (expected text, json or pretty)",
                other
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        };
        f.write_str(name)
    }
}

/// Output format and verbosity for the booking engine's events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Level applied to the `libroomstay` target
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(LogFormat::Text, "info")
    }
}

impl LoggingConfig {
    pub fn new(format: LogFormat, level: impl Into<String>) -> Self {
        Self {
            format,
            level: level.into(),
        }
    }

    /// Read `ROOMSTAY_LOG_FORMAT` and `ROOMSTAY_LOG_LEVEL`
    ///
    /// Unset variables keep their defaults. An unrecognized format is an
    /// error rather than a silent fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(format) = std::env::var(FORMAT_VAR) {
            config.format = format.parse()?;
        }
        if let Ok(level) = std::env::var(LEVEL_VAR) {
            if !level.trim().is_empty() {
                config.level = level.trim().to_string();
            }
        }
        Ok(config)
    }

    /// Filter directives used when `RUST_LOG` is not set
    pub fn directives(&self) -> String {
        format!("{},libroomstay={}", DEPENDENCY_LEVEL, self.level)
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directives()))
    }

    /// Install the global subscriber, writing to stderr
    ///
    /// Returns `false` if a subscriber was already installed, in which case
    /// the existing one is left alone.
    pub fn install(&self) -> bool {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.filter())
            .with_writer(std::io::stderr);

        let result = match self.format {
            LogFormat::Json => builder
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .try_init(),
            LogFormat::Pretty => builder
                .pretty()
                .with_ansi(true)
                .with_line_number(true)
                .try_init(),
            LogFormat::Text => builder.with_ansi(false).with_target(true).try_init(),
        };
        result.is_ok()
    }
}

/// Install a subscriber configured from the environment
///
/// # Errors
///
/// Returns `ConfigError::Invalid` if `ROOMSTAY_LOG_FORMAT` names an unknown
/// format.
pub fn init_default() -> Result<bool, ConfigError> {
    Ok(LoggingConfig::from_env()?.install())
}
