//! Configuration management for Roomstay

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::availability::{DEFAULT_HORIZON_DAYS, MAX_HORIZON_DAYS};
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub currency: CurrencyConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Days from today that can be booked
    pub horizon_days: u32,
    pub phone_min_len: usize,
    pub phone_max_len: usize,
    /// Buffered events per subscriber
    pub event_capacity: usize,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            phone_min_len: 8,
            phone_max_len: 20,
            event_capacity: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    pub code: String,
    /// Digits after the decimal point in the currency's minor unit
    pub minor_units: u8,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            code: "NPR".to_string(),
            minor_units: 2,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load from the default location, falling back to defaults when no file exists
    pub fn load_or_default() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let horizon = self.booking.horizon_days;
        if !(1..=MAX_HORIZON_DAYS).contains(&horizon) {
            return Err(ConfigError::Invalid(format!(
                "booking.horizon_days must be between 1 and {} (got {})",
                MAX_HORIZON_DAYS, horizon
            ))
            .into());
        }
        if self.booking.phone_min_len > self.booking.phone_max_len {
            return Err(ConfigError::Invalid(format!(
                "booking.phone_min_len ({}) exceeds booking.phone_max_len ({})",
                self.booking.phone_min_len, self.booking.phone_max_len
            ))
            .into());
        }
        if self.booking.event_capacity == 0 {
            return Err(
                ConfigError::Invalid("booking.event_capacity must be at least 1".to_string())
                    .into(),
            );
        }
        Ok(())
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("ROOMSTAY_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("roomstay").join("config.toml"))
}
