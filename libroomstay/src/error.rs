//! Error types for Roomstay

use chrono::NaiveDate;
use thiserror::Error;

use crate::availability::DayStatus;

pub type Result<T> = std::result::Result<T, RoomstayError>;

#[derive(Error, Debug)]
pub enum RoomstayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Listing error: {0}")]
    Listing(#[from] ListingError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RoomstayError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            RoomstayError::InvalidInput(_) => 3,
            RoomstayError::Gateway(GatewayError::Rejected(_)) => 2,
            RoomstayError::Gateway(_) => 1,
            RoomstayError::Config(_) => 1,
            RoomstayError::Listing(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    Invalid(String),
}

/// Problems with a listing detail received from the backend
#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Malformed listing payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Unknown availability status: {0}")]
    UnknownStatus(String),

    #[error("Missing field: {0}")]
    MissingField(String),
}

/// Failures reported by a submission gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The server answered and refused the request
    #[error("Rejected by server: {0}")]
    Rejected(String),

    /// No usable answer (connection, timeout, undecodable response)
    #[error("Transport failure: {0}")]
    Transport(String),
}

impl GatewayError {
    /// Transport failures may succeed when retried by the caller; rejections won't.
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }
}

/// Why a calendar tap did not advance the selection
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapRejection {
    #[error("{date} cannot be selected ({status})")]
    UnselectableDate { date: NaiveDate, status: DayStatus },

    #[error("{date} cannot close a stay starting {check_in}")]
    InvalidRangeTap { check_in: NaiveDate, date: NaiveDate },
}
