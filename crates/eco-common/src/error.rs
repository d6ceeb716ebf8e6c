//! Error types for eco-score crates.

use thiserror::Error;

/// Result type alias using EcoError.
pub type EcoResult<T> = Result<T, EcoError>;

/// Primary error type for scoring operations.
#[derive(Debug, Error)]
pub enum EcoError {
    // === Argument Errors ===
    #[error("Invalid coordinates ({lat}, {lon}): {message}")]
    InvalidCoordinates { lat: f64, lon: f64, message: String },

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Data Errors ===
    #[error("Data not available: {0}")]
    DataNotAvailable(String),

    #[error("Failed to read data: {0}")]
    DataReadError(String),

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl EcoError {
    /// Create an InvalidCoordinates error.
    pub fn invalid_coordinates(lat: f64, lon: f64, message: impl Into<String>) -> Self {
        Self::InvalidCoordinates {
            lat,
            lon,
            message: message.into(),
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Whether a data source fallback chain may move on to its next source.
    ///
    /// Argument errors are the caller's fault and would fail on every source.
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            EcoError::DataNotAvailable(_) | EcoError::DataReadError(_)
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for EcoError {
    fn from(err: std::io::Error) -> Self {
        EcoError::DataReadError(err.to_string())
    }
}

impl From<serde_json::Error> for EcoError {
    fn from(err: serde_json::Error) -> Self {
        EcoError::DataReadError(format!("JSON error: {}", err))
    }
}
