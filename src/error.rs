//! Custom error types for the bezetting application
//!
//! This module provides structured error handling using thiserror,
//! replacing generic anyhow errors with specific, actionable error types.
//! The occupancy engine itself never fails - its edge cases (reversed
//! ranges, missing dates, empty bucket lists) are data, not errors - so
//! everything in here belongs to the configuration, transport and UI layers.

use thiserror::Error;

/// Main error type for the bezetting application
#[derive(Error, Debug)]
pub enum BezettingError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Dashboard API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Date/time parsing errors
    #[error("Date/time error: {0}")]
    DateTime(String),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Generic error for backward compatibility
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Dashboard credentials not found. Run the application once to set them up")]
    CredentialsNotFound,

    #[error("API key is empty or invalid")]
    InvalidApiKey,

    #[error("Dashboard base URL is empty or invalid")]
    InvalidBaseUrl,

    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration file: {0}")]
    SaveFailed(String),

    #[error("Failed to create config directory: {0}")]
    DirectoryCreationFailed(String),
}

/// Dashboard API errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to connect to the project dashboard: {0}")]
    ConnectionFailed(String),

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed. Please check your API key")]
    AuthenticationFailed,

    #[error("Project list not found on the dashboard")]
    ProjectsNotFound,

    #[error("Rate limit exceeded. Please try again later")]
    RateLimitExceeded,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid date format: {0}. Expected YYYY-MM-DD, YYYY.MM.DD, or YYYY/MM/DD")]
    InvalidDateFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid field value for {field}: {value}")]
    InvalidFieldValue { field: String, value: String },
}

/// Result type alias for the bezetting application
pub type Result<T> = std::result::Result<T, BezettingError>;

// Conversion from anyhow::Error for the binary boundary
impl From<anyhow::Error> for BezettingError {
    fn from(err: anyhow::Error) -> Self {
        BezettingError::Other(err.to_string())
    }
}

// Conversion from chrono parse errors
impl From<chrono::ParseError> for BezettingError {
    fn from(err: chrono::ParseError) -> Self {
        BezettingError::DateTime(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BezettingError::Config(ConfigError::CredentialsNotFound);
        assert!(err.to_string().contains("credentials not found"));

        let err = BezettingError::Api(ApiError::AuthenticationFailed);
        assert!(err.to_string().contains("Authentication failed"));
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BezettingError = io_err.into();
        assert!(matches!(err, BezettingError::Io(_)));
    }

    #[test]
    fn test_validation_errors() {
        let err = ValidationError::InvalidDateFormat("2025-13-01".to_string());
        assert!(err.to_string().contains("Invalid date format"));

        let err = ValidationError::InvalidFieldValue {
            field: "status".to_string(),
            value: "".to_string(),
        };
        assert!(err.to_string().contains("status"));
    }
}

// Made with Bob
