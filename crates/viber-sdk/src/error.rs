//! Error types for the Viber SDK

use thiserror::Error;

/// Result type alias for Viber SDK operations
pub type Result<T> = std::result::Result<T, ViberError>;

/// Errors that can occur when calling the Viber API
#[derive(Error, Debug)]
pub enum ViberError {
    /// HTTP request failed or returned a non-success status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The API accepted the request but reported a non-zero status
    #[error("Delivery failed ({status}): {message}")]
    Delivery { status: i32, message: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ViberError {
    /// API status code of a delivery error
    pub fn status_code(&self) -> Option<i32> {
        match self {
            ViberError::Delivery { status, .. } => Some(*status),
            _ => None,
        }
    }
}
