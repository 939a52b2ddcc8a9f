//! Cloud provider error types

use crate::http::Method;
use thiserror::Error;

/// Errors shared by every provider
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication failed (HTTP {status}): {message}")]
    AuthenticationFailed { status: u16, message: String },

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// The remote state differs in a way that cannot be reconciled safely
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Timed out waiting for {target} after {attempts} attempts")]
    Timeout { target: String, attempts: u32 },

    #[error("Unexpected status {status} from {method} {path}")]
    UnexpectedStatus {
        method: Method,
        path: String,
        status: u16,
    },

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for CloudError {
    fn from(err: reqwest::Error) -> Self {
        CloudError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
