//! Session query errors.

use fittrack_core::{AppError, NetworkError};
use thiserror::Error;

/// The single failure a session query can report.
///
/// Transport errors, non-success statuses and undecodable bodies all collapse
/// into `FetchFailed`; `message` carries the detail for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("{message}")]
    FetchFailed { message: String },
}

impl FetchError {
    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self::FetchFailed {
            message: message.into(),
        }
    }

    /// The underlying detail message.
    pub fn message(&self) -> &str {
        match self {
            Self::FetchFailed { message } => message,
        }
    }

    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        format!("Could not load sessions: {}", self.message())
    }
}

impl From<NetworkError> for FetchError {
    fn from(err: NetworkError) -> Self {
        Self::fetch_failed(err.to_string())
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::Network(NetworkError::RequestFailed(err.message().to_string()))
    }
}
