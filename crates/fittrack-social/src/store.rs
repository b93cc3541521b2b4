//! Friend storage backend trait and error types.
//!
//! The workflow in [`crate::service`] never depends on which store is used;
//! [`crate::memory::InMemoryFriendStore`] and
//! [`crate::json_store::JsonFileFriendStore`] are interchangeable.

use fittrack_core::AppError;
use thiserror::Error;

use crate::types::Person;

/// Errors that can occur during friend operations.
#[derive(Debug, Error)]
pub enum FriendStoreError {
    /// No pending request with this id.
    #[error("Friend request not found: {0}")]
    NotFound(String),

    /// Invalid input (e.g., empty name).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persistence failure (file, serialization).
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FriendStoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) => "That friend request no longer exists.".to_string(),
            Self::Validation(msg) => format!("Invalid request: {}", msg),
            Self::Storage(_) => {
                "Could not save your friends list. Please try again.".to_string()
            }
        }
    }
}

impl From<FriendStoreError> for AppError {
    fn from(err: FriendStoreError) -> Self {
        AppError::Service(err.to_string())
    }
}

pub type FriendStoreResult<T> = Result<T, FriendStoreError>;

/// Persistence for the two friend lists.
///
/// `load_*` returns `Ok(None)` when nothing has been stored yet, so the
/// caller can fall back to seed data.
pub trait FriendStore: Send + Sync {
    fn load_friends(&self) -> FriendStoreResult<Option<Vec<Person>>>;

    fn load_requests(&self) -> FriendStoreResult<Option<Vec<Person>>>;

    /// Persist both lists together.
    fn save(&self, friends: &[Person], requests: &[Person]) -> FriendStoreResult<()>;
}
