//! Error types for the sync engine.

use docstore_core::StoreError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the authority or applying
/// local changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Signing in failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The authority refused or failed to create a document.
    #[error("create failed: {0}")]
    Create(String),

    /// The authority refused or failed to accept a sync batch.
    #[error("sync failed: {0}")]
    Sync(String),

    /// A local store operation was rejected.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ClientError {
    /// Creates an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a create error.
    pub fn create(message: impl Into<String>) -> Self {
        Self::Create(message.into())
    }

    /// Creates a sync error.
    pub fn sync(message: impl Into<String>) -> Self {
        Self::Sync(message.into())
    }

    /// The human-readable message without the category prefix.
    ///
    /// This is what gets recorded in the request status.
    pub fn message(&self) -> String {
        match self {
            ClientError::Auth(message)
            | ClientError::Create(message)
            | ClientError::Sync(message) => message.clone(),
            ClientError::Store(err) => err.to_string(),
        }
    }
}
