//! Error types for DocStore core.

use crate::document::DocumentId;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by local store operations.
///
/// These are validation failures handled by the caller; they are never
/// written into the request status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No document with this id is held by the store.
    #[error("document not found: {id}")]
    DocumentNotFound {
        /// The id that was looked up.
        id: DocumentId,
    },

    /// A filter name did not match any known filter.
    #[error("invalid filter: {value:?}")]
    InvalidFilter {
        /// The rejected input.
        value: String,
    },
}

impl StoreError {
    /// Creates a not-found error for `id`.
    pub fn not_found(id: impl Into<DocumentId>) -> Self {
        Self::DocumentNotFound { id: id.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::not_found("doc-9");
        assert_eq!(err.to_string(), "document not found: doc-9");

        let err = StoreError::InvalidFilter {
            value: "SOMETIMES".into(),
        };
        assert!(err.to_string().contains("SOMETIMES"));
    }
}
