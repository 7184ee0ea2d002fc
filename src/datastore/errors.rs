//! Datastore-specific error types.
//!
//! These errors represent failures in the persistence layer and carry no
//! facade semantics. Absence of a record is not an error here; it is
//! expressed in return types (`Option`, `bool`), and the facade decides whether
//! absence is a `NotFound` condition.

/// Errors that can occur during datastore operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Data that cannot be stored or interpreted by the backend.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// The backend is temporarily unavailable; the operation may succeed on
    /// retry.
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    /// The transactional scope could not be acquired or released.
    #[error("Transaction error: {message}")]
    Transaction { message: String },

    /// Generic internal backend error.
    #[error("Internal store error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StoreError {
    /// Create a new InvalidData error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new Unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a new Transaction error.
    pub fn transaction(message: impl Into<String>) -> Self {
        Self::Transaction {
            message: message.into(),
        }
    }

    /// Create a new Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new Internal error wrapping a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Check if this error indicates a temporary failure worth retrying.
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
