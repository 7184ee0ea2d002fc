//! Error types for resource operations.
//!
//! One taxonomy covers both phases of a resource's life: configuration errors
//! raised while a resource is being set up, and operation errors returned from
//! the four canonical calls. Setup errors are returned to the configurer and
//! never leave a resource partially reconfigured; operation errors are
//! returned to the immediate caller and never retried internally.

use crate::permission::PermissionMode;

/// Main error type for resource operations.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// Invalid resource configuration: unknown primary-field name, or a
    /// record type with no resolvable primary field.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A find operation located zero matching records. Recoverable; callers
    /// should render this as an empty result, not a system fault.
    #[error("{name} not found")]
    NotFound { name: String },

    /// A validator rejected the candidate change. Carries the originating
    /// stage's message verbatim.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// A processor failed while transforming the candidate change.
    #[error("Processing failed: {message}")]
    Processing { message: String },

    /// The permission gate denied the operation. No state change occurred.
    #[error("Permission denied: {mode} on {name}")]
    PermissionDenied { name: String, mode: PermissionMode },

    /// Malformed invocation, e.g. a find-one call without values for every
    /// primary field.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Error from the backing datastore, propagated untouched.
    #[error("Datastore error: {0}")]
    Datastore(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON serialization/deserialization errors from record round-trips.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ResourceError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a not-found error for the named resource.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a processing error.
    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing {
            message: message.into(),
        }
    }

    /// Create a permission-denied error.
    pub fn permission_denied(name: impl Into<String>, mode: PermissionMode) -> Self {
        Self::PermissionDenied {
            name: name.into(),
            mode,
        }
    }

    /// Create an invalid-request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Wrap a datastore error.
    pub fn datastore<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Datastore(Box::new(error))
    }

    /// Check if this error indicates an empty result rather than a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from a pipeline stage.
    pub fn is_stage_failure(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Processing { .. })
    }
}

/// Result type alias for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;
