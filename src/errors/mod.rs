//! Error types for the store, remote API and workflow layers.
//!
//! # Error Categories
//!
//! - [`StoreError`]: token / platform storage failures
//! - [`ApiError`]: transport or backend failures of a remote call
//! - [`WorkflowError`]: what a workflow reports to its caller
//!
//! # Examples
//!
//! ```
//! use companion_core::errors::{StoreError, WorkflowError};
//! use companion_core::domain::TokenKind;
//!
//! let error = WorkflowError::data_conversion(StoreError::write(TokenKind::AccessToken, "disk full"));
//! assert!(error.is_data_conversion());
//! ```

use thiserror::Error;

use crate::domain::{TokenKind, ValidationError};

// =============================================================================
// StoreError
// =============================================================================

/// Failure of the secure token storage or the platform store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no value stored for {0}")]
    NotFound(String),

    #[error("failed to read {key}: {message}")]
    Read { key: String, message: String },

    #[error("failed to write {key}: {message}")]
    Write { key: String, message: String },

    #[error("failed to delete {key}: {message}")]
    Delete { key: String, message: String },
}

impl StoreError {
    #[must_use]
    pub fn not_found(kind: TokenKind) -> Self {
        Self::NotFound(kind.storage_key().to_string())
    }

    #[must_use]
    pub fn read(kind: TokenKind, message: impl Into<String>) -> Self {
        Self::Read {
            key: kind.storage_key().to_string(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn write(kind: TokenKind, message: impl Into<String>) -> Self {
        Self::Write {
            key: kind.storage_key().to_string(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn delete(kind: TokenKind, message: impl Into<String>) -> Self {
        Self::Delete {
            key: kind.storage_key().to_string(),
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

// =============================================================================
// ApiError
// =============================================================================

/// Failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The call requires a session and none is stored.
    #[error("not authenticated")]
    Unauthenticated,
}

impl ApiError {
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::Status { status: 401, .. })
    }
}

// =============================================================================
// WorkflowError
// =============================================================================

/// Error reported by a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Tokens could not be persisted or read back as a unit.
    #[error("data conversion error: {0}")]
    DataConversion(StoreError),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl WorkflowError {
    #[must_use]
    pub const fn data_conversion(error: StoreError) -> Self {
        Self::DataConversion(error)
    }

    #[must_use]
    pub const fn is_data_conversion(&self) -> bool {
        matches!(self, Self::DataConversion(_))
    }

    #[must_use]
    pub const fn is_api(&self) -> bool {
        matches!(self, Self::Api(_))
    }

    #[must_use]
    pub const fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

impl From<StoreError> for WorkflowError {
    fn from(error: StoreError) -> Self {
        Self::Store(error)
    }
}

/// Result type of every workflow.
pub type WorkflowResult<T> = Result<T, WorkflowError>;
