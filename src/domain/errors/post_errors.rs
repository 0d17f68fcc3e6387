use crate::domain::errors::{BlobStoreError, ValidationError};
use crate::domain::value_objects::PostId;

/// Errors surfaced by post repository and service operations
#[derive(Debug, Clone)]
pub enum PostError {
    /// Bad input (e.g. empty title); surfaced inline, never retried
    Validation { message: String },

    /// No post with the id is owned by the caller; caller should refresh
    NotFound { id: PostId },

    /// Transport or query failure against the record store
    BackendUnavailable {
        message: String,
        source: Option<String>, // stringified to keep the enum Clone
    },
}

impl PostError {
    pub fn validation(message: impl Into<String>) -> Self {
        PostError::Validation {
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        PostError::BackendUnavailable {
            message: message.into(),
            source: None,
        }
    }
}

impl std::fmt::Display for PostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostError::Validation { message } => {
                write!(f, "Validation error: {}", message)
            }
            PostError::NotFound { id } => {
                write!(f, "Post not found: {}", id)
            }
            PostError::BackendUnavailable { message, .. } => {
                write!(f, "Backend unavailable: {}", message)
            }
        }
    }
}

impl std::error::Error for PostError {}

impl From<ValidationError> for PostError {
    fn from(err: ValidationError) -> Self {
        PostError::Validation {
            message: err.to_string(),
        }
    }
}

/// Blob failures crossing the service boundary surface as a generic backend
/// failure; the caller retries the whole user action manually if at all.
impl From<BlobStoreError> for PostError {
    fn from(err: BlobStoreError) -> Self {
        PostError::BackendUnavailable {
            message: err.to_string(),
            source: Some(format!("{:?}", err)),
        }
    }
}

/// Result type for post operations
pub type PostResult<T> = Result<T, PostError>;
