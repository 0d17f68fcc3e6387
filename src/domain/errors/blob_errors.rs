use crate::domain::value_objects::ImageKey;

/// Errors that can occur against the blob store
#[derive(Debug, Clone)]
pub enum BlobStoreError {
    /// No object stored under the key
    NotFound { key: ImageKey },

    /// An object already exists under the key (uploads never overwrite)
    AlreadyExists { key: ImageKey },

    /// The backing store cannot mint signed URLs
    SignUnsupported { reason: String },

    /// Transport or backend failure
    Backend {
        message: String,
        source: Option<String>, // stringified to keep the enum Clone
    },
}

impl std::fmt::Display for BlobStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlobStoreError::NotFound { key } => {
                write!(f, "Image object not found: {}", key)
            }
            BlobStoreError::AlreadyExists { key } => {
                write!(f, "Image object already exists: {}", key)
            }
            BlobStoreError::SignUnsupported { reason } => {
                write!(f, "Signed URLs not supported: {}", reason)
            }
            BlobStoreError::Backend { message, .. } => {
                write!(f, "Blob store backend error: {}", message)
            }
        }
    }
}

impl std::error::Error for BlobStoreError {}

/// Result type for blob store operations
pub type BlobResult<T> = Result<T, BlobStoreError>;
