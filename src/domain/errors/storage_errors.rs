use thiserror::Error;

use crate::domain::value_objects::{BucketName, ObjectKey};

/// Errors that can occur while talking to a storage backend
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Bucket not found: {bucket}")]
    BucketNotFound { bucket: BucketName },

    #[error("Object not found: {key}")]
    ObjectNotFound { key: ObjectKey },

    /// The request was cancelled or its backend deadline expired
    #[error("Operation '{operation}' cancelled before completion")]
    Cancelled { operation: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    /// Infrastructure error with external source
    #[error("Infrastructure error: {message}")]
    InfrastructureError {
        message: String,
        detail: Option<String>, // Stored as a string so the error stays Clone
    },
}

impl StorageError {
    /// Whether this error must abort the whole request rather than degrade
    pub fn is_cancellation(&self) -> bool {
        matches!(self, StorageError::Cancelled { .. })
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
