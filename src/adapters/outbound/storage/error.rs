use std::io;

use thiserror::Error as ThisError;

use crate::domain::errors::StorageError;

#[derive(ThisError, Debug)]
pub enum StoreError {
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid object path: {0}")]
    InvalidPath(String),
}

/// Convert infrastructure StoreError to domain StorageError
impl From<StoreError> for StorageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ObjectStore(object_err) => object_err.into(),
            StoreError::Io(io_err) => StorageError::InfrastructureError {
                message: format!("IO operation failed: {}", io_err),
                detail: Some(io_err.kind().to_string()),
            },
            StoreError::InvalidPath(path) => StorageError::ValidationError {
                message: format!("Invalid object path: {}", path),
            },
        }
    }
}

/// Convert object_store errors to domain storage errors
///
/// Not-found errors are mapped by the caller, which knows the requested key.
impl From<object_store::Error> for StorageError {
    fn from(err: object_store::Error) -> Self {
        StorageError::InfrastructureError {
            message: "Object store operation failed".to_string(),
            detail: Some(err.to_string()),
        }
    }
}

/// Convert domain StorageError to HTTP status codes for API responses
impl From<&StorageError> for http::StatusCode {
    fn from(err: &StorageError) -> Self {
        match err {
            StorageError::BucketNotFound { .. }
            | StorageError::ObjectNotFound { .. } => http::StatusCode::NOT_FOUND,
            StorageError::ValidationError { .. } => http::StatusCode::BAD_REQUEST,
            StorageError::Cancelled { .. } => http::StatusCode::SERVICE_UNAVAILABLE,
            StorageError::InfrastructureError { .. } => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for http::StatusCode {
    fn from(err: StorageError) -> Self {
        (&err).into()
    }
}
