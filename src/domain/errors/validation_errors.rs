use thiserror::Error;

/// Validation errors for domain value objects
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    // ObjectKey validation errors
    #[error("Object key cannot be empty")]
    EmptyObjectKey,
    #[error("Object key too long: {actual} bytes (max: {max})")]
    ObjectKeyTooLong { actual: usize, max: usize },
    #[error("Invalid character in object key: {0:?}")]
    InvalidObjectKeyCharacter(char),

    // BucketName validation errors
    #[error("Bucket name cannot be empty")]
    EmptyBucketName,
    #[error("Invalid character in bucket name: {0:?}")]
    InvalidBucketNameCharacter(char),

    // VersionId validation errors
    #[error("Version ID cannot be empty")]
    EmptyVersionId,
    #[error("Version ID too long: {actual} characters (max: {max})")]
    VersionIdTooLong { actual: usize, max: usize },
    #[error("Invalid character in version ID: {0:?}")]
    InvalidVersionIdCharacter(char),
}
