use crate::domain::errors::ValidationError;

/// A bucket name taken from the first path segment of a request
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketName(String);

impl BucketName {
    /// Accepts any non-empty segment without `/` or NUL.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if value.is_empty() {
            return Err(ValidationError::EmptyBucketName);
        }

        if let Some(c) = value.chars().find(|&c| c == '/' || c == '\0') {
            return Err(ValidationError::InvalidBucketNameCharacter(c));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BucketName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for BucketName {
    type Error = ValidationError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        BucketName::new(name)
    }
}
