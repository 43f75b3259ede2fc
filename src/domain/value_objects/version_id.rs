use crate::domain::errors::ValidationError;

/// Identifier of one historical state of an object
///
/// Objects written while versioning was never enabled carry the `"null"` id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionId(String);

impl VersionId {
    pub const NULL: &'static str = "null";

    /// Create a new VersionId with validation
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if value.is_empty() {
            return Err(ValidationError::EmptyVersionId);
        }

        if value.len() > 1024 {
            return Err(ValidationError::VersionIdTooLong {
                actual: value.len(),
                max: 1024,
            });
        }

        if let Some(c) = value
            .chars()
            .find(|&c| !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '.')
        {
            return Err(ValidationError::InvalidVersionIdCharacter(c));
        }

        Ok(Self(value))
    }

    pub fn null() -> Self {
        Self(Self::NULL.to_string())
    }

    /// Generate a new unique version ID
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn is_null(&self) -> bool {
        self.0 == Self::NULL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_version_id() {
        assert!(VersionId::new("v1.0.0").is_ok());
        assert!(VersionId::new("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(VersionId::new("null").unwrap().is_null());
    }

    #[test]
    fn test_invalid_version_id() {
        assert!(VersionId::new("").is_err());
        assert!(VersionId::new("version with spaces").is_err());
        assert!(VersionId::new("version/with/slashes").is_err());
        assert!(VersionId::new("x".repeat(1025)).is_err());
    }

    #[test]
    fn test_generate_version_id() {
        let v1 = VersionId::generate();
        let v2 = VersionId::generate();

        assert_ne!(v1, v2);
        assert!(!v1.is_null());
        assert!(VersionId::new(v1.as_str()).is_ok());
    }
}
