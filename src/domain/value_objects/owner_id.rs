use crate::domain::errors::ValidationError;

/// The identity of the authenticated user that owns a set of posts.
///
/// Supplied by the external authentication provider; the core treats it as
/// an opaque string and never starts a query without one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerId(String);

impl OwnerId {
    /// Create a new OwnerId with validation
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyOwnerId);
        }

        if value.contains('\0') {
            return Err(ValidationError::InvalidOwnerIdCharacter('\0'));
        }

        Ok(Self(value))
    }

    /// Get the owner id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
