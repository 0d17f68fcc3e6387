use crate::domain::errors::ValidationError;
use crate::domain::value_objects::OwnerId;

/// A validated key referencing an image object in the blob store.
///
/// Keys are opaque to clients and never exposed as public URLs; read access
/// goes through a signed URL minted on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey(String);

impl ImageKey {
    const MAX_LENGTH: usize = 1024;

    /// Create a new ImageKey with validation
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyImageKey);
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(ValidationError::ImageKeyTooLong {
                actual: value.len(),
                max: Self::MAX_LENGTH,
            });
        }

        for c in value.chars() {
            if c == '/' || c == '\0' {
                return Err(ValidationError::InvalidImageKeyCharacter(c));
            }
        }

        Ok(Self(value))
    }

    /// Generate a fresh upload key: `{ownerId}-{timestampMillis}.{extension}`.
    ///
    /// The owner id and extension come from the outside (auth header, file
    /// name), so the formatted key is sanitized to the same character and
    /// length rules `new` enforces.
    ///
    /// A collision requires the same owner uploading a file with the same
    /// extension within the same millisecond.
    pub fn generate(owner: &OwnerId, timestamp_millis: i64, extension: &str) -> Self {
        let mut key = format!("{}-{}.{}", owner.as_str(), timestamp_millis, extension);
        key.retain(|c| c != '/' && c != '\0');
        while key.len() > Self::MAX_LENGTH {
            key.pop();
        }
        Self(key)
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The extension part of the key (everything after the last '.')
    pub fn extension(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(_, ext)| ext)
    }
}

impl std::fmt::Display for ImageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
