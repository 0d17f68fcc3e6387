/// Validation errors for domain value objects and submitted fields
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    // OwnerId validation errors
    EmptyOwnerId,
    InvalidOwnerIdCharacter(char),

    // ImageKey validation errors
    EmptyImageKey,
    ImageKeyTooLong { actual: usize, max: usize },
    InvalidImageKeyCharacter(char),

    // Post field validation errors
    EmptyTitle,
    UnknownCategory(String),
    UnknownUsedFilter(String),
    UnknownSortOrder(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyOwnerId => write!(f, "Owner id cannot be empty"),
            ValidationError::InvalidOwnerIdCharacter(c) => {
                write!(f, "Invalid character in owner id: '{}'", c.escape_default())
            }
            ValidationError::EmptyImageKey => write!(f, "Image key cannot be empty"),
            ValidationError::ImageKeyTooLong { actual, max } => {
                write!(f, "Image key too long: {} bytes (max: {})", actual, max)
            }
            ValidationError::InvalidImageKeyCharacter(c) => {
                write!(f, "Invalid character in image key: '{}'", c.escape_default())
            }
            ValidationError::EmptyTitle => write!(f, "Title cannot be empty"),
            ValidationError::UnknownCategory(value) => {
                write!(f, "Unknown category: '{}'", value)
            }
            ValidationError::UnknownUsedFilter(value) => {
                write!(
                    f,
                    "Unknown used filter: '{}' (expected all, used, or unused)",
                    value
                )
            }
            ValidationError::UnknownSortOrder(value) => {
                write!(f, "Unknown sort order: '{}' (expected asc or desc)", value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
