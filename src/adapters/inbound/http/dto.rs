use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::PostError,
    models::{Post, PostFilter, PostView},
    value_objects::PostId,
};

/// DTO for a post as shown to clients. `image_key` is the stable handle
/// for edit/delete; `signed_url` (when present) is the temporary display
/// address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDto {
    pub id: PostId,
    pub title: String,
    pub description: String,
    pub image_key: Option<String>,
    pub signed_url: Option<String>,
    pub category: Option<String>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            description: post.description,
            image_key: post.image_key.map(|k| k.as_str().to_string()),
            signed_url: None,
            category: post.category.map(|c| c.as_str().to_string()),
            used: post.used,
            created_at: post.created_at,
        }
    }
}

impl From<PostView> for PostDto {
    fn from(view: PostView) -> Self {
        let mut dto = PostDto::from(view.post);
        dto.signed_url = view.signed_url;
        dto
    }
}

/// Query parameters for listing posts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsQuery {
    pub sort: Option<String>,
    pub category: Option<String>,
    pub used: Option<String>,
}

impl ListPostsQuery {
    /// Convert the raw query strings into a filter; unknown values are a
    /// client error.
    pub fn into_filter(self) -> Result<PostFilter, PostError> {
        let mut filter = PostFilter::new();

        if let Some(sort) = self.sort.as_deref().filter(|s| !s.is_empty()) {
            filter.sort = sort.parse().map_err(PostError::from)?;
        }
        if let Some(category) = self.category.as_deref().filter(|s| !s.is_empty()) {
            filter.category = Some(category.parse().map_err(PostError::from)?);
        }
        if let Some(used) = self.used.as_deref().filter(|s| !s.is_empty()) {
            filter.used = used.parse().map_err(PostError::from)?;
        }

        Ok(filter)
    }
}

/// DTO for the post list response
#[derive(Debug, Clone, Serialize)]
pub struct ListPostsResponseDto {
    pub posts: Vec<PostDto>,
    pub total_count: usize,
}

/// DTO for error responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub error: String,
    pub message: String,
}

impl ErrorResponseDto {
    pub fn bad_request(message: &str) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.to_string(),
        }
    }

    pub fn unauthorized(message: &str) -> Self {
        Self {
            error: "unauthorized".to_string(),
            message: message.to_string(),
        }
    }

    pub fn from_post_error(err: &PostError) -> Self {
        let error = match err {
            PostError::Validation { .. } => "validation",
            PostError::NotFound { .. } => "not_found",
            PostError::BackendUnavailable { .. } => "backend_unavailable",
        };
        Self {
            error: error.to_string(),
            message: err.to_string(),
        }
    }
}

/// DTO for simple success responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponseDto {
    pub message: String,
}

impl SuccessResponseDto {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Category, SortOrder, UsedFilter};

    #[test]
    fn test_query_defaults_to_desc_all() {
        let filter = ListPostsQuery::default().into_filter().unwrap();
        assert_eq!(filter.sort, SortOrder::Descending);
        assert_eq!(filter.category, None);
        assert_eq!(filter.used, UsedFilter::All);
    }

    #[test]
    fn test_query_parses_all_fields() {
        let query = ListPostsQuery {
            sort: Some("asc".to_string()),
            category: Some("E-commerce".to_string()),
            used: Some("unused".to_string()),
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.sort, SortOrder::Ascending);
        assert_eq!(filter.category, Some(Category::Ecommerce));
        assert_eq!(filter.used, UsedFilter::Unused);
    }

    #[test]
    fn test_query_rejects_unknown_values() {
        let query = ListPostsQuery {
            sort: None,
            category: Some("Gardening".to_string()),
            used: None,
        };
        assert!(query.into_filter().is_err());
    }

    #[test]
    fn test_empty_strings_mean_unset() {
        let query = ListPostsQuery {
            sort: Some(String::new()),
            category: Some(String::new()),
            used: Some(String::new()),
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter, PostFilter::new());
    }
}
