use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::domain::models::Category;
use crate::domain::value_objects::{ImageKey, OwnerId, PostId};

/// A user-owned post record.
///
/// `image_key` is either `None` or references an object that exists in the
/// blob store at read time, except during the bounded window while a
/// mutation is in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub owner: OwnerId,
    pub title: String,
    pub description: String,
    pub image_key: Option<ImageKey>,
    pub category: Option<Category>,
    pub used: bool,
    /// Immutable; default sort key for list queries
    pub created_at: DateTime<Utc>,
}

/// Fields for a new post record. The repository assigns id and created_at.
#[derive(Debug, Clone)]
pub struct NewPostRecord {
    pub title: String,
    pub description: String,
    pub image_key: Option<ImageKey>,
    pub category: Option<Category>,
    pub used: bool,
}

/// Partial update to a post record. Unset fields keep their stored value;
/// `category` and `image_key` distinguish "leave alone" (outer `None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Option<Category>>,
    pub used: Option<bool>,
    pub image_key: Option<Option<ImageKey>>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.used.is_none()
            && self.image_key.is_none()
    }
}

/// An image submitted alongside a post, before it has a storage key
#[derive(Debug, Clone)]
pub struct NewImage {
    pub file_name: String,
    pub data: Bytes,
}

impl NewImage {
    pub fn new(file_name: impl Into<String>, data: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            data,
        }
    }

    /// The extension used when generating the storage key: the last
    /// '.'-separated segment of the submitted file name (the whole name
    /// when it has no dot, matching `name.split('.').pop()`).
    pub fn extension(&self) -> &str {
        self.file_name.rsplit('.').next().unwrap_or("")
    }
}

/// What the caller submitted on "add"
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub used: bool,
    pub image: Option<NewImage>,
}

/// The requested change to a post's image on "edit"
#[derive(Debug, Clone, Default)]
pub enum ImageChange {
    /// Neither removing nor uploading; the stored key is preserved
    #[default]
    Keep,
    /// Detach and delete the current image, if any
    Remove,
    /// Upload a new image, replacing the current one if present
    Replace(NewImage),
}

/// What the caller submitted on "edit". The edit form submits every text
/// field, so title/description/category/used are full values, not deltas;
/// the image is a tri-state request.
#[derive(Debug, Clone)]
pub struct PostEdit {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub used: bool,
    pub image: ImageChange,
}

/// A post prepared for display: the record plus a freshly minted signed URL
/// for its image, when it has one and signing succeeded.
///
/// The raw `image_key` stays available on the inner post because display
/// URLs are not stable identifiers; edit/delete flows need the key.
#[derive(Debug, Clone, PartialEq)]
pub struct PostView {
    pub post: Post,
    /// `None` when the post has no image or its signing degraded
    pub signed_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_extension() {
        let image = NewImage::new("photo.PNG.jpeg", Bytes::from_static(b"x"));
        assert_eq!(image.extension(), "jpeg");

        let no_dot = NewImage::new("photo", Bytes::from_static(b"x"));
        assert_eq!(no_dot.extension(), "photo");
    }

    #[test]
    fn test_post_changes_is_empty() {
        assert!(PostChanges::default().is_empty());

        let changes = PostChanges {
            image_key: Some(None),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
