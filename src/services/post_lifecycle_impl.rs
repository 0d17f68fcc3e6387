use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

use crate::{
    domain::{
        errors::{BlobStoreError, PostError, PostResult},
        models::{
            ImageChange, NewImage, NewPostRecord, Notification, Post, PostChanges, PostDraft,
            PostEdit,
        },
        value_objects::{ImageKey, OwnerId, PostId},
    },
    ports::{repositories::PostRepository, services::NotificationSink, storage::BlobStore},
};

use crate::ports::services::PostLifecycleService;

/// The image lifecycle coordinator: sequences blob-store operations with
/// repository mutations so a post's image reference stays consistent.
///
/// Ordering rules, chosen so a crash between steps never loses a
/// still-referenced image (storage-side orphans are the only tolerated
/// inconsistency):
/// - create/replace: upload the new blob before any record write, and
///   before deleting the blob it replaces;
/// - remove: delete the blob first, but write the record even if that
///   delete fails (warned as a dangling blob);
/// - delete: delete the record first, then best-effort delete the blob.
#[derive(Clone)]
pub struct PostLifecycleImpl {
    repository: Arc<dyn PostRepository>,
    store: Arc<dyn BlobStore>,
    notifications: Arc<dyn NotificationSink>,
}

impl PostLifecycleImpl {
    pub fn new(
        repository: Arc<dyn PostRepository>,
        store: Arc<dyn BlobStore>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            repository,
            store,
            notifications,
        }
    }

    /// Upload a submitted image under a freshly generated key.
    ///
    /// Keys are timestamped at millisecond precision, so two uploads by the
    /// same owner with the same extension can collide within one tick.
    /// Uploads never overwrite; on `AlreadyExists` the next tick yields a
    /// fresh key, so wait it out and retry with a regenerated key.
    async fn upload_new_image(&self, owner: &OwnerId, image: NewImage) -> PostResult<ImageKey> {
        const MAX_KEY_ATTEMPTS: u32 = 3;

        let extension = image.extension();
        let mut attempt = 0;
        loop {
            let key = ImageKey::generate(owner, Utc::now().timestamp_millis(), extension);
            match self.store.upload(&key, image.data.clone()).await {
                Ok(()) => return Ok(key),
                Err(BlobStoreError::AlreadyExists { .. }) if attempt < MAX_KEY_ATTEMPTS => {
                    attempt += 1;
                    tokio::time::sleep(std::time::Duration::from_millis(1)).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Best-effort blob delete after the owning record mutation has already
    /// committed. A failure here leaves an orphan; it is warned, never
    /// surfaced as operation failure.
    async fn delete_blob_non_fatal(&self, key: &ImageKey, context: &str) {
        if let Err(err) = self.store.delete(key).await {
            warn!(
                key = %key,
                context,
                error = %err,
                "dangling blob: delete failed after record mutation committed"
            );
        }
    }

    fn notify(&self, notification: Notification) {
        self.notifications.publish(notification);
    }
}

#[async_trait]
impl PostLifecycleService for PostLifecycleImpl {
    async fn add_post(&self, owner: &OwnerId, draft: PostDraft) -> PostResult<Post> {
        self.notify(Notification::info("Adding post..."));

        // Validate before any storage operation
        if draft.title.trim().is_empty() {
            self.notify(Notification::error("Failed to add post"));
            return Err(PostError::validation("Title cannot be empty"));
        }

        let image_key = match draft.image {
            Some(image) => match self.upload_new_image(owner, image).await {
                Ok(key) => Some(key),
                Err(err) => {
                    self.notify(Notification::error("Failed to add post"));
                    return Err(err);
                }
            },
            None => None,
        };

        let record = NewPostRecord {
            title: draft.title,
            description: draft.description,
            image_key: image_key.clone(),
            category: draft.category,
            used: draft.used,
        };

        match self.repository.create(owner, record).await {
            Ok(post) => {
                self.notify(Notification::success("Post added"));
                Ok(post)
            }
            Err(err) => {
                // The upload already succeeded; the blob is orphaned with a
                // trace rather than rolled back.
                if let Some(key) = image_key {
                    warn!(
                        key = %key,
                        error = %err,
                        "dangling blob: record insert failed after upload"
                    );
                }
                self.notify(Notification::error("Failed to add post"));
                Err(err)
            }
        }
    }

    async fn edit_post(&self, id: &PostId, owner: &OwnerId, edit: PostEdit) -> PostResult<Post> {
        self.notify(Notification::info("Saving post..."));

        if edit.title.trim().is_empty() {
            self.notify(Notification::error("Failed to save post"));
            return Err(PostError::validation("Title cannot be empty"));
        }

        // Owner-scoped fetch; also yields the existing key for the image
        // state machine.
        let existing = match self.repository.get(id, owner).await {
            Ok(post) => post,
            Err(err) => {
                self.notify(Notification::error("Failed to save post"));
                return Err(err);
            }
        };

        let result = self.apply_edit(id, owner, existing, edit).await;
        match &result {
            Ok(_) => self.notify(Notification::success("Post saved")),
            Err(_) => self.notify(Notification::error("Failed to save post")),
        }
        result
    }

    async fn delete_post(&self, id: &PostId, owner: &OwnerId) -> PostResult<()> {
        self.notify(Notification::info("Deleting post..."));

        // Learn the image key before the record disappears
        let existing = match self.repository.get(id, owner).await {
            Ok(post) => post,
            Err(err) => {
                self.notify(Notification::error("Failed to delete post"));
                return Err(err);
            }
        };

        // Record first: once it is gone the user-visible entity is gone,
        // and a failed blob delete can only leave an orphan.
        if let Err(err) = self.repository.delete(id, owner).await {
            self.notify(Notification::error("Failed to delete post"));
            return Err(err);
        }

        if let Some(key) = existing.image_key {
            self.delete_blob_non_fatal(&key, "delete_post").await;
        }

        self.notify(Notification::success("Post deleted"));
        Ok(())
    }
}

impl PostLifecycleImpl {
    /// The per-mutation state machine over (existing key, requested image
    /// change). Storage and record steps run strictly sequentially;
    /// correctness depends on their relative order, not throughput.
    async fn apply_edit(
        &self,
        id: &PostId,
        owner: &OwnerId,
        existing: Post,
        edit: PostEdit,
    ) -> PostResult<Post> {
        let mut changes = PostChanges {
            title: Some(edit.title),
            description: Some(edit.description),
            category: Some(edit.category),
            used: Some(edit.used),
            image_key: None,
        };

        match (existing.image_key, edit.image) {
            // No stored image and nothing to store: plain record write.
            (None, ImageChange::Keep) | (None, ImageChange::Remove) => {
                changes.image_key = Some(None);
                self.repository.update(id, owner, changes).await
            }

            // Upload first; a failed upload leaves the record untouched.
            (None, ImageChange::Replace(image)) => {
                let key = self.upload_new_image(owner, image).await?;
                changes.image_key = Some(Some(key));
                self.repository.update(id, owner, changes).await
            }

            // Delete the old blob, then write the record regardless of the
            // delete's outcome: the user asked for the image to be gone.
            (Some(old_key), ImageChange::Remove) => {
                if let Err(err) = self.store.delete(&old_key).await {
                    warn!(
                        key = %old_key,
                        error = %err,
                        "dangling blob: delete failed while removing image"
                    );
                }
                changes.image_key = Some(None);
                self.repository.update(id, owner, changes).await
            }

            // Upload the replacement before deleting the old blob, so a
            // failed upload never destroys the still-valid old image. The
            // final delete is best-effort.
            (Some(old_key), ImageChange::Replace(image)) => {
                let new_key = self.upload_new_image(owner, image).await?;
                changes.image_key = Some(Some(new_key));
                let post = self.repository.update(id, owner, changes).await?;
                self.delete_blob_non_fatal(&old_key, "replace_image").await;
                Ok(post)
            }

            // No storage operation; the record write preserves the key.
            (Some(old_key), ImageChange::Keep) => {
                changes.image_key = Some(Some(old_key));
                self.repository.update(id, owner, changes).await
            }
        }
    }
}
