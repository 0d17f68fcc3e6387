use crate::domain::{
    errors::PostResult,
    models::{PostDraft, PostEdit, PostFilter, PostView},
    value_objects::{OwnerId, PostId},
};
use crate::domain::models::Post;
use async_trait::async_trait;

/// Port for post mutations that may involve the blob store.
///
/// This is the only component allowed to pair a repository mutation with a
/// blob-store mutation; the ordering rules live behind this trait.
/// Mutations are not cancellable once started and must never run their
/// storage and record steps in parallel.
#[async_trait]
pub trait PostLifecycleService: Send + Sync + 'static {
    /// Create a post, uploading its image (if any) first
    async fn add_post(&self, owner: &OwnerId, draft: PostDraft) -> PostResult<Post>;

    /// Edit a post, applying the requested image change (keep / remove /
    /// replace) with crash-safe ordering
    async fn edit_post(&self, id: &PostId, owner: &OwnerId, edit: PostEdit) -> PostResult<Post>;

    /// Delete a post record, then best-effort delete its blob
    async fn delete_post(&self, id: &PostId, owner: &OwnerId) -> PostResult<()>;
}

/// Port for the user-facing read side: filtered lists with signed image
/// URLs attached.
#[async_trait]
pub trait PostViewService: Send + Sync + 'static {
    /// List the owner's posts per the filter, minting a signed URL for each
    /// post that has an image. A single post's signing failure degrades
    /// that post, never the whole list.
    async fn list_posts(&self, owner: &OwnerId, filter: &PostFilter) -> PostResult<Vec<PostView>>;
}
