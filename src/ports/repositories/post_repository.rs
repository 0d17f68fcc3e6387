use crate::domain::{
    errors::PostResult,
    models::{NewPostRecord, Post, PostChanges, PostFilter},
    value_objects::{OwnerId, PostId},
};
use async_trait::async_trait;

/// Repository for post records.
///
/// Owner scoping is mandatory on every operation: no query or mutation may
/// touch another owner's records. The repository never performs blob-store
/// side effects; pairing record and blob mutations is the lifecycle
/// service's job alone.
///
/// Updates are last-write-wins; there is no optimistic concurrency token,
/// so concurrent edits to the same post from two sessions silently race.
#[async_trait]
pub trait PostRepository: Send + Sync + 'static {
    /// List the owner's posts matching the filter, ordered by created_at
    /// per `filter.sort`. An empty match is `Ok(vec![])`, not an error.
    async fn list(&self, owner: &OwnerId, filter: &PostFilter) -> PostResult<Vec<Post>>;

    /// Fetch a single post owned by `owner`; `NotFound` otherwise
    async fn get(&self, id: &PostId, owner: &OwnerId) -> PostResult<Post>;

    /// Insert a new record, assigning id and created_at.
    /// Fails with `Validation` if the title is empty.
    async fn create(&self, owner: &OwnerId, record: NewPostRecord) -> PostResult<Post>;

    /// Apply a partial update; `NotFound` if no post with `id` is owned by
    /// `owner`. Changing the title to an empty string is `Validation`.
    async fn update(&self, id: &PostId, owner: &OwnerId, changes: PostChanges)
        -> PostResult<Post>;

    /// Delete the record; `NotFound` under the same ownership condition.
    /// Deleting a record that still carries an image key does not touch the
    /// blob.
    async fn delete(&self, id: &PostId, owner: &OwnerId) -> PostResult<()>;
}
