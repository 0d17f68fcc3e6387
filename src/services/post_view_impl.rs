use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tracing::warn;

use crate::{
    domain::{
        errors::PostResult,
        models::{Post, PostFilter, PostView},
        value_objects::OwnerId,
    },
    ports::{repositories::PostRepository, services::PostViewService, storage::BlobStore},
};

/// How long a minted signed URL stays valid
pub const SIGNED_URL_TTL_SECONDS: u64 = 60 * 60;

/// The user-facing read side: filtered repository reads composed with
/// signed-URL resolution.
#[derive(Clone)]
pub struct PostViewImpl {
    repository: Arc<dyn PostRepository>,
    store: Arc<dyn BlobStore>,
}

impl PostViewImpl {
    pub fn new(repository: Arc<dyn PostRepository>, store: Arc<dyn BlobStore>) -> Self {
        Self { repository, store }
    }

    /// Resolve one post to its view. Signing failures degrade the post to
    /// "no image" rather than failing the list; the raw key stays on the
    /// record for later edit/delete.
    async fn resolve(&self, post: Post) -> PostView {
        let signed_url = match &post.image_key {
            Some(key) => match self.store.sign_url(key, SIGNED_URL_TTL_SECONDS).await {
                Ok(url) => Some(url),
                Err(err) => {
                    warn!(
                        key = %key,
                        post_id = %post.id,
                        error = %err,
                        "signed URL minting failed; degrading post to no image"
                    );
                    None
                }
            },
            None => None,
        };

        PostView { post, signed_url }
    }
}

#[async_trait]
impl PostViewService for PostViewImpl {
    async fn list_posts(&self, owner: &OwnerId, filter: &PostFilter) -> PostResult<Vec<PostView>> {
        let posts = self.repository.list(owner, filter).await?;

        // Signing is order-independent with no shared mutable state, so it
        // may run concurrently across posts. join_all preserves the
        // repository's ordering.
        let views = join_all(posts.into_iter().map(|post| self.resolve(post))).await;

        Ok(views)
    }
}
