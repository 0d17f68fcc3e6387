use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    domain::{
        errors::{PostError, PostResult},
        models::{NewPostRecord, Post, PostChanges, PostFilter, SortOrder},
        value_objects::{OwnerId, PostId},
    },
    ports::repositories::PostRepository,
};

/// In-memory implementation of PostRepository for testing and development
#[derive(Clone)]
pub struct InMemoryPostRepository {
    data: Arc<RwLock<RepositoryData>>,
}

#[derive(Default)]
struct RepositoryData {
    posts: HashMap<PostId, StoredPost>,
    next_seq: u64,
}

#[derive(Clone)]
struct StoredPost {
    post: Post,
    // Tie-breaker for posts created within the same timestamp tick
    seq: u64,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(RepositoryData::default())),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self, owner: &OwnerId, filter: &PostFilter) -> PostResult<Vec<Post>> {
        let data = self.data.read().await;

        let mut matches: Vec<&StoredPost> = data
            .posts
            .values()
            .filter(|stored| &stored.post.owner == owner)
            .filter(|stored| filter.matches(&stored.post))
            .collect();

        matches.sort_by(|a, b| {
            let ordering = a
                .post
                .created_at
                .cmp(&b.post.created_at)
                .then(a.seq.cmp(&b.seq));
            match filter.sort {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });

        Ok(matches.into_iter().map(|stored| stored.post.clone()).collect())
    }

    async fn get(&self, id: &PostId, owner: &OwnerId) -> PostResult<Post> {
        let data = self.data.read().await;

        data.posts
            .get(id)
            .filter(|stored| &stored.post.owner == owner)
            .map(|stored| stored.post.clone())
            .ok_or(PostError::NotFound { id: *id })
    }

    async fn create(&self, owner: &OwnerId, record: NewPostRecord) -> PostResult<Post> {
        if record.title.trim().is_empty() {
            return Err(PostError::validation("Title cannot be empty"));
        }

        let mut data = self.data.write().await;

        let post = Post {
            id: PostId::generate(),
            owner: owner.clone(),
            title: record.title,
            description: record.description,
            image_key: record.image_key,
            category: record.category,
            used: record.used,
            created_at: Utc::now(),
        };

        let seq = data.next_seq;
        data.next_seq += 1;
        data.posts.insert(
            post.id,
            StoredPost {
                post: post.clone(),
                seq,
            },
        );

        Ok(post)
    }

    async fn update(
        &self,
        id: &PostId,
        owner: &OwnerId,
        changes: PostChanges,
    ) -> PostResult<Post> {
        if let Some(title) = &changes.title {
            if title.trim().is_empty() {
                return Err(PostError::validation("Title cannot be empty"));
            }
        }

        let mut data = self.data.write().await;

        let stored = data
            .posts
            .get_mut(id)
            .filter(|stored| &stored.post.owner == owner)
            .ok_or(PostError::NotFound { id: *id })?;

        if let Some(title) = changes.title {
            stored.post.title = title;
        }
        if let Some(description) = changes.description {
            stored.post.description = description;
        }
        if let Some(category) = changes.category {
            stored.post.category = category;
        }
        if let Some(used) = changes.used {
            stored.post.used = used;
        }
        if let Some(image_key) = changes.image_key {
            stored.post.image_key = image_key;
        }
        // created_at is immutable

        Ok(stored.post.clone())
    }

    async fn delete(&self, id: &PostId, owner: &OwnerId) -> PostResult<()> {
        let mut data = self.data.write().await;

        let owned = data
            .posts
            .get(id)
            .map(|stored| &stored.post.owner == owner)
            .unwrap_or(false);

        if !owned {
            return Err(PostError::NotFound { id: *id });
        }

        data.posts.remove(id);
        Ok(())
    }
}
