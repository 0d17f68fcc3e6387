use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    domain::{
        errors::{BlobResult, BlobStoreError},
        value_objects::ImageKey,
    },
    ports::storage::BlobStore,
};

/// In-memory implementation of BlobStore for testing and development.
///
/// Signed URLs are `memory://` URLs carrying an unguessable token and an
/// expiry timestamp; nothing ever serves them, but they make the signing
/// and degradation paths observable in tests.
#[derive(Clone)]
pub struct InMemoryBlobStore {
    objects: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored objects (test helper)
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(&self, key: &ImageKey, data: Bytes) -> BlobResult<()> {
        let mut objects = self.objects.write().await;

        if objects.contains_key(key.as_str()) {
            return Err(BlobStoreError::AlreadyExists { key: key.clone() });
        }

        objects.insert(key.as_str().to_string(), data);
        Ok(())
    }

    async fn delete(&self, key: &ImageKey) -> BlobResult<()> {
        // Idempotent: removing a missing key is fine
        self.objects.write().await.remove(key.as_str());
        Ok(())
    }

    async fn sign_url(&self, key: &ImageKey, ttl_seconds: u64) -> BlobResult<String> {
        let objects = self.objects.read().await;

        if !objects.contains_key(key.as_str()) {
            return Err(BlobStoreError::NotFound { key: key.clone() });
        }

        let expires = Utc::now().timestamp() + ttl_seconds as i64;
        Ok(format!(
            "memory://post-images/{}?token={}&expires={}",
            key,
            Uuid::new_v4().simple(),
            expires
        ))
    }

    async fn exists(&self, key: &ImageKey) -> BlobResult<bool> {
        Ok(self.objects.read().await.contains_key(key.as_str()))
    }
}
