use crate::domain::{errors::BlobResult, value_objects::ImageKey};
use async_trait::async_trait;
use bytes::Bytes;

/// Port for the binary image object store.
///
/// Keys are generated by the lifecycle service and never exposed to clients
/// as addresses; reads go through time-limited signed URLs.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Store an object under a fresh key. Never overwrites: uploading to an
    /// existing key is `AlreadyExists`.
    async fn upload(&self, key: &ImageKey, data: Bytes) -> BlobResult<()>;

    /// Delete an object. Idempotent: deleting a missing key is `Ok`.
    async fn delete(&self, key: &ImageKey) -> BlobResult<()>;

    /// Mint a signed, time-limited URL granting read access to the object
    async fn sign_url(&self, key: &ImageKey, ttl_seconds: u64) -> BlobResult<String>;

    /// Check whether an object exists under the key
    async fn exists(&self, key: &ImageKey) -> BlobResult<bool>;
}
