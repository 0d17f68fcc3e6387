use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use object_store::{
    ObjectStore as ApacheObjectStore, PutMode, PutOptions, PutPayload, path::Path as ObjectPath,
    signer::Signer,
};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    domain::{
        errors::{BlobResult, BlobStoreError},
        value_objects::ImageKey,
    },
    ports::storage::BlobStore,
};

/// Adapter that implements our BlobStore trait using Apache object_store.
///
/// Presigning is provider-specific; a store constructed without a signer
/// (e.g. the local filesystem backend) reports `SignUnsupported` and the
/// view service degrades affected posts.
pub struct ObjectStoreBlobAdapter {
    inner: Arc<dyn ApacheObjectStore>,
    signer: Option<Arc<dyn Signer>>,
}

impl ObjectStoreBlobAdapter {
    pub fn new(store: Arc<dyn ApacheObjectStore>) -> Self {
        Self {
            inner: store,
            signer: None,
        }
    }

    pub fn with_signer(store: Arc<dyn ApacheObjectStore>, signer: Arc<dyn Signer>) -> Self {
        Self {
            inner: store,
            signer: Some(signer),
        }
    }
}

fn infrastructure_error(context: &str, err: object_store::Error) -> BlobStoreError {
    BlobStoreError::Backend {
        message: format!("{}: {}", context, err),
        source: Some(err.to_string()),
    }
}

#[async_trait]
impl BlobStore for ObjectStoreBlobAdapter {
    async fn upload(&self, key: &ImageKey, data: Bytes) -> BlobResult<()> {
        let path = ObjectPath::from(key.as_str());
        let payload = PutPayload::from_bytes(data);

        // PutMode::Create mirrors upsert=false: a key collision is an
        // error, never an overwrite.
        let options = PutOptions::from(PutMode::Create);

        self.inner
            .put_opts(&path, payload, options)
            .await
            .map_err(|e| match e {
                object_store::Error::AlreadyExists { .. } => {
                    BlobStoreError::AlreadyExists { key: key.clone() }
                }
                _ => infrastructure_error("Failed to upload image", e),
            })?;

        Ok(())
    }

    async fn delete(&self, key: &ImageKey) -> BlobResult<()> {
        let path = ObjectPath::from(key.as_str());

        match self.inner.delete(&path).await {
            Ok(()) => Ok(()),
            // Idempotent by contract: a missing key is not an error
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(infrastructure_error("Failed to delete image", e)),
        }
    }

    async fn sign_url(&self, key: &ImageKey, ttl_seconds: u64) -> BlobResult<String> {
        let signer = self.signer.as_ref().ok_or_else(|| BlobStoreError::SignUnsupported {
            reason: "store was built without a signer".to_string(),
        })?;

        let path = ObjectPath::from(key.as_str());

        let url = signer
            .signed_url(Method::GET, &path, Duration::from_secs(ttl_seconds))
            .await
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => {
                    BlobStoreError::NotFound { key: key.clone() }
                }
                _ => infrastructure_error("Failed to sign URL", e),
            })?;

        Ok(url.to_string())
    }

    async fn exists(&self, key: &ImageKey) -> BlobResult<bool> {
        let path = ObjectPath::from(key.as_str());

        match self.inner.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(infrastructure_error("Failed to check image existence", e)),
        }
    }
}
