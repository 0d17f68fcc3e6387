use object_store::aws::AmazonS3Builder;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use crate::{
    adapters::outbound::{
        notify::TracingSink,
        persistence::{InMemoryPostRepository, SqlPostRepository},
        storage::{InMemoryBlobStore, ObjectStoreBlobAdapter},
    },
    ports::{
        repositories::PostRepository,
        services::NotificationSink,
        storage::BlobStore,
    },
    services::{PostLifecycleImpl, PostViewImpl},
};

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    pub repository_backend: RepositoryBackend,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::InMemory,
            repository_backend: RepositoryBackend::InMemory,
        }
    }
}

/// Blob storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    S3 {
        bucket: String,
        region: String,
        endpoint: Option<String>,
        access_key: Option<String>,
        secret_key: Option<String>,
    },
}

/// Post record backend configuration
#[derive(Debug, Clone)]
pub enum RepositoryBackend {
    InMemory,
    Database { connection_string: String },
}

/// Application dependencies container
pub struct AppDependencies {
    pub post_repository: Arc<dyn PostRepository>,
    pub blob_store: Arc<dyn BlobStore>,
    pub notifications: Arc<dyn NotificationSink>,
}

/// Application services container
pub struct AppServices {
    pub lifecycle_service: PostLifecycleImpl,
    pub view_service: PostViewImpl,
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
    notifications: Option<Arc<dyn NotificationSink>>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            notifications: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    pub fn with_repository_backend(mut self, backend: RepositoryBackend) -> Self {
        self.config.repository_backend = backend;
        self
    }

    /// Override the notification sink (defaults to the tracing sink)
    pub fn with_notification_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.notifications = Some(sink);
        self
    }

    /// Build the application dependencies
    pub async fn build_dependencies(self) -> Result<AppDependencies, AppError> {
        let blob_store = self.create_blob_store()?;
        let post_repository = self.create_repository().await?;
        let notifications = self
            .notifications
            .unwrap_or_else(|| Arc::new(TracingSink::new()));

        Ok(AppDependencies {
            post_repository,
            blob_store,
            notifications,
        })
    }

    /// Build the complete application with services
    pub async fn build(self) -> Result<AppServices, AppError> {
        let deps = self.build_dependencies().await?;

        let lifecycle_service = PostLifecycleImpl::new(
            deps.post_repository.clone(),
            deps.blob_store.clone(),
            deps.notifications.clone(),
        );

        let view_service = PostViewImpl::new(deps.post_repository, deps.blob_store);

        Ok(AppServices {
            lifecycle_service,
            view_service,
        })
    }

    fn create_blob_store(&self) -> Result<Arc<dyn BlobStore>, AppError> {
        match &self.config.storage_backend {
            StorageBackend::InMemory => Ok(Arc::new(InMemoryBlobStore::new())),
            StorageBackend::S3 {
                bucket,
                region,
                endpoint,
                access_key,
                secret_key,
            } => {
                let mut builder = AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .with_region(region);

                if let Some(endpoint) = endpoint {
                    builder = builder.with_endpoint(endpoint);
                }
                if let Some(access_key) = access_key {
                    builder = builder.with_access_key_id(access_key);
                }
                if let Some(secret_key) = secret_key {
                    builder = builder.with_secret_access_key(secret_key);
                }

                let s3 = Arc::new(builder.build().map_err(|e| AppError::StorageInit {
                    message: format!("Failed to build S3 store: {}", e),
                })?);

                // AmazonS3 can presign, so wire it in as its own signer
                Ok(Arc::new(ObjectStoreBlobAdapter::with_signer(
                    s3.clone(),
                    s3,
                )))
            }
        }
    }

    async fn create_repository(&self) -> Result<Arc<dyn PostRepository>, AppError> {
        match &self.config.repository_backend {
            RepositoryBackend::InMemory => Ok(Arc::new(InMemoryPostRepository::new())),
            RepositoryBackend::Database { connection_string } => {
                let pool = PgPoolOptions::new()
                    .connect(connection_string)
                    .await
                    .map_err(|e| AppError::RepositoryInit {
                        message: format!("Failed to connect to database: {}", e),
                    })?;

                let repository = SqlPostRepository::new(pool);
                repository
                    .migrate()
                    .await
                    .map_err(|e| AppError::RepositoryInit {
                        message: format!("Failed to run migrations: {}", e),
                    })?;

                Ok(Arc::new(repository))
            }
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },

    #[error("Repository initialization error: {message}")]
    RepositoryInit { message: String },
}

/// Create an in-memory application for testing and development
pub async fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::InMemory)
        .with_repository_backend(RepositoryBackend::InMemory)
        .build()
        .await
}

/// Create application from environment variables
pub async fn create_app_from_env() -> Result<AppServices, AppError> {
    let storage_backend = match std::env::var("STORAGE_BACKEND").as_deref() {
        Ok("s3") => {
            let bucket = std::env::var("S3_BUCKET").map_err(|_| AppError::Configuration {
                message: "S3_BUCKET environment variable required".to_string(),
            })?;
            let region = std::env::var("S3_REGION").map_err(|_| AppError::Configuration {
                message: "S3_REGION environment variable required".to_string(),
            })?;

            StorageBackend::S3 {
                bucket,
                region,
                endpoint: std::env::var("S3_ENDPOINT").ok(),
                access_key: std::env::var("S3_ACCESS_KEY").ok(),
                secret_key: std::env::var("S3_SECRET_KEY").ok(),
            }
        }
        _ => StorageBackend::InMemory,
    };

    let repository_backend = match std::env::var("REPOSITORY_BACKEND").as_deref() {
        Ok("database") => {
            let connection_string =
                std::env::var("DATABASE_URL").map_err(|_| AppError::Configuration {
                    message: "DATABASE_URL environment variable required".to_string(),
                })?;
            RepositoryBackend::Database { connection_string }
        }
        _ => RepositoryBackend::InMemory,
    };

    AppBuilder::new()
        .with_storage_backend(storage_backend)
        .with_repository_backend(repository_backend)
        .build()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_in_memory_app() {
        let app = create_in_memory_app().await;
        assert!(app.is_ok());
    }

    #[tokio::test]
    async fn test_dependencies_creation() {
        let deps = AppBuilder::new().build_dependencies().await.unwrap();
        assert!(Arc::strong_count(&deps.post_repository) >= 1);
    }
}
