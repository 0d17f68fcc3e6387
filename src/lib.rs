pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core business entities and value objects
pub use domain::{
    BlobStoreError,
    Category,
    DomainValidationError,
    ImageChange,
    // Value objects
    ImageKey,
    NewImage,
    NewPostRecord,
    Notification,
    NotificationKind,
    OwnerId,
    // Models
    Post,
    PostChanges,
    PostDraft,
    PostEdit,
    // Errors
    PostError,
    PostFilter,
    PostId,
    PostView,
    SortOrder,
    UsedFilter,
};

// Port types - interfaces for external systems
pub use ports::{
    // Storage ports
    BlobStore,
    // Notification port
    NotificationSink,
    PostLifecycleService,
    // Repository ports
    PostRepository,
    // Service ports
    PostViewService,
};

// Service implementations - business logic
pub use services::{PostLifecycleImpl, PostViewImpl, SIGNED_URL_TTL_SECONDS};

// Application factory and configuration
pub use app::{
    AppBuilder, AppConfig, AppDependencies, AppError, AppServices, RepositoryBackend,
    StorageBackend, create_app_from_env, create_in_memory_app,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::{
    notify::{ToastHub, TracingSink},
    persistence::{InMemoryPostRepository, SqlPostRepository},
    storage::{InMemoryBlobStore, ObjectStoreBlobAdapter},
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        AppBuilder, AppServices, BlobStore, Category, ImageChange, ImageKey, InMemoryBlobStore,
        InMemoryPostRepository, NewImage, NotificationSink, OwnerId, PostDraft, PostEdit,
        PostFilter, PostId, PostLifecycleImpl, PostLifecycleService, PostRepository,
        PostViewImpl, PostViewService, SortOrder, UsedFilter, create_in_memory_app,
    };
}
