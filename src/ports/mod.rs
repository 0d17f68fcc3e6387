pub mod repositories;
pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use repositories::PostRepository;
pub use services::{NotificationSink, PostLifecycleService, PostViewService};
pub use storage::BlobStore;
