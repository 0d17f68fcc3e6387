mod notifications;
mod post_service;

pub use notifications::NotificationSink;
pub use post_service::{PostLifecycleService, PostViewService};
