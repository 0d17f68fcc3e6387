mod post_lifecycle_impl;
mod post_view_impl;

pub use post_lifecycle_impl::PostLifecycleImpl;
pub use post_view_impl::{PostViewImpl, SIGNED_URL_TTL_SECONDS};
