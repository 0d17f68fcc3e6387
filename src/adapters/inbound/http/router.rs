use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{create_post, delete_post, list_posts, update_post};
use crate::ports::services::{PostLifecycleService, PostViewService};

/// Application state containing the services the handlers need
#[derive(Clone)]
pub struct AppState {
    pub lifecycle_service: Arc<dyn PostLifecycleService>,
    pub view_service: Arc<dyn PostViewService>,
}

/// Create the main application router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", put(update_post).delete(delete_post))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
