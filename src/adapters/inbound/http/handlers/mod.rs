mod post_handlers;

pub use post_handlers::{create_post, delete_post, list_posts, update_post};
