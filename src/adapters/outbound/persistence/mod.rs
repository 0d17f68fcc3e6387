mod in_memory_post_repository;
mod sql_post_repository;

pub use in_memory_post_repository::InMemoryPostRepository;
pub use sql_post_repository::SqlPostRepository;
