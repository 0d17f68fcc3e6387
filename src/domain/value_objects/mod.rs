mod image_key;
mod owner_id;
mod post_id;

pub use image_key::ImageKey;
pub use owner_id::OwnerId;
pub use post_id::PostId;
