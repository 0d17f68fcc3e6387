mod blob_errors;
mod post_errors;
mod validation_errors;

pub use blob_errors::*;
pub use post_errors::*;
pub use validation_errors::*;
