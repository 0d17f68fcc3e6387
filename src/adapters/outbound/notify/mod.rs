mod toast_hub;
mod tracing_sink;

pub use toast_hub::ToastHub;
pub use tracing_sink::TracingSink;
