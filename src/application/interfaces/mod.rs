mod completion_client;
mod markdown_renderer;

pub use completion_client::*;
pub use markdown_renderer::*;
