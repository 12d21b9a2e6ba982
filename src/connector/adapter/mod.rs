mod chat_completion_client;
mod mock_completion_client;
mod pulldown_markdown_renderer;

pub use chat_completion_client::*;
pub use mock_completion_client::*;
pub use pulldown_markdown_renderer::*;
