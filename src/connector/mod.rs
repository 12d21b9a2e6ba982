//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Chat-completion HTTP client (plus an offline mock)
//! - Markdown rendering of bot output
//! - Terminal and HTTP surfaces over the chat session

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
