mod chat_session;
mod list_models;

pub use chat_session::*;
pub use list_models::*;
