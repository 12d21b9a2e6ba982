pub mod ask_controller;
pub mod chat_controller;
pub mod models_controller;

pub use ask_controller::AskController;
pub use chat_controller::ChatController;
pub use models_controller::{format_model_groups, ModelsController};
