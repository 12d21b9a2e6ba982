use anyhow::{bail, Result};

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController, ModelsController};

pub struct Router<'a> {
    ask_controller: AskController<'a>,
    chat_controller: ChatController<'a>,
    models_controller: ModelsController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            ask_controller: AskController::new(container),
            chat_controller: ChatController::new(container),
            models_controller: ModelsController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Chat => self.chat_controller.run().await,
            Commands::Ask { message, html } => self.ask_controller.ask(message, html).await,
            Commands::Models => self.models_controller.list().await,
            Commands::Serve { .. } => bail!("the serve command is handled by the HTTP server"),
        }
    }
}
