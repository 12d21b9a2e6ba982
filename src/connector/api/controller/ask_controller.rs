use anyhow::{bail, Result};

use crate::{SubmitOutcome, SubmitRejection};

use super::super::Container;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(&self, message: String, html: bool) -> Result<String> {
        let session = self.container.session();
        session.set_input(message).await;

        match session.submit().await? {
            SubmitOutcome::Settled(turn) if html => {
                Ok(self.container.renderer().render(turn.bot_text()))
            }
            SubmitOutcome::Settled(turn) => Ok(turn.bot_text().to_string()),
            SubmitOutcome::Rejected(SubmitRejection::EmptyInput) => {
                bail!("Nothing to send: the message is empty")
            }
            SubmitOutcome::Rejected(SubmitRejection::RequestPending) => {
                bail!("Another request is still pending")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContainerConfig;

    async fn mock_container() -> Container {
        Container::new(ContainerConfig {
            mock_completions: true,
            ..ContainerConfig::default()
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn prints_bot_text() {
        let container = mock_container().await;
        let output = AskController::new(&container)
            .ask("hello".to_string(), false)
            .await
            .unwrap();

        assert_eq!(output, "[gpt-4o] You said: hello");
    }

    #[tokio::test]
    async fn html_flag_renders_markup() {
        let container = mock_container().await;
        let output = AskController::new(&container)
            .ask("*hi*".to_string(), true)
            .await
            .unwrap();

        assert_eq!(output, "<p>[gpt-4o] You said: <em>hi</em></p>\n");
    }

    #[tokio::test]
    async fn blank_message_is_an_error() {
        let container = mock_container().await;
        let result = AskController::new(&container).ask("   ".to_string(), false).await;

        assert!(result.is_err());
        assert!(container.session().conversation().await.is_empty());
    }
}
