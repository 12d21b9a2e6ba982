use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{DomainError, SubmitOutcome, SubmitRejection};

use super::super::Container;
use super::models_controller::format_model_groups;

const HELP: &str = "\
Commands:
  /model <id>   switch model
  /models       list available models
  /history      print the conversation so far
  /help         show this help
  /quit         leave the chat
Anything else is sent as a message.";

/// Line-oriented terminal surface over the chat session.
pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn run(&self) -> Result<String> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        self.run_with(stdin, &mut stdout).await
    }

    /// Drive the session from `input` until EOF or `/quit`, writing replies
    /// to `output`. Returns a closing summary line.
    pub async fn run_with<R, W>(&self, input: R, output: &mut W) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let session = self.container.session();
        let mut lines = input.lines();

        let selected = session.selected_model().await;
        let backend = if self.container.mock_completions() {
            "local mock"
        } else {
            self.container.endpoint()
        };
        output
            .write_all(
                format!("Chatting with {selected} via {backend}. Type /help for commands.\n")
                    .as_bytes(),
            )
            .await?;

        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();

            let reply = match trimmed.split_once(' ').unwrap_or((trimmed, "")) {
                ("/quit" | "/exit", _) => break,
                ("/help", _) => HELP.to_string(),
                ("/models", _) => {
                    let groups = self.container.list_models_use_case().execute();
                    format_model_groups(&groups, &session.selected_model().await)
                }
                ("/model", id) => match session.select_model(id.trim()).await {
                    Ok(()) => format!("Switched to {}", id.trim()),
                    Err(DomainError::UnknownModel(id)) => {
                        format!("Unknown model '{id}'. Type /models to see the options.")
                    }
                    Err(e) => return Err(e.into()),
                },
                ("/history", _) => self.format_history().await,
                _ => {
                    session.set_input(line.as_str()).await;
                    match session.submit().await? {
                        SubmitOutcome::Settled(turn) => format!("AI: {}", turn.bot_text()),
                        SubmitOutcome::Rejected(SubmitRejection::EmptyInput) => continue,
                        SubmitOutcome::Rejected(SubmitRejection::RequestPending) => {
                            "A request is still pending, please wait.".to_string()
                        }
                    }
                }
            };

            output.write_all(reply.as_bytes()).await?;
            output.write_all(b"\n").await?;
            output.flush().await?;
        }

        let turns = session.conversation().await.len();
        Ok(format!("Goodbye ({turns} turns)"))
    }

    async fn format_history(&self) -> String {
        let conversation = self.container.session().conversation().await;
        if conversation.is_empty() {
            return "No messages yet.".to_string();
        }

        conversation
            .iter()
            .map(|turn| format!("You: {}\nAI: {}", turn.user_text(), turn.bot_text()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
