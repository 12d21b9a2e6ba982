use async_trait::async_trait;
use tracing::debug;

use crate::application::{CompletionClient, CompletionReply};

/// Offline stand-in for a completion service: echoes the last prompt line
/// back, tagged with the model it was addressed to.
pub struct MockCompletionClient;

impl MockCompletionClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, prompt: &str, model_id: &str) -> CompletionReply {
        let last_line = prompt.lines().last().unwrap_or_default();
        let message = last_line
            .split_once(": ")
            .map(|(_, text)| text)
            .unwrap_or(last_line)
            .trim();

        debug!(
            "Mock completion for {} ({} prompt lines)",
            model_id,
            prompt.lines().count()
        );

        CompletionReply::answer(format!("[{model_id}] You said: {message}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_latest_user_line() {
        let client = MockCompletionClient::new();

        let reply = client
            .complete("earlier\nAI: answer\nYou:  what now? ", "gpt-4o")
            .await;

        assert!(!reply.failed);
        assert_eq!(reply.text, "[gpt-4o] You said: what now?");
    }

    #[tokio::test]
    async fn empty_prompt_still_answers() {
        let reply = MockCompletionClient::new().complete("", "gpt-3.5-turbo").await;
        assert_eq!(reply.text, "[gpt-3.5-turbo] You said: ");
    }
}
