use async_trait::async_trait;

/// Sends one prompt to a chat-completion service and returns the text to show
/// as the bot side of a turn.
///
/// Implementors never fail outward: transport and service errors are mapped to
/// a user-facing message and returned as the text itself, so a caller always
/// gets something renderable. [`CompletionReply::failed`] tells the two apart.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str, model_id: &str) -> CompletionReply;
}

/// Text produced by a [`CompletionClient`], tagged with whether it is an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReply {
    pub text: String,
    pub failed: bool,
}

impl CompletionReply {
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failed: false,
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failed: true,
        }
    }
}
