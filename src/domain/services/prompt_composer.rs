use crate::domain::Turn;

pub const DEFAULT_USER_LABEL: &str = "You";
pub const DEFAULT_ASSISTANT_LABEL: &str = "AI";

/// Flattens the conversation into one transcript-style prompt.
///
/// Every prior turn becomes `<user text>\n<assistant label>: <bot text>`, turns
/// are joined by newlines, and the new input is appended as a final
/// `<user label>: <text>` line. The whole history is always included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptComposer {
    user_label: String,
    assistant_label: String,
}

impl PromptComposer {
    pub fn new() -> Self {
        Self::with_labels(DEFAULT_USER_LABEL, DEFAULT_ASSISTANT_LABEL)
    }

    pub fn with_labels(user_label: impl Into<String>, assistant_label: impl Into<String>) -> Self {
        Self {
            user_label: user_label.into(),
            assistant_label: assistant_label.into(),
        }
    }

    pub fn compose(&self, history: &[Turn], new_user_text: &str) -> String {
        let mut lines: Vec<String> = history
            .iter()
            .map(|turn| {
                format!(
                    "{}\n{}: {}",
                    turn.user_text(),
                    self.assistant_label,
                    turn.bot_text()
                )
            })
            .collect();
        lines.push(format!("{}: {}", self.user_label, new_user_text));
        lines.join("\n")
    }
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new()
    }
}
