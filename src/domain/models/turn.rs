use serde::Serialize;

/// Whether the bot text of a turn is a model answer or a mapped failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    #[default]
    Answered,
    Failed,
}

/// One user-input / bot-response pair. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    user_text: String,
    bot_text: String,
    outcome: TurnOutcome,
}

impl Turn {
    pub fn answered(user_text: impl Into<String>, bot_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            bot_text: bot_text.into(),
            outcome: TurnOutcome::Answered,
        }
    }

    pub fn failed(user_text: impl Into<String>, bot_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            bot_text: bot_text.into(),
            outcome: TurnOutcome::Failed,
        }
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    pub fn bot_text(&self) -> &str {
        &self.bot_text
    }

    pub fn outcome(&self) -> TurnOutcome {
        self.outcome
    }

    pub fn is_failed(&self) -> bool {
        self.outcome == TurnOutcome::Failed
    }
}
