use serde::Serialize;

use super::Conversation;

/// Single-flight guard of a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }
}

/// Everything a rendering surface needs to draw a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub conversation: Conversation,
    pub selected_model: String,
    pub request_state: RequestState,
    pub input_buffer: String,
}

impl SessionSnapshot {
    pub fn new(selected_model: impl Into<String>) -> Self {
        Self {
            conversation: Conversation::new(),
            selected_model: selected_model.into(),
            request_state: RequestState::Idle,
            input_buffer: String::new(),
        }
    }
}
