use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn unknown_model(id: impl Into<String>) -> Self {
        Self::UnknownModel(id.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Why a completion request did not produce an answer.
///
/// These never leave the completion client as errors: each variant maps to a
/// fixed user-facing text via [`CompletionError::user_message`], which becomes
/// the bot text of the turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("completion endpoint not found")]
    EndpointNotFound,

    #[error("request rejected by the completion service (status {0})")]
    ModelUnsupported(u16),

    #[error("{0}")]
    TransportOrServer(String),

    #[error("completion failed outside the HTTP exchange: {0}")]
    Unknown(String),
}

pub const ENDPOINT_NOT_FOUND_MESSAGE: &str =
    "The API endpoint could not be found. Please contact your system administrator.";
pub const MODEL_UNAVAILABLE_MESSAGE: &str =
    "Sorry, this model is currently unavailable. Please choose a different model.";
pub const NO_RESPONSE_MESSAGE: &str = "Sorry, a response could not be retrieved.";

impl CompletionError {
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::TransportOrServer(detail.into())
    }

    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::Unknown(detail.into())
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::EndpointNotFound => ENDPOINT_NOT_FOUND_MESSAGE.to_string(),
            Self::ModelUnsupported(_) => MODEL_UNAVAILABLE_MESSAGE.to_string(),
            Self::TransportOrServer(detail) => format!("An error occurred: {detail}"),
            Self::Unknown(_) => NO_RESPONSE_MESSAGE.to_string(),
        }
    }
}
