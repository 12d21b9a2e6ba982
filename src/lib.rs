pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    ChatSession, CompletionClient, CompletionReply, ListModelsUseCase, MarkdownRenderer,
    SubmitOutcome, SubmitRejection,
};

pub use cli::Commands;

pub use connector::{
    ChatCompletionClient, CompletionConfig, Container, ContainerConfig, MockCompletionClient,
    PulldownMarkdownRenderer, Router,
};

pub use domain::{
    CompletionError, Conversation, DomainError, ModelCatalog, ModelCategory, ModelDescriptor,
    ModelGroup, PromptComposer, RequestState, SessionSnapshot, Turn, TurnOutcome,
};
