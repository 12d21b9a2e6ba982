use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::application::{CompletionClient, MarkdownRenderer};
use crate::{
    ChatCompletionClient, ChatSession, CompletionConfig, ListModelsUseCase, MockCompletionClient,
    ModelCatalog, PulldownMarkdownRenderer,
};

#[derive(Default)]
pub struct ContainerConfig {
    pub completion: CompletionConfig,
    /// Answer locally with [`MockCompletionClient`] instead of calling the
    /// completion endpoint.
    pub mock_completions: bool,
    /// Model selected when the session starts; the catalog default otherwise.
    pub initial_model: Option<String>,
}

pub struct Container {
    catalog: Arc<ModelCatalog>,
    session: ChatSession,
    renderer: Arc<dyn MarkdownRenderer>,
    config: ContainerConfig,
}

impl Container {
    pub async fn new(config: ContainerConfig) -> Result<Self> {
        let catalog = Arc::new(ModelCatalog::builtin());

        let client: Arc<dyn CompletionClient> = if config.mock_completions {
            debug!("Using mock completion client");
            Arc::new(MockCompletionClient::new())
        } else {
            if !config.completion.has_api_key() {
                warn!("API_KEY is not set; completion requests will be sent without a credential");
            }
            debug!(
                "Using completion endpoint {} (temperature {})",
                config.completion.endpoint, config.completion.temperature
            );
            Arc::new(ChatCompletionClient::new(config.completion.clone()))
        };

        let session = ChatSession::new(client, catalog.clone());
        if let Some(model) = config.initial_model.as_deref() {
            session.select_model(model).await?;
        }

        Ok(Self {
            catalog,
            session,
            renderer: Arc::new(PulldownMarkdownRenderer::new()),
            config,
        })
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn list_models_use_case(&self) -> ListModelsUseCase {
        ListModelsUseCase::new(self.catalog.clone())
    }

    pub fn renderer(&self) -> Arc<dyn MarkdownRenderer> {
        self.renderer.clone()
    }

    pub fn endpoint(&self) -> &str {
        &self.config.completion.endpoint
    }

    pub fn mock_completions(&self) -> bool {
        self.config.mock_completions
    }
}
