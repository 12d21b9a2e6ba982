use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::{CompletionClient, CompletionReply};
use crate::domain::CompletionError;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

const SYSTEM_PERSONA: &str = "You are an excellent AI assistant.";

/// Catalog ids starting with this prefix are not callable through the
/// general chat endpoint and are sent as [`REASONING_FALLBACK_MODEL`].
const REASONING_MODEL_PREFIX: &str = "o1";
const REASONING_FALLBACK_MODEL: &str = "gpt-4";

/// Connection settings for [`ChatCompletionClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub api_key: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CompletionConfig {
    /// Construct from environment variables:
    ///
    /// | Variable       | Default                                      |
    /// |----------------|----------------------------------------------|
    /// | `API_ENDPOINT` | `https://api.openai.com/v1/chat/completions` |
    /// | `TEMPERATURE`  | `0.5`                                        |
    /// | `API_KEY`      | `""` (requests will fail authentication)     |
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let endpoint = lookup("API_ENDPOINT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let api_key = lookup("API_KEY").unwrap_or_default();
        let temperature = match lookup("TEMPERATURE") {
            Some(raw) => parse_temperature(&raw).unwrap_or_else(|| {
                warn!(
                    "Ignoring invalid TEMPERATURE '{}', using {}",
                    raw, DEFAULT_TEMPERATURE
                );
                DEFAULT_TEMPERATURE
            }),
            None => DEFAULT_TEMPERATURE,
        };

        Self {
            endpoint,
            api_key,
            temperature,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

pub fn parse_temperature(raw: &str) -> Option<f32> {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|t| t.is_finite() && *t >= 0.0)
}

/// The identifier actually sent to the service for a selected catalog id.
pub fn effective_model_id(model_id: &str) -> &str {
    if model_id.starts_with(REASONING_MODEL_PREFIX) {
        REASONING_FALLBACK_MODEL
    } else {
        model_id
    }
}

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    temperature: f32,
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// HTTP client for chat-completions style endpoints (`POST` with a
/// `messages` array, answer in `choices[0].message.content`).
///
/// Each call is a single attempt bounded by the configured timeout. Failures
/// are classified into [`CompletionError`] by [`ChatCompletionClient::request`]
/// and turned into user-facing text by the [`CompletionClient`] impl.
pub struct ChatCompletionClient {
    client: reqwest::Client,
    config: CompletionConfig,
}

impl ChatCompletionClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    /// Send one completion request and return the trimmed answer text.
    pub async fn request(&self, prompt: &str, model_id: &str) -> Result<String, CompletionError> {
        let model = effective_model_id(model_id);
        if model != model_id {
            debug!("Sending model {} as {}", model_id, model);
        }

        let request = ApiRequest {
            model,
            messages: vec![
                ApiMessage {
                    role: "system",
                    content: SYSTEM_PERSONA,
                },
                ApiMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
        };

        debug!(
            "POST {} (model={}, prompt_chars={})",
            self.config.endpoint,
            model,
            prompt.chars().count()
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Completion endpoint returned {status}: {body}");
            return Err(classify_status(status));
        }

        // The client timeout also bounds the body read, so a stalled body is a timeout too.
        let body = response
            .bytes()
            .await
            .map_err(|e| self.classify_transport_error(e))?;
        let api_response: ApiResponse = serde_json::from_slice(&body)
            .map_err(|e| CompletionError::transport(format!("failed to parse response: {e}")))?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| CompletionError::transport("response contained no choices"))
    }

    /// Classifies failures of sending the request or reading the response body.
    fn classify_transport_error(&self, err: reqwest::Error) -> CompletionError {
        if err.is_builder() {
            CompletionError::unknown(err.to_string())
        } else if err.is_timeout() {
            CompletionError::transport(format!(
                "timeout of {}ms exceeded",
                self.config.timeout.as_millis()
            ))
        } else {
            CompletionError::transport(err.to_string())
        }
    }
}

fn classify_status(status: StatusCode) -> CompletionError {
    if status == StatusCode::NOT_FOUND {
        CompletionError::EndpointNotFound
    } else if status.is_client_error() {
        CompletionError::ModelUnsupported(status.as_u16())
    } else {
        CompletionError::transport(format!(
            "request failed with status code {}",
            status.as_u16()
        ))
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete(&self, prompt: &str, model_id: &str) -> CompletionReply {
        match self.request(prompt, model_id).await {
            Ok(text) => CompletionReply::answer(text),
            Err(err) => {
                warn!("Completion failed: {err}");
                CompletionReply::failure(err.user_message())
            }
        }
    }
}
