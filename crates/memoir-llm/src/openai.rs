//! OpenAI-compatible Provider Implementation
//!
//! Talks to any endpoint that implements the OpenAI chat completions API.
//! DeepSeek is the default target.
//!
//! # Placeholder mode
//!
//! When no API key is configured the provider does not fail. Every call returns
//! a response starting with [`PLACEHOLDER_PREFIX`] so the rest of the pipeline
//! can run end-to-end while disconnected.
//!
//! # Examples
//!
//! ```no_run
//! use memoir_llm::{LlmClient, OpenAiProvider};
//!
//! # async fn example() -> Result<(), memoir_llm::LlmError> {
//! let provider = OpenAiProvider::from_env(["DEEPSEEK_API_KEY", "OPENAI_API_KEY"]);
//! let answer = provider.generate("Say hello".into()).await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

use crate::{ChatMessage, LlmClient, LlmError, Prompt};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

/// Default model
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Default timeout for LLM requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Every placeholder response starts with this marker
pub const PLACEHOLDER_PREFIX: &str = "[MOCK MODE]";

const PLACEHOLDER_RESPONSE: &str =
    "[MOCK MODE] I cannot generate real responses without an API key. Please set one and restart.";

/// Chat completions client for OpenAI-compatible APIs
pub struct OpenAiProvider {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider
    ///
    /// # Parameters
    ///
    /// - `base_url`: API root without the `/chat/completions` suffix
    /// - `model`: model identifier
    /// - `api_key`: bearer token; `None` enables placeholder mode
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        let api_key = api_key.filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            warn!("No LLM API key configured; responses will be placeholders");
        }

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client,
        }
    }

    /// DeepSeek defaults, with the key read from the first set variable in `vars`
    pub fn from_env<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let api_key = vars
            .into_iter()
            .find_map(|name| std::env::var(name.as_ref()).ok());
        Self::new(DEFAULT_BASE_URL, DEFAULT_MODEL, api_key)
    }

    /// Whether calls return the placeholder instead of hitting the network
    pub fn is_placeholder(&self) -> bool {
        self.api_key.is_none()
    }

    async fn complete(&self, api_key: &str, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: &messages,
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status {
                reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                    LlmError::Authentication(format!("HTTP {}: {}", status, error_text))
                }
                reqwest::StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(self.model.clone()),
                reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
                _ => LlmError::Communication(format!("HTTP {}: {}", status, error_text)),
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Response had no content".to_string()))
    }
}

#[async_trait]
impl LlmClient for OpenAiProvider {
    async fn generate(&self, prompt: Prompt) -> Result<String, LlmError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(PLACEHOLDER_RESPONSE.to_string());
        };

        let messages = prompt.into_messages();
        debug!(model = %self.model, messages = messages.len(), "chat completion request");
        self.complete(api_key, messages).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
