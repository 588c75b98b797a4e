//! Memoir LLM Provider Layer
//!
//! Pluggable, async LLM clients behind the [`LlmClient`] trait.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic stand-in for testing
//! - `OpenAiProvider`: OpenAI-compatible chat completions (DeepSeek by default).
//!   Without an API key it answers with a `[MOCK MODE]` placeholder instead of failing.
//! - `OllamaProvider`: Local Ollama chat API
//!
//! # Examples
//!
//! ```
//! use memoir_llm::{LlmClient, MockProvider};
//!
//! # async fn example() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt".into()).await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod mock;
pub mod ollama;
pub mod openai;
pub mod prompt;

use async_trait::async_trait;
use thiserror::Error;

pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use prompt::{ChatMessage, Prompt};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Credential rejected by the provider
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Async request/response capability shared by every provider
///
/// A call takes either a plain prompt or a role-tagged message list and
/// returns the model's raw completion text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion
    async fn generate(&self, prompt: Prompt) -> Result<String, LlmError>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}
