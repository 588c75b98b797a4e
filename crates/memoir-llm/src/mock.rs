//! Mock LLM provider for deterministic testing

use crate::{LlmClient, LlmError, Prompt};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Handler = dyn Fn(&str) -> String + Send + Sync;

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Error,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Lookup order for a prompt: exact-match responses, then substring triggers in
/// the order they were added, then the handler closure, then the default response.
///
/// It also records how many calls were made and the largest number of calls
/// that were in progress at the same time.
///
/// # Examples
///
/// ```
/// use memoir_llm::{LlmClient, MockProvider};
///
/// # async fn example() {
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt".into()).await.unwrap(), "Fixed response");
///
/// // Multiple responses
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.respond_when_contains("Python", "response2");
/// assert_eq!(provider.generate("prompt1".into()).await.unwrap(), "response1");
/// assert_eq!(provider.generate("I like Python".into()).await.unwrap(), "response2");
/// # }
/// ```
#[derive(Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, Reply>>>,
    triggers: Arc<Mutex<Vec<(String, Reply)>>>,
    handler: Option<Arc<Handler>>,
    latency: Option<Duration>,
    call_count: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            triggers: Arc::new(Mutex::new(Vec::new())),
            handler: None,
            latency: None,
            call_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a MockProvider that computes each response from the prompt text
    pub fn from_fn<F>(handler: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let mut provider = Self::default();
        provider.handler = Some(Arc::new(handler));
        provider
    }

    /// Sleep for `latency` inside every call before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), Reply::Text(response.into()));
    }

    /// Respond with `response` whenever the prompt contains `needle`
    pub fn respond_when_contains(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.triggers
            .lock()
            .unwrap()
            .push((needle.into(), Reply::Text(response.into())));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), Reply::Error);
    }

    /// Return an error whenever the prompt contains `needle`
    pub fn fail_when_contains(&mut self, needle: impl Into<String>) {
        self.triggers
            .lock()
            .unwrap()
            .push((needle.into(), Reply::Error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Largest number of calls observed in progress simultaneously
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Reset the call count and the in-flight high-water mark
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        self.max_in_flight.store(0, Ordering::SeqCst);
    }

    fn respond(&self, text: &str) -> Result<String, LlmError> {
        let exact = self.responses.lock().unwrap().get(text).cloned();
        let reply = exact.or_else(|| {
            self.triggers
                .lock()
                .unwrap()
                .iter()
                .find(|(needle, _)| text.contains(needle.as_str()))
                .map(|(_, reply)| reply.clone())
        });

        match reply {
            Some(Reply::Text(response)) => Ok(response),
            Some(Reply::Error) => Err(LlmError::Other("Mock error".to_string())),
            None => match &self.handler {
                Some(handler) => Ok(handler(text)),
                None => Ok(self.default_response.clone()),
            },
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockProvider")
            .field("default_response", &self.default_response)
            .field("has_handler", &self.handler.is_some())
            .field("latency", &self.latency)
            .field("call_count", &self.call_count())
            .finish()
    }
}

/// Decrements the in-flight counter even if the call future is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LlmClient for MockProvider {
    async fn generate(&self, prompt: Prompt) -> Result<String, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.respond(&prompt.text())
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
