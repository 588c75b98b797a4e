//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use memoir_extractor::ExtractorConfig;
use memoir_llm::{openai, ollama, LlmClient, MockProvider, OllamaProvider, OpenAiProvider};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Model used with Ollama when none is configured
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// LLM backend
    #[serde(default)]
    pub llm: LlmSettings,

    /// Fact extraction tuning
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Which LLM backend to talk to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Provider kind
    #[serde(default)]
    pub provider: Provider,

    /// API root; the provider default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Model name; the provider default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Environment variables searched, in order, for the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Vec<String>,

    /// Fixed reply of the `mock` provider
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mock_response: String,
}

/// LLM provider kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI-compatible chat completions (DeepSeek by default)
    #[default]
    Openai,
    /// Local Ollama server
    Ollama,
    /// Offline stand-in returning `mock_response`
    Mock,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".memoir").join("config.toml"))
    }

    /// Load configuration from `path`, or defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check the extractor section.
    pub fn validate(&self) -> Result<()> {
        self.extractor
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Build the configured LLM client, optionally overriding the provider.
    pub fn build_client(&self, provider: Option<Provider>) -> Arc<dyn LlmClient> {
        let llm = &self.llm;
        match provider.unwrap_or(llm.provider) {
            Provider::Openai => {
                let api_key = llm
                    .api_key_env
                    .iter()
                    .find_map(|name| std::env::var(name).ok());
                Arc::new(OpenAiProvider::new(
                    llm.base_url.as_deref().unwrap_or(openai::DEFAULT_BASE_URL),
                    llm.model.as_deref().unwrap_or(openai::DEFAULT_MODEL),
                    api_key,
                ))
            }
            Provider::Ollama => Arc::new(OllamaProvider::new(
                llm.base_url.as_deref().unwrap_or(ollama::DEFAULT_ENDPOINT),
                llm.model.as_deref().unwrap_or(DEFAULT_OLLAMA_MODEL),
            )),
            Provider::Mock => Arc::new(MockProvider::new(llm.mock_response.clone())),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            base_url: None,
            model: None,
            api_key_env: default_api_key_env(),
            mock_response: String::new(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_api_key_env() -> Vec<String> {
    vec!["DEEPSEEK_API_KEY".to_string(), "OPENAI_API_KEY".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
