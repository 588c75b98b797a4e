//! Configuration for the Extractor

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Minimum trimmed length (characters) for a message to be considered
    pub min_message_chars: usize,

    /// Maximum messages per LLM call
    pub batch_size: usize,

    /// Maximum LLM calls in flight at once
    pub max_concurrent: usize,

    /// Acknowledgements that never carry facts, matched case-insensitively
    pub skip_phrases: Vec<String>,

    /// Characters of preceding assistant context shown to the model
    pub context_preview_chars: usize,

    /// Characters of the user message shown to the model
    pub message_preview_chars: usize,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.batch_size == 0 {
            return Err(ExtractorError::Config(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        if self.max_concurrent == 0 {
            return Err(ExtractorError::Config(
                "max_concurrent must be greater than 0".to_string(),
            ));
        }
        if self.max_concurrent > Semaphore::MAX_PERMITS {
            return Err(ExtractorError::Config(format!(
                "max_concurrent must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if self.message_preview_chars == 0 {
            return Err(ExtractorError::Config(
                "message_preview_chars must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `normalized` (trimmed, lower-cased) is a skip phrase
    pub fn is_skip_phrase(&self, normalized: &str) -> bool {
        self.skip_phrases
            .iter()
            .any(|phrase| phrase.trim().to_lowercase() == normalized)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_message_chars: 20,
            batch_size: 10,
            max_concurrent: 3,
            skip_phrases: ["hi", "hello", "thanks", "ok", "thank you", "bye", "goodbye"]
                .into_iter()
                .map(String::from)
                .collect(),
            context_preview_chars: 100,
            message_preview_chars: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_message_chars, 20);
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.max_concurrent, 3);
    }

    #[test]
    fn test_invalid_batch_size() {
        let config = ExtractorConfig {
            batch_size: 0,
            ..ExtractorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_invalid_concurrency() {
        let config = ExtractorConfig {
            max_concurrent: 0,
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_concurrency_above_semaphore_limit() {
        let config = ExtractorConfig {
            max_concurrent: Semaphore::MAX_PERMITS + 1,
            ..ExtractorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ExtractorError::Config(_))));

        let config = ExtractorConfig {
            max_concurrent: Semaphore::MAX_PERMITS,
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_ok());

        assert!(matches!(
            ExtractorConfig::from_toml("max_concurrent = 4611686018427387904\n"),
            Err(ExtractorError::Config(_))
        ));
    }

    #[test]
    fn test_configured_skip_phrases_ignore_case() {
        let config = ExtractorConfig {
            skip_phrases: vec!["Thanks".to_string(), " See You ".to_string()],
            ..ExtractorConfig::default()
        };
        assert!(config.is_skip_phrase("thanks"));
        assert!(config.is_skip_phrase("see you"));
        assert!(!config.is_skip_phrase("hi"));
    }

    #[test]
    fn test_skip_phrases() {
        let config = ExtractorConfig::default();
        assert!(config.is_skip_phrase("thank you"));
        assert!(!config.is_skip_phrase("thank you so much"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml("batch_size = 4\n").unwrap();
        assert_eq!(parsed.batch_size, 4);
        assert_eq!(parsed.max_concurrent, 3);
        assert!(parsed.is_skip_phrase("ok"));
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        assert!(ExtractorConfig::from_toml("max_concurrent = 0\n").is_err());
        assert!(ExtractorConfig::from_toml("batch_size = \"ten\"\n").is_err());
    }
}
