//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur while setting up or driving extraction
///
/// Failures inside a single batch (LLM errors, unparseable lines) are not
/// errors at this level; they reduce that batch's output to zero facts.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The blocking wrapper could not start its runtime
    #[error("Runtime error: {0}")]
    Runtime(String),
}
