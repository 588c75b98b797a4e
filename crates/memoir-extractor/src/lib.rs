//! Memoir Extractor
//!
//! Extracts durable, categorized facts about the user from chat messages
//! using an LLM.
//!
//! # Overview
//!
//! Most chat turns carry nothing worth remembering, so the extractor first
//! keeps only substantive user messages, then groups them into batches and
//! asks the model about a whole batch in one call. Each surviving message is
//! tagged with its position in the conversation; the model echoes that
//! position in front of every fact it reports, which is how a fact is traced
//! back to the message it came from.
//!
//! # Architecture
//!
//! ```text
//! Messages → filter → batches → LLM (≤ N in flight) → line parser → Facts
//! ```
//!
//! # Key Features
//!
//! - **Filtering**: short messages, acknowledgements and non-user turns are skipped
//! - **Batching**: one LLM call per batch of messages
//! - **Bounded concurrency**: a counting semaphore caps in-flight LLM calls
//! - **Tolerant parsing**: malformed response lines are dropped one at a time
//! - **Attribution**: every fact carries its source message id and timestamp
//!
//! # Example Usage
//!
//! ```
//! use memoir_domain::Message;
//! use memoir_extractor::FactExtractor;
//! use memoir_llm::MockProvider;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let llm = MockProvider::new("[0] Fact: User likes Python. Category: preference");
//! let extractor = FactExtractor::new(Arc::new(llm));
//!
//! let messages = vec![Message::user("I love coding in Python!").with_id("msg-1")];
//! let facts = extractor.extract(&messages).await;
//!
//! assert_eq!(facts.len(), 1);
//! assert_eq!(facts[0].content, "User likes Python.");
//! assert_eq!(facts[0].source_message_id.as_deref(), Some("msg-1"));
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod filter;
mod parser;
mod prompt;
mod types;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::FactExtractor;
pub use filter::{is_candidate, select_units};
pub use parser::{parse_batch_response, BatchParse};
pub use prompt::BatchPromptBuilder;
pub use types::{ExtractionMetadata, ExtractionReport, ExtractionUnit, NO_CONTEXT};
