//! Memoir Importer
//!
//! Reconstructs linear conversations from provider chat-history exports.
//!
//! # Overview
//!
//! Each provider exports history in its own shape:
//!
//! - **ChatGPT** stores every conversation as a tree of nodes linked by parent
//!   ids. Regenerated answers create sibling branches, so the importer picks the
//!   most recently produced leaf and walks back to the root.
//! - **Claude** stores an already-linear list of messages.
//!
//! Both importers share one contract: the output preserves the order of records
//! in the file, a single malformed record is skipped rather than failing the
//! import, and only a file that is not a JSON array is an error.
//!
//! # Architecture
//!
//! ```text
//! export bytes → Importer → Vec<Conversation> → Extractor
//! ```
//!
//! # Example Usage
//!
//! ```
//! use memoir_importer::{ExportFormat, Importer};
//!
//! let json = br#"[{"uuid": "c1", "name": "Demo", "chat_messages": [
//!     {"sender": "human", "text": "Hello there"},
//!     {"sender": "assistant", "text": "Hi!"}
//! ]}]"#;
//!
//! let importer = ExportFormat::Claude.importer();
//! let conversations = importer.import_slice(json).unwrap();
//! assert_eq!(conversations[0].messages.len(), 2);
//! ```

#![warn(missing_docs)]

mod chatgpt;
mod claude;
mod error;
mod format;
mod timestamp;

pub use chatgpt::ChatGptImporter;
pub use claude::ClaudeImporter;
pub use error::ImportError;
pub use format::ExportFormat;

use memoir_domain::Conversation;
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Converts one provider's export into conversations
pub trait Importer {
    /// Short label for the export source (used in metadata and logs)
    fn source(&self) -> &'static str;

    /// Reconstruct one export record, or `None` if the record is unusable
    ///
    /// `position` is the record's index in the file.
    fn parse_record(&self, record: &Value, position: usize) -> Option<Conversation>;

    /// Import conversations from raw export bytes
    ///
    /// # Errors
    ///
    /// Returns an error only when the bytes are not JSON or the top level is
    /// not an array. Individual bad records are skipped.
    fn import_slice(&self, bytes: &[u8]) -> Result<Vec<Conversation>, ImportError> {
        let root: Value = serde_json::from_slice(bytes)?;
        let records = match root {
            Value::Array(records) => records,
            other => {
                return Err(ImportError::Format(format!(
                    "expected a JSON array of conversations, found {}",
                    json_kind(&other)
                )))
            }
        };

        let total = records.len();
        let conversations: Vec<Conversation> = records
            .iter()
            .enumerate()
            .filter_map(|(position, record)| self.parse_record(record, position))
            .collect();

        info!(
            "Imported {} of {} {} records",
            conversations.len(),
            total,
            self.source()
        );

        Ok(conversations)
    }

    /// Import conversations from an export file on disk
    fn import_file(&self, path: &Path) -> Result<Vec<Conversation>, ImportError> {
        let bytes = std::fs::read(path)?;
        self.import_slice(&bytes)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
