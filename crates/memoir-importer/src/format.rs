//! Export format selection

use crate::{ChatGptImporter, ClaudeImporter, Importer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// ChatGPT `conversations.json` (node tree)
    ChatGpt,
    /// Claude `conversations.json` (message list)
    Claude,
}

impl ExportFormat {
    /// Get the format name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::ChatGpt => "chatgpt",
            ExportFormat::Claude => "claude",
        }
    }

    /// Importer for this format
    pub fn importer(&self) -> Box<dyn Importer> {
        match self {
            ExportFormat::ChatGpt => Box::new(ChatGptImporter::new()),
            ExportFormat::Claude => Box::new(ClaudeImporter::new()),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chatgpt" | "openai" => Ok(ExportFormat::ChatGpt),
            "claude" | "anthropic" => Ok(ExportFormat::Claude),
            other => Err(format!("Unknown export format '{}'", other)),
        }
    }
}
