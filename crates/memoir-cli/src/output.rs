//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use memoir_domain::{Conversation, Fact, Role};
use memoir_extractor::ExtractionMetadata;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Widest fact or title cell in table output
const MAX_CELL_CHARS: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format imported conversations.
    pub fn format_conversations(&self, conversations: &[Conversation]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(conversations)?),
            OutputFormat::Table => Ok(self.format_conversations_table(conversations)),
            OutputFormat::Quiet => Ok(conversations
                .iter()
                .map(|c| c.id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_conversations_table(&self, conversations: &[Conversation]) -> String {
        if conversations.is_empty() {
            return self.colorize("No conversations found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Title", "Created", "Messages", "User", "Assistant"]);

        for conversation in conversations {
            let created = conversation
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            builder.push_record([
                conversation.id.clone(),
                truncate(conversation.display_title(), MAX_CELL_CHARS),
                created,
                conversation.messages.len().to_string(),
                conversation.count_by_role(Role::User).to_string(),
                conversation.count_by_role(Role::Assistant).to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format extracted facts.
    pub fn format_facts(&self, facts: &[Fact]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(facts)?),
            OutputFormat::Table => Ok(self.format_facts_table(facts)),
            OutputFormat::Quiet => Ok(facts
                .iter()
                .map(|f| f.content.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_facts_table(&self, facts: &[Fact]) -> String {
        if facts.is_empty() {
            return self.colorize("No facts extracted.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Category", "Fact", "Source"]);

        for fact in facts {
            builder.push_record([
                fact.category.to_string(),
                truncate(&fact.content, MAX_CELL_CHARS),
                fact.source_message_id.clone().unwrap_or_else(|| "-".to_string()),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// One-line summary of an extraction run.
    pub fn extraction_summary(&self, conversations: usize, stats: &ExtractionMetadata) -> String {
        let msg = format!(
            "{} conversation(s), {} of {} messages sent in {} batch(es) to {}",
            conversations,
            stats.units_extracted,
            stats.messages_seen,
            stats.batches_dispatched,
            stats.model_name
        );
        if stats.batches_failed > 0 {
            self.warning(&format!("{} ({} failed)", msg, stats.batches_failed))
        } else {
            self.info(&msg)
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoir_domain::{FactCategory, Message};

    fn sample_conversation() -> Conversation {
        Conversation {
            id: "conv-1".to_string(),
            title: Some("Trip planning".to_string()),
            messages: vec![
                Message::user("I am going to Lisbon in May."),
                Message::assistant("Great choice!"),
            ],
            created_at: None,
            metadata: Default::default(),
        }
    }

    fn sample_fact() -> Fact {
        let mut fact = Fact::new("User likes Python.", FactCategory::Preference);
        fact.source_message_id = Some("msg-1".to_string());
        fact
    }

    #[test]
    fn test_conversation_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_conversations(&[sample_conversation()])
            .unwrap();
        assert!(output.contains("conv-1"));
        assert!(output.contains("Trip planning"));
    }

    #[test]
    fn test_conversation_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter
            .format_conversations(&[sample_conversation()])
            .unwrap();
        assert_eq!(output, "conv-1");
    }

    #[test]
    fn test_fact_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_facts(&[sample_fact()]).unwrap();
        let parsed: Vec<Fact> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, vec![sample_fact()]);
    }

    #[test]
    fn test_fact_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_facts(&[sample_fact()]).unwrap();
        assert!(output.contains("preference"));
        assert!(output.contains("User likes Python."));
        assert!(output.contains("msg-1"));
    }

    #[test]
    fn test_empty_tables() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.format_facts(&[]).unwrap(), "No facts extracted.");
        assert_eq!(
            formatter.format_conversations(&[]).unwrap(),
            "No conversations found."
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 3), "ééé…");
    }

    #[test]
    fn test_no_color_messages() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
