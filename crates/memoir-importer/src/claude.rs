//! Claude export importer (flat message list)

use crate::timestamp::from_iso8601;
use crate::Importer;
use memoir_domain::{Conversation, Message, Metadata, Role};
use serde_json::Value;
use tracing::{debug, warn};

/// Value stored under the conversation's `source` metadata key
pub const SOURCE: &str = "claude_export";

/// Sender label that maps to [`Role::User`]; every other label is the assistant
const HUMAN_SENDER: &str = "human";

/// Importer for Claude data exports (`conversations.json`)
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaudeImporter;

impl ClaudeImporter {
    /// Create a new importer
    pub fn new() -> Self {
        Self
    }
}

fn message_from_entry(entry: &Value) -> Option<Message> {
    let text = entry.get("text").and_then(Value::as_str)?;
    if text.is_empty() {
        return None;
    }

    let sender = entry.get("sender").and_then(Value::as_str);
    let role = if sender == Some(HUMAN_SENDER) {
        Role::User
    } else {
        Role::Assistant
    };

    let mut message = Message::new(role, text)
        .with_timestamp(from_iso8601(entry.get("created_at")))
        .with_metadata("original_sender", sender.map_or(Value::Null, Value::from));
    if let Some(id) = entry.get("uuid").and_then(Value::as_str) {
        message = message.with_id(id);
    }
    Some(message)
}

impl Importer for ClaudeImporter {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn parse_record(&self, record: &Value, position: usize) -> Option<Conversation> {
        let Some(obj) = record.as_object() else {
            warn!("Skipping Claude record {}: not an object", position);
            return None;
        };

        let id = obj
            .get("uuid")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("claude-{}", position));

        let entries = obj
            .get("chat_messages")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let messages: Vec<Message> = entries.iter().filter_map(message_from_entry).collect();
        if messages.len() < entries.len() {
            debug!(
                "Conversation '{}': dropped {} entries without text",
                id,
                entries.len() - messages.len()
            );
        }

        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), Value::from(SOURCE));

        Some(Conversation {
            id,
            title: obj.get("name").and_then(Value::as_str).map(str::to_string),
            messages,
            created_at: from_iso8601(obj.get("created_at")),
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sender_mapping() {
        let record = json!({
            "uuid": "c1",
            "name": "Claude Conversation",
            "chat_messages": [
                {"uuid": "m1", "sender": "human", "text": "Hi Claude"},
                {"uuid": "m2", "sender": "assistant", "text": "Hello! How can I help?"},
                {"sender": "bot", "text": "Unusual sender"}
            ]
        });

        let conv = ClaudeImporter::new().parse_record(&record, 0).unwrap();
        assert_eq!(conv.title.as_deref(), Some("Claude Conversation"));
        let roles: Vec<_> = conv.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Assistant]);
        assert_eq!(conv.messages[0].id(), Some("m1"));
        assert_eq!(conv.messages[0].metadata["original_sender"], "human");
        assert_eq!(conv.messages[2].id(), None);
    }

    #[test]
    fn test_empty_text_dropped() {
        let record = json!({
            "uuid": "c1",
            "chat_messages": [
                {"sender": "human", "text": ""},
                {"sender": "human"},
                {"sender": "human", "text": null},
                {"sender": "assistant", "text": "kept"}
            ]
        });

        let conv = ClaudeImporter::new().parse_record(&record, 0).unwrap();
        assert_eq!(conv.messages.len(), 1);
        assert_eq!(conv.messages[0].content, "kept");
    }

    #[test]
    fn test_malformed_timestamps_degrade() {
        let record = json!({
            "uuid": "c1",
            "created_at": "not a date",
            "chat_messages": [
                {"sender": "human", "text": "one", "created_at": "2024-01-01T00:00:00.000000Z"},
                {"sender": "human", "text": "two", "created_at": "garbage"}
            ]
        });

        let conv = ClaudeImporter::new().parse_record(&record, 0).unwrap();
        assert!(conv.created_at.is_none());
        assert!(conv.messages[0].timestamp.is_some());
        assert!(conv.messages[1].timestamp.is_none());
    }

    #[test]
    fn test_missing_fields_use_fallbacks() {
        let conv = ClaudeImporter::new().parse_record(&json!({}), 3).unwrap();
        assert_eq!(conv.id, "claude-3");
        assert!(conv.messages.is_empty());
        assert_eq!(conv.metadata["source"], SOURCE);
    }

    #[test]
    fn test_non_object_record_skipped() {
        assert!(ClaudeImporter::new().parse_record(&json!(42), 0).is_none());
    }
}
