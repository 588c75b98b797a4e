//! Conversation module - a reconstructed, linear chat thread

use crate::message::{Message, Metadata, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single linear conversation, oldest message first
///
/// Branching has already been resolved by the time a `Conversation` exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Provider conversation identifier
    pub id: String,

    /// Human-readable title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Messages in chronological order
    pub messages: Vec<Message>,

    /// When the conversation was started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Provider-specific extras (e.g. which export it came from)
    #[serde(default)]
    pub metadata: Metadata,
}

impl Conversation {
    /// Number of messages authored by the given role
    pub fn count_by_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }

    /// Title, or a placeholder when the export had none
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_by_role() {
        let conv = Conversation {
            id: "c1".to_string(),
            title: None,
            messages: vec![
                Message::user("one"),
                Message::assistant("two"),
                Message::user("three"),
            ],
            created_at: None,
            metadata: Metadata::new(),
        };

        assert_eq!(conv.count_by_role(Role::User), 2);
        assert_eq!(conv.count_by_role(Role::Assistant), 1);
        assert_eq!(conv.count_by_role(Role::System), 0);
        assert_eq!(conv.display_title(), "(untitled)");
    }
}
