//! Message module - a single chat turn

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Free-form key/value metadata carried by messages, conversations and facts
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Metadata key holding a provider-native message identifier
pub const MESSAGE_ID_KEY: &str = "id";

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human side of the conversation
    User,

    /// The model side of the conversation
    Assistant,

    /// Provider-injected instructions
    System,
}

impl Role {
    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }

    /// Parse a role from its export label
    ///
    /// Returns `None` for labels outside the three known roles (e.g. `tool`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            "system" => Some(Role::System),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn in a conversation
///
/// Messages are immutable once built. `metadata` may carry the provider's
/// message identifier under [`MESSAGE_ID_KEY`], which the extractor uses to
/// attribute facts back to their source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who authored the message
    pub role: Role,

    /// Text content
    pub content: String,

    /// When the message was created, if the export recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Provider-specific extras
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl Message {
    /// Create a message with no timestamp or metadata
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: None,
            metadata: Metadata::new(),
        }
    }

    /// Shorthand for a user-authored message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Shorthand for an assistant-authored message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Attach a timestamp
    pub fn with_timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Attach the provider-native message identifier
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_metadata(MESSAGE_ID_KEY, id.into())
    }

    /// The provider-native message identifier, if it was recorded as a string
    pub fn id(&self) -> Option<&str> {
        self.metadata.get(MESSAGE_ID_KEY).and_then(|v| v.as_str())
    }
}
