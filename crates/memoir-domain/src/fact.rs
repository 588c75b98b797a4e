//! Fact module - durable statements about the user

use crate::message::Metadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Namespace for content-derived fact identifiers (UUIDv5)
const FACT_NAMESPACE: Uuid = Uuid::from_u128(0x6d656d6f_6972_5f66_6163_745f69647321);

/// Category attached to a fact
///
/// The extractor accepts whatever label the model wrote. Labels that exactly
/// match one of the known categories map to their variant; anything else is
/// kept verbatim in `Unrecognized` so the text round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FactCategory {
    /// Likes, dislikes, habits
    Preference,
    /// Things the user is building or working on
    Project,
    /// Biographical details
    UserInfo,
    /// Stated intentions
    Goal,
    /// Explicit catch-all
    Other,
    /// A label outside the known set, preserved as written
    Unrecognized(String),
}

impl FactCategory {
    /// The known category labels, in prompt order
    pub const LABELS: [&'static str; 5] = ["preference", "project", "user_info", "goal", "other"];

    /// Map a label to a category without altering its text
    pub fn from_label(label: &str) -> Self {
        match label {
            "preference" => FactCategory::Preference,
            "project" => FactCategory::Project,
            "user_info" => FactCategory::UserInfo,
            "goal" => FactCategory::Goal,
            "other" => FactCategory::Other,
            _ => FactCategory::Unrecognized(label.to_string()),
        }
    }

    /// The label as written
    pub fn as_str(&self) -> &str {
        match self {
            FactCategory::Preference => "preference",
            FactCategory::Project => "project",
            FactCategory::UserInfo => "user_info",
            FactCategory::Goal => "goal",
            FactCategory::Other => "other",
            FactCategory::Unrecognized(label) => label,
        }
    }

    /// Whether the label is one of the known categories
    pub fn is_known(&self) -> bool {
        !matches!(self, FactCategory::Unrecognized(_))
    }
}

impl From<String> for FactCategory {
    fn from(label: String) -> Self {
        match FactCategory::from_label(&label) {
            FactCategory::Unrecognized(_) => FactCategory::Unrecognized(label),
            known => known,
        }
    }
}

impl From<FactCategory> for String {
    fn from(category: FactCategory) -> Self {
        match category {
            FactCategory::Unrecognized(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured, categorized statement about the user
///
/// Produced only by the extractor, one per accepted response line, and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// The statement, as written by the model
    pub content: String,

    /// Category label
    pub category: FactCategory,

    /// Storage identifier, assigned downstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Identifier of the message the fact was derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_message_id: Option<String>,

    /// Timestamp of the source message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Extras
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Fact {
    /// Create a fact with no attribution
    pub fn new(content: impl Into<String>, category: FactCategory) -> Self {
        Self {
            content: content.into(),
            category,
            id: None,
            source_message_id: None,
            timestamp: None,
            metadata: Metadata::new(),
        }
    }

    /// Deterministic identifier derived from category and content
    ///
    /// Two facts with byte-identical category and content always share a
    /// fingerprint, across runs and processes.
    ///
    /// # Examples
    ///
    /// ```
    /// use memoir_domain::{Fact, FactCategory};
    ///
    /// let a = Fact::new("User likes Python.", FactCategory::Preference);
    /// let b = Fact::new("User likes Python.", FactCategory::Preference);
    /// assert_eq!(a.fingerprint(), b.fingerprint());
    /// ```
    pub fn fingerprint(&self) -> Uuid {
        let key = format!("{}:{}", self.category.as_str(), self.content);
        Uuid::new_v5(&FACT_NAMESPACE, key.as_bytes())
    }

    /// Fill `id` with the fingerprint
    pub fn with_fingerprint_id(mut self) -> Self {
        self.id = Some(self.fingerprint().to_string());
        self
    }
}

/// Drop facts whose fingerprint was already seen, keeping the first occurrence
pub fn dedup_facts(facts: Vec<Fact>) -> Vec<Fact> {
    let mut seen = HashSet::new();
    facts
        .into_iter()
        .filter(|fact| seen.insert(fact.fingerprint()))
        .collect()
}
