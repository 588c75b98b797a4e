//! ChatGPT export importer (branching node tree)
//!
//! A ChatGPT `conversations.json` record carries a `mapping` of node id to
//! node. Each node names its parent and may hold a message. Regenerating an
//! answer adds a sibling branch, so a record can have several leaves.
//!
//! Reconstruction picks the leaf whose message was created last, walks parent
//! links back to the root, and reverses the collected messages.

use crate::timestamp::{epoch_rank, from_epoch};
use crate::Importer;
use memoir_domain::{Conversation, Message, Metadata, Role};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

/// Value stored under the conversation's `source` metadata key
pub const SOURCE: &str = "chatgpt_export";

/// Importer for ChatGPT data exports (`conversations.json`)
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatGptImporter;

impl ChatGptImporter {
    /// Create a new importer
    pub fn new() -> Self {
        Self
    }
}

/// Reasons a single record yields no conversation
#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum ThreadAnomaly {
    #[error("mapping is missing or not an object")]
    MissingMapping,

    #[error("mapping has no nodes")]
    EmptyMapping,

    #[error("mapping has no leaf nodes")]
    NoLeaves,

    #[error("parent chain revisits node '{0}'")]
    Cycle(String),
}

/// A mapping entry, borrowed from the export
#[derive(Debug)]
struct Node<'a> {
    id: &'a str,
    parent: Option<&'a str>,
    message: Option<&'a Value>,
}

impl<'a> Node<'a> {
    fn from_entry(key: &'a str, value: &'a Value) -> Self {
        Self {
            id: value.get("id").and_then(Value::as_str).unwrap_or(key),
            parent: value
                .get("parent")
                .and_then(Value::as_str)
                .filter(|p| !p.is_empty()),
            message: value.get("message").filter(|m| m.is_object()),
        }
    }

    fn created_rank(&self) -> f64 {
        epoch_rank(self.message.and_then(|m| m.get("create_time")))
    }
}

/// The reconstructed thread plus which leaf it ended at
#[derive(Debug)]
pub(crate) struct Thread {
    pub messages: Vec<Message>,
    pub active_leaf: String,
    pub leaf_count: usize,
}

/// Resolve a node mapping into a single chronological message list
pub(crate) fn reconstruct_thread(mapping: &Map<String, Value>) -> Result<Thread, ThreadAnomaly> {
    let nodes: Vec<Node<'_>> = mapping
        .iter()
        .map(|(key, value)| Node::from_entry(key, value))
        .collect();

    if nodes.is_empty() {
        return Err(ThreadAnomaly::EmptyMapping);
    }

    let by_id: HashMap<&str, &Node<'_>> = nodes.iter().map(|n| (n.id, n)).collect();
    let parent_ids: HashSet<&str> = nodes.iter().filter_map(|n| n.parent).collect();

    // First leaf in document order wins ties
    let mut leaf_count = 0;
    let mut active: Option<&Node<'_>> = None;
    for leaf in nodes.iter().filter(|n| !parent_ids.contains(n.id)) {
        leaf_count += 1;
        if active.map_or(true, |best| leaf.created_rank() > best.created_rank()) {
            active = Some(leaf);
        }
    }
    let active = active.ok_or(ThreadAnomaly::NoLeaves)?;

    let mut messages = Vec::new();
    let mut visited = HashSet::new();
    let mut current = Some(active);

    while let Some(node) = current {
        if !visited.insert(node.id) {
            return Err(ThreadAnomaly::Cycle(node.id.to_string()));
        }

        if let Some(message) = node.message.and_then(message_from_node) {
            messages.push(message);
        }

        current = node.parent.and_then(|parent| by_id.get(parent).copied());
    }

    messages.reverse();

    Ok(Thread {
        messages,
        active_leaf: active.id.to_string(),
        leaf_count,
    })
}

/// Convert a node's message payload, skipping system and empty messages
fn message_from_node(raw: &Value) -> Option<Message> {
    let label = raw.pointer("/author/role").and_then(Value::as_str)?;
    let Some(role) = Role::parse(label) else {
        debug!("Skipping message with unsupported role '{}'", label);
        return None;
    };
    if role == Role::System {
        return None;
    }

    let text: String = raw
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .map(|parts| parts.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if text.is_empty() {
        return None;
    }

    let message = Message::new(role, text).with_timestamp(from_epoch(raw.get("create_time")));
    Some(match raw.get("id").and_then(Value::as_str) {
        Some(id) => message.with_id(id),
        None => message,
    })
}

impl Importer for ChatGptImporter {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn parse_record(&self, record: &Value, position: usize) -> Option<Conversation> {
        let Some(obj) = record.as_object() else {
            warn!("Skipping ChatGPT record {}: not an object", position);
            return None;
        };

        let id = ["id", "conversation_id"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| format!("chatgpt-{}", position));

        let thread = obj
            .get("mapping")
            .and_then(Value::as_object)
            .ok_or(ThreadAnomaly::MissingMapping)
            .and_then(reconstruct_thread);

        let thread = match thread {
            Ok(thread) => thread,
            Err(anomaly) => {
                warn!("Skipping ChatGPT conversation '{}': {}", id, anomaly);
                return None;
            }
        };

        debug!(
            "Conversation '{}': {} messages from leaf '{}' ({} leaves)",
            id,
            thread.messages.len(),
            thread.active_leaf,
            thread.leaf_count
        );

        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), Value::from(SOURCE));
        metadata.insert("active_leaf".to_string(), Value::from(thread.active_leaf));
        metadata.insert("leaf_count".to_string(), Value::from(thread.leaf_count));

        Some(Conversation {
            id,
            title: obj.get("title").and_then(Value::as_str).map(str::to_string),
            messages: thread.messages,
            created_at: from_epoch(obj.get("create_time")),
            metadata,
        })
    }
}
