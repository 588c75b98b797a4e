//! Memoir Domain Layer
//!
//! Plain value records shared by every other Memoir crate. Nothing in here
//! performs I/O; importers produce these types and the extractor consumes them.
//!
//! ## Key Concepts
//!
//! - **Message**: one turn of a chat, authored by the user, the assistant or the system
//! - **Conversation**: a single linear thread of messages, oldest first
//! - **Fact**: a categorized statement about the user derived from one message
//!
//! ## Invariants
//!
//! - A `Conversation` never branches; regenerated answers are resolved by the importer
//! - Values are immutable after construction; builders consume `self`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod conversation;
pub mod fact;
pub mod message;

// Re-exports for convenience
pub use conversation::Conversation;
pub use fact::{dedup_facts, Fact, FactCategory};
pub use message::{Message, Metadata, Role};
