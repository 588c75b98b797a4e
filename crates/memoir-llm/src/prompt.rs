//! Prompt input model
//!
//! Callers hand a provider either a single string or a list of role-tagged
//! messages. Chat endpoints need the list form, so a bare string is wrapped
//! with a default system instruction.

use memoir_domain::Role;
use serde::{Deserialize, Serialize};

/// System instruction used when a bare text prompt is sent to a chat endpoint
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// A single role-tagged message sent to a chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a chat message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// System-role message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// User-role message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Assistant-role message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Input to [`crate::LlmClient::generate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// A single prompt string
    Text(String),
    /// A full message list
    Chat(Vec<ChatMessage>),
}

impl Prompt {
    /// Messages to send to a chat endpoint
    pub fn into_messages(self) -> Vec<ChatMessage> {
        match self {
            Prompt::Text(text) => vec![
                ChatMessage::system(DEFAULT_SYSTEM_PROMPT),
                ChatMessage::user(text),
            ],
            Prompt::Chat(messages) => messages,
        }
    }

    /// All prompt text joined by newlines
    pub fn text(&self) -> String {
        match self {
            Prompt::Text(text) => text.clone(),
            Prompt::Chat(messages) => messages
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Prompt::Text(text.to_string())
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Prompt::Text(text)
    }
}

impl From<Vec<ChatMessage>> for Prompt {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Prompt::Chat(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_prompt_wrapped_with_system() {
        let messages = Prompt::from("What do I like?").into_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system(DEFAULT_SYSTEM_PROMPT));
        assert_eq!(messages[1], ChatMessage::user("What do I like?"));
    }

    #[test]
    fn test_chat_prompt_passes_through() {
        let input = vec![ChatMessage::system("Be terse."), ChatMessage::user("Hi")];
        let messages = Prompt::from(input.clone()).into_messages();
        assert_eq!(messages, input);
    }

    #[test]
    fn test_prompt_text_joins_contents() {
        let prompt = Prompt::from(vec![ChatMessage::system("a"), ChatMessage::user("b")]);
        assert_eq!(prompt.text(), "a\nb");
    }

    #[test]
    fn test_chat_message_serializes_role_lowercase() {
        let json = serde_json::to_value(ChatMessage::assistant("ok")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "ok");
    }
}
