//! Message types for conversations.

use bestself_core::MessageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User/human message.
    User,
    /// Assistant/AI message.
    Assistant,
}

/// A message in a conversation.
///
/// Messages are immutable once appended to a transcript; insertion order
/// is the sole sequencing signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Message role.
    pub role: MessageRole,
    /// Message content.
    pub content: String,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a new message.
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Returns true if this message was authored by the user.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

/// A message as it appears on the wire.
///
/// Both external interfaces carry only role and content; local ids and
/// timestamps never leave the process. Loading a wire message mints a
/// fresh id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Message role.
    pub role: MessageRole,
    /// Message content.
    pub content: String,
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        Message::new(wire.role, wire.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_creation() {
        let msg = Message::user("Hello!");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "Hello!");
        assert!(msg.is_user());
    }

    #[test]
    fn assistant_message() {
        let msg = Message::assistant("How can I help?");
        assert_eq!(msg.role, MessageRole::Assistant);
        assert!(!msg.is_user());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&MessageRole::Assistant).expect("serialize");
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn message_serde_roundtrip() {
        let msg = Message::user("my name is Sam");

        let json = serde_json::to_string(&msg).expect("serialize");
        let parsed: Message = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(msg.id, parsed.id);
        assert_eq!(msg.content, parsed.content);
        assert_eq!(msg.role, parsed.role);
    }

    #[test]
    fn wire_message_from_domain() {
        let msg = Message::user("my name is Sam");
        let wire = WireMessage::from(&msg);

        assert_eq!(wire.role, MessageRole::User);
        assert_eq!(wire.content, "my name is Sam");
    }

    #[test]
    fn wire_message_serializes_role_and_content_only() {
        let wire = WireMessage {
            role: MessageRole::Assistant,
            content: "Hi".to_string(),
        };
        let json = serde_json::to_value(&wire).expect("serialize");

        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "Hi"}));
    }

    #[test]
    fn domain_message_from_wire() {
        let wire = WireMessage {
            role: MessageRole::User,
            content: "hello".to_string(),
        };
        let msg = Message::from(wire);

        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "hello");
    }
}
