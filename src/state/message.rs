// Transcript messages
// A message is created once and never edited

use chrono::{DateTime, Utc};

/// Who authored a message
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sender {
    /// Reply from the chat backend (or the local fallback)
    Assistant,
    /// Message typed by the signed-in user, tagged with their user id
    User(String),
}

impl Sender {
    /// Whether the message came from the assistant
    pub fn is_assistant(&self) -> bool {
        matches!(self, Sender::Assistant)
    }
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Author of the message
    pub sender: Sender,
    /// Text content
    pub content: String,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create an assistant message
    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sender: Sender::Assistant,
            content: content.into(),
            timestamp,
        }
    }

    /// Create a user message
    pub fn user(user_id: impl Into<String>, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sender: Sender::User(user_id.into()),
            content: content.into(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_kind() {
        let now = Utc::now();
        assert!(Message::assistant("hi", now).sender.is_assistant());
        assert!(!Message::user("user1", "hi", now).sender.is_assistant());
    }
}
