//! Append-only message history.

use crate::message::Message;
use serde::{Deserialize, Serialize};

/// The ordered message history of a session.
///
/// `append` is the only mutator: no removal, reordering, or in-place
/// mutation exists. Insertion order is chronological order is display
/// order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to the end of the transcript.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Returns the ordered message sequence.
    ///
    /// This is the view used both for rendering and for building an
    /// outbound completion request.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if the transcript holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the last message, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Iterates over the messages in order.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }
}
