//! Conversation session management.
//!
//! A session owns the transcript for one active conversation, along with
//! the personalization state and the backend identifier once assigned.
//! Sessions live for the duration of the process; the optional
//! persistence bridge is the only cross-session durability.

use crate::message::Message;
use crate::transcript::Transcript;
use bestself_core::{SessionId, StoreUserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The greeting seeded into every new session.
pub const GREETING: &str = "Hello! What is your name?";

/// Whether a session can accept a new submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No turn is in flight; submissions are accepted.
    Idle,
    /// A turn's remote call is in flight; new submissions are rejected.
    Busy,
}

impl SessionStatus {
    /// Returns true if the session can accept a submission.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// A conversation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique local session identifier.
    pub id: SessionId,
    /// Backend-assigned identifier; `None` while the session is
    /// local-only.
    store_id: Option<StoreUserId>,
    /// Display name extracted from the first name declaration.
    display_name: Option<String>,
    /// Turn status.
    pub status: SessionStatus,
    /// Message history.
    transcript: Transcript,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session last appended a message.
    pub last_active_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session seeded with the assistant greeting.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        let mut transcript = Transcript::new();
        transcript.append(Message::assistant(GREETING));
        Self {
            id: SessionId::new(),
            store_id: None,
            display_name: None,
            status: SessionStatus::Idle,
            transcript,
            created_at: now,
            last_active_at: now,
        }
    }

    /// Appends a message to the transcript.
    pub fn append(&mut self, message: Message) {
        self.transcript.append(message);
        self.last_active_at = Utc::now();
    }

    /// Returns the transcript.
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the backend identifier, if assigned.
    #[must_use]
    pub fn store_id(&self) -> Option<&StoreUserId> {
        self.store_id.as_ref()
    }

    /// Returns true if the session has been persisted to the backend.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.store_id.is_some()
    }

    /// Assigns the backend identifier.
    ///
    /// The identifier transitions monotonically from unset to set: the
    /// first assignment wins and later calls are rejected, returning
    /// false with the original value untouched.
    pub fn assign_store_id(&mut self, id: StoreUserId) -> bool {
        if self.store_id.is_some() {
            return false;
        }
        self.store_id = Some(id);
        true
    }

    /// Returns the extracted display name, if set.
    ///
    /// An empty string counts as set: a name declaration with nothing
    /// after the marker still claims the one assignment.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Sets the display name.
    ///
    /// Set at most once per session: later declarations do not
    /// overwrite it and are rejected, returning false.
    pub fn set_display_name(&mut self, name: impl Into<String>) -> bool {
        if self.display_name.is_some() {
            return false;
        }
        self.display_name = Some(name.into());
        true
    }

    /// Appends previously stored history after the seeded greeting.
    ///
    /// Used once when resuming a session with a known backend
    /// identifier, before any turn has run.
    pub fn hydrate(&mut self, messages: impl IntoIterator<Item = Message>) {
        for message in messages {
            self.transcript.append(message);
        }
        self.last_active_at = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
