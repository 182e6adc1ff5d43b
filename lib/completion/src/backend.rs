//! Completion backend abstraction.
//!
//! Provides a uniform seam over completion providers so the turn engine
//! can be exercised against an in-memory backend in tests.

use async_trait::async_trait;
use bestself_conversation::Message;
use bestself_core::RemoteError;

/// A completion provider.
///
/// `complete` takes the full ordered transcript, including the
/// just-appended user message, and resolves to exactly one assistant
/// message. The call suspends the current turn until resolved or
/// failed; it never retries.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Requests one assistant reply for the given transcript.
    async fn complete(&self, transcript: &[Message]) -> Result<Message, RemoteError>;
}
