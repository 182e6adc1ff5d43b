//! Message store trait.

use async_trait::async_trait;
use bestself_conversation::Message;
use bestself_core::{RemoteError, StoreUserId};

/// Storage seam for conversation history.
///
/// The backend is an opaque append service keyed by a user identifier
/// it assigns itself. Implementations perform one request per call with
/// no retry policy.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Creates a backend user record, returning the assigned identifier.
    async fn create_user(&self, name: &str) -> Result<StoreUserId, RemoteError>;

    /// Mirrors messages to the backend for the given user.
    async fn save_messages(
        &self,
        id: &StoreUserId,
        messages: &[Message],
    ) -> Result<(), RemoteError>;

    /// Loads previously stored history for the given user.
    async fn load_messages(&self, id: &StoreUserId) -> Result<Vec<Message>, RemoteError>;
}
