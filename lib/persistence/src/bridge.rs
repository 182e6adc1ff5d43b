//! Bridge between a session and the backend store.
//!
//! A session starts local-only and transitions to persisted exactly
//! once, when the backend assigns it a user identifier. Persisted
//! sessions mirror every subsequent append; mirroring is fire-and-forget
//! and a failure leaves the local transcript untouched.

use crate::store::MessageStore;
use bestself_conversation::{Message, Session};
use bestself_core::{RemoteError, StoreUserId};
use std::sync::Arc;

/// Mirrors session history to a backend store.
#[derive(Clone)]
pub struct StoreBridge {
    store: Arc<dyn MessageStore>,
}

impl StoreBridge {
    /// Creates a bridge over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Transitions a session from local-only to persisted.
    ///
    /// Creates the backend user record on first call and assigns the
    /// returned identifier to the session. Once the identifier is set
    /// the session never transitions back: repeat calls do not reach
    /// the backend and the original identifier is kept.
    pub async fn ensure_user(
        &self,
        session: &mut Session,
        name: &str,
    ) -> Result<StoreUserId, RemoteError> {
        if let Some(id) = session.store_id() {
            return Ok(id.clone());
        }

        let id = self.store.create_user(name).await?;
        tracing::info!(user = %id, "created backend user record");
        session.assign_store_id(id.clone());
        Ok(id)
    }

    /// Mirrors newly appended messages to the backend.
    ///
    /// Fire-and-forget from the turn's perspective: the save runs on a
    /// spawned task and a failure is logged, not surfaced, so the turn
    /// never waits on or fails because of the mirror.
    pub fn mirror(&self, id: StoreUserId, messages: Vec<Message>) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.save_messages(&id, &messages).await {
                tracing::warn!(user = %id, error = %e, "failed to mirror messages");
            }
        });
    }

    /// Resumes a session from stored history.
    ///
    /// Loads the backend history once, appends it after the seeded
    /// greeting, and assigns the identifier. Intended to run before the
    /// session accepts any turn.
    pub async fn hydrate(
        &self,
        session: &mut Session,
        id: StoreUserId,
    ) -> Result<(), RemoteError> {
        let history = self.store.load_messages(&id).await?;
        tracing::info!(user = %id, messages = history.len(), "hydrated session history");
        session.hydrate(history);
        session.assign_store_id(id);
        Ok(())
    }
}
