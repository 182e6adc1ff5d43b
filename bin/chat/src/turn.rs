//! The turn engine.
//!
//! One turn is one user submission: append the user message, obtain the
//! assistant reply (from the name-declaration rule or the completion
//! backend), append it, and mirror the pair when the session is
//! persisted. The session is passed explicitly through each turn so the
//! engine holds no conversation state of its own.

use bestself_completion::CompletionBackend;
use bestself_conversation::persona;
use bestself_conversation::{Message, Session, SessionStatus};
use bestself_core::RemoteError;
use bestself_persistence::StoreBridge;
use std::fmt;
use std::sync::Arc;

/// Errors surfaced to the caller of a turn.
///
/// Every variant is turn-scoped: the process continues and the session
/// remains usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    /// A previous turn is still in flight.
    SessionBusy,
    /// The completion round trip failed; the transcript retains the
    /// user message with no assistant reply appended.
    Remote(RemoteError),
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionBusy => write!(f, "a turn is already in flight"),
            Self::Remote(e) => write!(f, "reply failed: {e}"),
        }
    }
}

impl std::error::Error for TurnError {}

impl From<RemoteError> for TurnError {
    fn from(e: RemoteError) -> Self {
        Self::Remote(e)
    }
}

/// Drives conversation turns against a completion backend and an
/// optional persistence bridge.
#[derive(Clone)]
pub struct ChatEngine {
    backend: Arc<dyn CompletionBackend>,
    bridge: Option<StoreBridge>,
}

impl ChatEngine {
    /// Creates an engine over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            bridge: None,
        }
    }

    /// Attaches a persistence bridge.
    #[must_use]
    pub fn with_bridge(mut self, bridge: StoreBridge) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Runs one turn for the given user input.
    ///
    /// Appends the user message, resolves the assistant reply, appends
    /// it, and returns a copy of the reply. On failure the transcript
    /// retains the user message with no assistant reply and the session
    /// returns to idle. Empty input is allowed to submit.
    pub async fn submit(
        &self,
        session: &mut Session,
        input: &str,
    ) -> Result<Message, TurnError> {
        if !session.status.is_idle() {
            return Err(TurnError::SessionBusy);
        }

        let user_message = Message::user(input);
        session.append(user_message.clone());

        // A first name declaration is answered deterministically; the
        // completion backend is not invoked for this turn.
        if session.display_name().is_none()
            && let Some(name) = persona::declared_name(input)
        {
            session.set_display_name(name.clone());
            let reply = Message::assistant(persona::introduction(&name));
            session.append(reply.clone());

            if let Some(bridge) = &self.bridge {
                // The declared name is the first durable identity we
                // have, so this is where a local session becomes
                // persisted.
                match bridge.ensure_user(session, &name).await {
                    Ok(id) => bridge.mirror(id, vec![user_message, reply.clone()]),
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to create backend user");
                    }
                }
            }

            return Ok(reply);
        }

        session.status = SessionStatus::Busy;
        let completion = self.backend.complete(session.transcript().messages()).await;
        session.status = SessionStatus::Idle;

        let mut reply = completion?;
        if let Some(name) = session.display_name() {
            reply.content = persona::personalize(&reply.content, name);
        }
        session.append(reply.clone());

        if let (Some(bridge), Some(id)) = (&self.bridge, session.store_id()) {
            bridge.mirror(id.clone(), vec![user_message, reply.clone()]);
        }

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bestself_conversation::{MessageRole, GREETING};
    use bestself_core::StoreUserId;
    use bestself_persistence::MessageStore;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend answering from a canned script.
    struct ScriptedBackend {
        replies: Mutex<Vec<Result<String, RemoteError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<String, RemoteError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, _transcript: &[Message]) -> Result<Message, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut replies = self.replies.lock().unwrap();
            assert!(!replies.is_empty(), "backend called more than scripted");
            replies.remove(0).map(Message::assistant)
        }
    }

    /// Store recording create_user calls.
    #[derive(Default)]
    struct CountingStore {
        create_calls: AtomicUsize,
        saved: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl MessageStore for CountingStore {
        async fn create_user(&self, _name: &str) -> Result<StoreUserId, RemoteError> {
            let n = self.create_calls.fetch_add(1, Ordering::SeqCst);
            Ok(StoreUserId::new(format!("user-{n}")))
        }

        async fn save_messages(
            &self,
            _id: &StoreUserId,
            messages: &[Message],
        ) -> Result<(), RemoteError> {
            self.saved
                .lock()
                .unwrap()
                .push(messages.iter().map(|m| m.content.clone()).collect());
            Ok(())
        }

        async fn load_messages(&self, _id: &StoreUserId) -> Result<Vec<Message>, RemoteError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn successful_turn_appends_user_and_assistant() {
        let backend = ScriptedBackend::new(vec![Ok("Sure, happy to help.".to_string())]);
        let engine = ChatEngine::new(backend.clone());
        let mut session = Session::new();

        let reply = engine.submit(&mut session, "help me plan my day").await.unwrap();

        assert_eq!(reply.role, MessageRole::Assistant);
        assert_eq!(session.transcript().len(), 3);
        assert_eq!(backend.calls(), 1);
        assert!(session.status.is_idle());
    }

    #[tokio::test]
    async fn transcript_grows_by_two_per_turn() {
        let backend = ScriptedBackend::new(vec![
            Ok("reply one".to_string()),
            Ok("reply two".to_string()),
        ]);
        let engine = ChatEngine::new(backend);
        let mut session = Session::new();

        engine.submit(&mut session, "first").await.unwrap();
        engine.submit(&mut session, "second").await.unwrap();

        // seed + 2 per turn
        assert_eq!(session.transcript().len(), 1 + 2 * 2);
    }

    #[tokio::test]
    async fn name_declaration_skips_backend() {
        let backend = ScriptedBackend::new(vec![]);
        let engine = ChatEngine::new(backend.clone());
        let mut session = Session::new();

        let reply = engine.submit(&mut session, "my name is Sam").await.unwrap();

        assert_eq!(backend.calls(), 0);
        assert_eq!(session.display_name(), Some("Sam"));
        assert_eq!(reply.content, "Nice to meet you, Sam! How can I help you today?");
        // Personalization turns still add exactly two messages.
        assert_eq!(session.transcript().len(), 3);
    }

    #[tokio::test]
    async fn end_to_end_introduction_transcript() {
        let backend = ScriptedBackend::new(vec![]);
        let engine = ChatEngine::new(backend);
        let mut session = Session::new();

        engine.submit(&mut session, "my name is Sam").await.unwrap();

        let messages = session.transcript().messages();
        assert_eq!(messages[0].content, GREETING);
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[1].content, "my name is Sam");
        assert_eq!(messages[2].role, MessageRole::Assistant);
        assert_eq!(
            messages[2].content,
            "Nice to meet you, Sam! How can I help you today?"
        );
    }

    #[tokio::test]
    async fn later_declarations_go_to_backend() {
        let backend = ScriptedBackend::new(vec![Ok("Interesting!".to_string())]);
        let engine = ChatEngine::new(backend.clone());
        let mut session = Session::new();
        session.set_display_name("Sam");

        engine.submit(&mut session, "my name is Alex").await.unwrap();

        assert_eq!(backend.calls(), 1);
        assert_eq!(session.display_name(), Some("Sam"));
    }

    #[tokio::test]
    async fn reply_is_personalized_once_name_is_known() {
        let backend = ScriptedBackend::new(vec![Ok("Hello! Hello to you too.".to_string())]);
        let engine = ChatEngine::new(backend);
        let mut session = Session::new();
        session.set_display_name("Ada");

        let reply = engine.submit(&mut session, "hi").await.unwrap();

        assert_eq!(reply.content, "Hello Ada! Hello to you too.");
    }

    #[tokio::test]
    async fn reply_without_name_passes_through() {
        let backend = ScriptedBackend::new(vec![Ok("Hello! How are you?".to_string())]);
        let engine = ChatEngine::new(backend);
        let mut session = Session::new();

        let reply = engine.submit(&mut session, "hi").await.unwrap();

        assert_eq!(reply.content, "Hello! How are you?");
    }

    #[tokio::test]
    async fn empty_name_declaration_preserved() {
        let backend = ScriptedBackend::new(vec![]);
        let engine = ChatEngine::new(backend);
        let mut session = Session::new();

        let reply = engine.submit(&mut session, "my name is ").await.unwrap();

        assert_eq!(session.display_name(), Some(""));
        assert_eq!(reply.content, "Nice to meet you, ! How can I help you today?");
    }

    #[tokio::test]
    async fn failed_turn_keeps_user_message_only() {
        let backend = ScriptedBackend::new(vec![Err(RemoteError::Status {
            status: 500,
            detail: "upstream down".to_string(),
        })]);
        let engine = ChatEngine::new(backend);
        let mut session = Session::new();

        let err = engine.submit(&mut session, "hi").await.unwrap_err();

        assert!(matches!(err, TurnError::Remote(RemoteError::Status { status: 500, .. })));
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.transcript().last().unwrap().role, MessageRole::User);
        assert!(session.status.is_idle());
    }

    #[tokio::test]
    async fn busy_session_rejects_submission() {
        let backend = ScriptedBackend::new(vec![]);
        let engine = ChatEngine::new(backend);
        let mut session = Session::new();
        session.status = SessionStatus::Busy;

        let err = engine.submit(&mut session, "hi").await.unwrap_err();

        assert_eq!(err, TurnError::SessionBusy);
        // Rejected before anything was appended.
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn empty_input_is_allowed_to_submit() {
        let backend = ScriptedBackend::new(vec![Ok("Did you mean to say something?".to_string())]);
        let engine = ChatEngine::new(backend.clone());
        let mut session = Session::new();

        engine.submit(&mut session, "").await.unwrap();

        assert_eq!(backend.calls(), 1);
        assert_eq!(session.transcript().len(), 3);
    }

    #[tokio::test]
    async fn introduction_turn_persists_and_mirrors() {
        let backend = ScriptedBackend::new(vec![]);
        let store = Arc::new(CountingStore::default());
        let engine =
            ChatEngine::new(backend).with_bridge(StoreBridge::new(store.clone()));
        let mut session = Session::new();

        engine.submit(&mut session, "my name is Sam").await.unwrap();

        assert!(session.is_persisted());
        assert_eq!(store.create_calls.load(Ordering::SeqCst), 1);

        for _ in 0..50 {
            if !store.saved.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0][0], "my name is Sam");
    }

    #[tokio::test]
    async fn local_session_mirrors_nothing() {
        let backend = ScriptedBackend::new(vec![Ok("Hi!".to_string())]);
        let store = Arc::new(CountingStore::default());
        let engine =
            ChatEngine::new(backend).with_bridge(StoreBridge::new(store.clone()));
        let mut session = Session::new();

        engine.submit(&mut session, "hi").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert!(!session.is_persisted());
        assert!(store.saved.lock().unwrap().is_empty());
    }
}
