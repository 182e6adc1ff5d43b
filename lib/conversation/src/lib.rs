//! Conversation state for the bestself assistant.
//!
//! This crate provides:
//!
//! - **Transcript**: Append-only message history for a session
//! - **Session**: Active conversation lifecycle and personalization state
//! - **Persona**: Name extraction and reply personalization rules

pub mod message;
pub mod persona;
pub mod session;
pub mod transcript;

pub use message::{Message, MessageRole, WireMessage};
pub use session::{Session, SessionStatus, GREETING};
pub use transcript::Transcript;
