//! Reply client for the bestself assistant.
//!
//! This crate wraps the external completion service behind the
//! [`CompletionBackend`] trait: the full transcript goes out as one
//! request, one assistant message comes back. No retries, no streaming,
//! exactly one request per user turn.

pub mod backend;
pub mod openai;

pub use backend::CompletionBackend;
pub use openai::{OpenAiBackend, OpenAiConfig};
