//! Core domain types and utilities for the bestself assistant.
//!
//! This crate provides the foundational ID types and the shared remote
//! error taxonomy used by the completion and persistence crates.

pub mod error;
pub mod id;

pub use error::RemoteError;
pub use id::{MessageId, SessionId, StoreUserId};
