//! Persistence bridge for the bestself assistant.
//!
//! Mirrors conversation history to an opaque HTTP backend keyed by a
//! backend-assigned user identifier. The bridge is an optional
//! collaborator: a session without a configured store stays local-only
//! and mirrors nothing, and mirroring failures never roll back the
//! local transcript.

pub mod bridge;
pub mod http;
pub mod store;

pub use bridge::StoreBridge;
pub use http::HttpStore;
pub use store::MessageStore;
