//! Terminal chat front end for the bestself assistant.
//!
//! Wires the conversation core to the completion backend and the
//! optional persistence bridge, and drives them from a stdin REPL.

pub mod config;
pub mod repl;
pub mod turn;

pub use config::ChatConfig;
pub use turn::{ChatEngine, TurnError};
