//! Red - a single-user coding agent for the terminal
//!
//! One task runs as a session: the model reads the transcript, may request
//! tool calls (edit files, run commands, list directories, read files), and
//! the operator approves anything that mutates the workspace.

pub mod agent;
pub mod approval;
pub mod config;
pub mod error;
pub mod llm;
pub mod tools;
pub mod transcript;

pub use error::{RedError, Result};
