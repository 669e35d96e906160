//! Agent module - the orchestration loop.
//!
//! This module provides:
//! - Session, which drives one task through model rounds and tool calls
//! - SessionState / SessionOutcome for the loop's state machine
//! - The built-in system prompt

mod prompt;
mod session;

pub use prompt::SYSTEM_PROMPT;
pub use session::{Session, SessionOutcome, SessionState};
