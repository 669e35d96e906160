//! LLM Client Layer - chat-completions integration
//!
//! This module provides:
//! - Message types that double as the wire format
//! - LlmClient trait for API abstraction
//! - ChatCompletionsClient implementation
//! - MockLlmClient for scripted tests

pub mod chat_completions;
pub mod client;
pub mod types;

pub use chat_completions::ChatCompletionsClient;
pub use client::{LlmClient, LlmError, MockLlmClient, RecordedRequest};
pub use types::{
    CompletionRequest, CompletionResponse, FunctionCall, Message, Role, ToolCall, ToolDefinition, Usage,
};
