//! Argument validation for raw tool-call payloads

use serde_json::{Map, Value};
use thiserror::Error;

use super::ToolName;

/// Why a tool call's arguments were rejected. The message is shown to the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("Error: Invalid arguments for tool '{tool}': {reason}")]
    Malformed { tool: ToolName, reason: String },

    #[error("Error: Missing required argument '{field}' for tool '{tool}'.")]
    Missing { tool: ToolName, field: &'static str },

    #[error("Error: Argument '{field}' for tool '{tool}' must be a string.")]
    NotAString { tool: ToolName, field: &'static str },
}

/// Decoded argument object of one tool call
#[derive(Debug, Clone)]
pub struct ToolArgs {
    tool: ToolName,
    values: Map<String, Value>,
}

impl ToolArgs {
    /// Decode the serialized payload. A blank payload counts as `{}`.
    pub fn decode(tool: ToolName, raw: &str) -> Result<Self, ArgumentError> {
        if raw.trim().is_empty() {
            return Ok(Self {
                tool,
                values: Map::new(),
            });
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(values)) => Ok(Self { tool, values }),
            Ok(other) => Err(ArgumentError::Malformed {
                tool,
                reason: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
            Err(e) => Err(ArgumentError::Malformed {
                tool,
                reason: e.to_string(),
            }),
        }
    }

    /// Untouched string value; absent or null reads as `None`
    fn raw_str(&self, field: &'static str) -> Result<Option<&str>, ArgumentError> {
        match self.values.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(ArgumentError::NotAString { tool: self.tool, field }),
        }
    }

    /// Trimmed string that must be present and non-empty
    pub fn required_str(&self, field: &'static str) -> Result<String, ArgumentError> {
        self.optional_str(field)?
            .ok_or(ArgumentError::Missing { tool: self.tool, field })
    }

    /// Trimmed string; blank counts as absent
    pub fn optional_str(&self, field: &'static str) -> Result<Option<String>, ArgumentError> {
        Ok(self
            .raw_str(field)?
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string))
    }

    /// String kept exactly as sent, empty when absent
    pub fn verbatim_str(&self, field: &'static str) -> Result<String, ArgumentError> {
        Ok(self.raw_str(field)?.unwrap_or_default().to_string())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
