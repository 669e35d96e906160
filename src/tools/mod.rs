//! Tool system for model-requested actions
//!
//! The action space is closed: four tools, named by [`ToolName`]. Each tool
//! turns a decoded argument object into typed arguments, optionally asks for
//! approval, executes, and always yields a [`ToolResult`] that can be written
//! into the transcript.

mod args;
mod clip;
mod dispatcher;
mod edit_file;
mod fs_error;
mod list_directory;
mod read_file;
mod registry;
mod run_command;

pub use args::{ArgumentError, ToolArgs};
pub use clip::{CLIP_LIMIT, CLIP_MARKER, CLIP_WINDOW, clip};
pub use dispatcher::ToolDispatcher;
pub use edit_file::{EditFileArgs, EditFileTool, edit_file};
pub use fs_error::{EntryKind, FsError};
pub use list_directory::{ListDirectoryArgs, ListDirectoryTool, list_directory};
pub use read_file::{ReadFileArgs, ReadFileTool, read_file_content};
pub use registry::ToolRegistry;
pub use run_command::{CommandOutput, RunCommandArgs, RunCommandTool, run_command};

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::approval::ApprovalRequest;
use crate::llm::ToolDefinition;

/// The tools the model may call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    EditFile,
    RunCommand,
    ListDirectory,
    ReadFileContent,
}

impl ToolName {
    pub const ALL: [ToolName; 4] = [
        ToolName::EditFile,
        ToolName::RunCommand,
        ToolName::ListDirectory,
        ToolName::ReadFileContent,
    ];

    /// Name advertised to the model
    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::EditFile => "editFile",
            ToolName::RunCommand => "runCommand",
            ToolName::ListDirectory => "listDirectory",
            ToolName::ReadFileContent => "readFileContent",
        }
    }

    /// Resolve a requested name; snake_case spellings are accepted too
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "editFile" | "edit_file" => Some(ToolName::EditFile),
            "runCommand" | "run_command" => Some(ToolName::RunCommand),
            "listDirectory" | "list_directory" => Some(ToolName::ListDirectory),
            "readFileContent" | "read_file_content" => Some(ToolName::ReadFileContent),
            _ => None,
        }
    }

    /// Tools with side effects must pass the approval gate
    pub fn is_mutating(self) -> bool {
        matches!(self, ToolName::EditFile | ToolName::RunCommand)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool that can be called by the model
#[async_trait]
pub trait Tool: Send + Sync {
    /// Validated, typed arguments
    type Args: Send;

    fn name(&self) -> ToolName;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Turn the decoded argument object into typed arguments
    fn parse_args(&self, args: &ToolArgs) -> Result<Self::Args, ArgumentError>;

    /// One-line description of what is about to happen
    fn describe(&self, args: &Self::Args) -> String;

    /// Approval needed before execution; `None` for read-only tools
    fn approval(&self, _args: &Self::Args) -> Option<ApprovalRequest> {
        None
    }

    /// Execute the tool. Failures are reported in the result, never raised.
    async fn execute(&self, args: Self::Args) -> ToolResult;

    /// Operator-facing rendering of a result
    fn report(&self, result: &ToolResult) -> String {
        result.content.clone()
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name().as_str(), self.description(), self.input_schema())
    }
}

/// How a tool call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    Completed,
    Failed,
    Cancelled,
}

/// Result from tool execution; the content always goes into the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub content: String,
    pub status: ToolStatus,
    pub exit_code: Option<i32>,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            status: ToolStatus::Completed,
            exit_code: None,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            status: ToolStatus::Failed,
            exit_code: None,
        }
    }

    pub fn cancelled(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            status: ToolStatus::Cancelled,
            exit_code: None,
        }
    }

    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = Some(exit_code);
        self
    }

    pub fn is_error(&self) -> bool {
        self.status == ToolStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_name_round_trip() {
        for name in ToolName::ALL {
            assert_eq!(ToolName::parse(name.as_str()), Some(name));
        }
    }

    #[test]
    fn test_tool_name_snake_case_aliases() {
        assert_eq!(ToolName::parse("edit_file"), Some(ToolName::EditFile));
        assert_eq!(ToolName::parse("run_command"), Some(ToolName::RunCommand));
        assert_eq!(ToolName::parse("list_directory"), Some(ToolName::ListDirectory));
        assert_eq!(ToolName::parse("read_file_content"), Some(ToolName::ReadFileContent));
    }

    #[test]
    fn test_tool_name_unknown() {
        assert_eq!(ToolName::parse("deleteEverything"), None);
        assert_eq!(ToolName::parse(""), None);
    }

    #[test]
    fn test_only_edit_and_command_are_mutating() {
        assert!(ToolName::EditFile.is_mutating());
        assert!(ToolName::RunCommand.is_mutating());
        assert!(!ToolName::ListDirectory.is_mutating());
        assert!(!ToolName::ReadFileContent.is_mutating());
    }

    #[test]
    fn test_tool_result_constructors() {
        let ok = ToolResult::success("done");
        assert_eq!(ok.status, ToolStatus::Completed);
        assert!(!ok.is_error());

        let err = ToolResult::error("broken").with_exit_code(2);
        assert!(err.is_error());
        assert_eq!(err.exit_code, Some(2));

        let cancelled = ToolResult::cancelled("File edit cancelled by user.");
        assert_eq!(cancelled.status, ToolStatus::Cancelled);
        assert!(!cancelled.is_error());
    }
}
