//! runCommand tool - execute a shell command

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;

use super::{ArgumentError, Tool, ToolArgs, ToolName, ToolResult, clip};
use crate::approval::ApprovalRequest;

/// Combined output and exit status of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub output: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `command` through `sh -c`, capturing stdout followed by stderr.
///
/// Never fails: a command that cannot be started is reported as output text
/// with exit code 1, as is one killed by a signal.
pub async fn run_command(command: &str, working_dir: Option<&Path>) -> CommandOutput {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    match cmd.output().await {
        Ok(output) => {
            let mut text = String::from_utf8_lossy(&output.stdout).to_string();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            CommandOutput {
                output: clip(text),
                exit_code: output.status.code().unwrap_or(1),
            }
        }
        Err(e) => CommandOutput {
            output: format!("Failed to run command '{}': {}", command, e),
            exit_code: 1,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommandArgs {
    pub command: String,
    pub working_dir: Option<PathBuf>,
}

pub struct RunCommandTool;

#[async_trait]
impl Tool for RunCommandTool {
    type Args = RunCommandArgs;

    fn name(&self) -> ToolName {
        ToolName::RunCommand
    }

    fn description(&self) -> &'static str {
        "Run a shell command and return its combined output. Use for builds, tests and git."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The command to run in the shell"
                },
                "workingDir": {
                    "type": "string",
                    "description": "The working directory to run the command in (optional)"
                }
            },
            "required": ["command"]
        })
    }

    fn parse_args(&self, args: &ToolArgs) -> Result<RunCommandArgs, ArgumentError> {
        Ok(RunCommandArgs {
            command: args.required_str("command")?,
            working_dir: args.optional_str("workingDir")?.map(PathBuf::from),
        })
    }

    fn describe(&self, args: &RunCommandArgs) -> String {
        match &args.working_dir {
            Some(dir) => format!("Executing command: {} (in {})", args.command, dir.display()),
            None => format!("Executing command: {}", args.command),
        }
    }

    fn approval(&self, args: &RunCommandArgs) -> Option<ApprovalRequest> {
        Some(ApprovalRequest {
            preview: self.describe(args),
            question: "Do you want to execute this command?",
            cancelled_message: "Command execution cancelled by user.",
        })
    }

    async fn execute(&self, args: RunCommandArgs) -> ToolResult {
        let result = run_command(&args.command, args.working_dir.as_deref()).await;
        let exit_code = result.exit_code;
        if result.success() {
            ToolResult::success(result.output).with_exit_code(exit_code)
        } else {
            ToolResult::error(result.output).with_exit_code(exit_code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::CLIP_MARKER;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_run_command_echo() {
        let result = run_command("echo hi", None).await;
        assert_eq!(result.output, "hi\n");
        assert_eq!(result.exit_code, 0);
        assert!(result.success());
    }

    #[tokio::test]
    async fn test_run_command_failure_captures_stderr() {
        let result = run_command("echo oops >&2; exit 3", None).await;
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.output, "oops\n");
        assert!(!result.success());
    }

    #[tokio::test]
    async fn test_run_command_stdout_then_stderr() {
        let result = run_command("echo out; echo err >&2", None).await;
        assert_eq!(result.output, "out\nerr\n");
    }

    #[tokio::test]
    async fn test_run_command_in_working_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "found").unwrap();

        let result = run_command("cat marker.txt", Some(dir.path())).await;
        assert_eq!(result.output, "found");
        assert_eq!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn test_run_command_missing_working_dir() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nowhere");

        let result = run_command("echo hi", Some(&missing)).await;
        assert_eq!(result.exit_code, 1);
        assert!(result.output.starts_with("Failed to run command 'echo hi'"));
    }

    #[tokio::test]
    async fn test_run_command_long_output_is_clipped() {
        let result = run_command("yes x | head -n 3000", None).await;
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains(CLIP_MARKER));
        assert!(result.output.starts_with("x\nx\n"));
    }

    #[test]
    fn test_parse_args() {
        let raw = ToolArgs::decode(
            ToolName::RunCommand,
            r#"{"command": " cargo test ", "workingDir": "  "}"#,
        )
        .unwrap();
        let args = RunCommandTool.parse_args(&raw).unwrap();
        assert_eq!(args.command, "cargo test");
        assert_eq!(args.working_dir, None);
    }

    #[test]
    fn test_parse_args_missing_command() {
        let raw = ToolArgs::decode(ToolName::RunCommand, r#"{"workingDir": "/tmp"}"#).unwrap();
        let err = RunCommandTool.parse_args(&raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: Missing required argument 'command' for tool 'runCommand'."
        );
    }

    #[test]
    fn test_approval_preview_is_literal_command() {
        let args = RunCommandArgs {
            command: "rm -rf build".to_string(),
            working_dir: None,
        };
        let request = RunCommandTool.approval(&args).unwrap();
        assert_eq!(request.preview, "Executing command: rm -rf build");
        assert_eq!(request.question, "Do you want to execute this command?");
        assert_eq!(request.cancelled_message, "Command execution cancelled by user.");
    }

    #[tokio::test]
    async fn test_execute_nonzero_exit_keeps_output_only() {
        let result = RunCommandTool
            .execute(RunCommandArgs {
                command: "echo failing; exit 2".to_string(),
                working_dir: None,
            })
            .await;

        assert_eq!(result.content, "failing\n");
        assert_eq!(result.exit_code, Some(2));
        assert!(result.is_error());
    }
}
