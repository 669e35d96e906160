//! Tool dispatcher - validates, gates and executes model tool calls

use colored::*;

use super::{
    EditFileTool, ListDirectoryTool, ReadFileTool, RunCommandTool, Tool, ToolArgs, ToolName, ToolRegistry,
    ToolResult,
};
use crate::approval::Approver;
use crate::llm::{ToolCall, ToolDefinition};

/// Routes each tool call to its handler and always produces a result
pub struct ToolDispatcher<A: Approver> {
    approver: A,
    registry: ToolRegistry,
}

impl<A: Approver> ToolDispatcher<A> {
    pub fn new(approver: A) -> Self {
        Self {
            approver,
            registry: ToolRegistry::standard(),
        }
    }

    /// Tool schemas to attach to completion requests
    pub fn definitions(&self) -> &[ToolDefinition] {
        self.registry.definitions()
    }

    pub fn approver(&self) -> &A {
        &self.approver
    }

    /// Handle one tool call. Unknown tools, bad arguments, declines and
    /// collaborator failures all come back as result text.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        let Some(name) = ToolName::parse(call.name()) else {
            log::warn!("Model requested unsupported tool '{}' (call {})", call.name(), call.id);
            println!("\n{} {}", "Unsupported tool requested:".red(), call.name());
            return ToolResult::error(format!("Error: Unsupported tool '{}'.", call.name()));
        };

        match name {
            ToolName::EditFile => self.run(&EditFileTool, call).await,
            ToolName::RunCommand => self.run(&RunCommandTool, call).await,
            ToolName::ListDirectory => self.run(&ListDirectoryTool, call).await,
            ToolName::ReadFileContent => self.run(&ReadFileTool, call).await,
        }
    }

    async fn run<T: Tool>(&self, tool: &T, call: &ToolCall) -> ToolResult {
        let args = match ToolArgs::decode(tool.name(), call.arguments()).and_then(|raw| tool.parse_args(&raw)) {
            Ok(args) => args,
            Err(e) => {
                log::warn!("Rejected arguments for {} (call {}): {}", tool.name(), call.id, e);
                println!("\n{}", e.to_string().red());
                return ToolResult::error(e.to_string());
            }
        };

        let approval = tool.approval(&args);
        debug_assert_eq!(
            approval.is_some(),
            tool.name().is_mutating(),
            "approval gate disagrees with {}",
            tool.name()
        );

        match approval {
            Some(request) => {
                if !self.approver.confirm(&request) {
                    log::info!("Operator declined {} (call {})", tool.name(), call.id);
                    println!("{}", request.cancelled_message.yellow());
                    return ToolResult::cancelled(request.cancelled_message);
                }
            }
            None => println!("\n{}", tool.describe(&args).cyan()),
        }

        log::info!("Executing {} (call {})", tool.name(), call.id);
        let result = tool.execute(args).await;

        if let Some(code) = result.exit_code {
            log::info!("{} (call {}) exited with code {}", tool.name(), call.id, code);
        }
        println!("{}", tool.report(&result).dimmed());

        result
    }
}
