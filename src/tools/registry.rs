//! Static catalogue of the tools advertised to the model

use super::{EditFileTool, ListDirectoryTool, ReadFileTool, RunCommandTool, Tool};
use crate::llm::ToolDefinition;

/// Immutable list of tool schemas attached to every completion request
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    definitions: Vec<ToolDefinition>,
}

impl ToolRegistry {
    /// The four standard tools, in advertised order
    pub fn standard() -> Self {
        Self {
            definitions: vec![
                EditFileTool.definition(),
                RunCommandTool.definition(),
                ListDirectoryTool.definition(),
                ReadFileTool.definition(),
            ],
        }
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
