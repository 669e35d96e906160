//! listDirectory tool - list files and directories in a path

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;

use super::{ArgumentError, EntryKind, FsError, Tool, ToolArgs, ToolName, ToolResult};

/// One line per entry, sorted by name, each marked as file or directory
pub async fn list_directory(path: &Path) -> Result<String, FsError> {
    let display = path.display().to_string();
    let mut dir = fs::read_dir(path)
        .await
        .map_err(|e| FsError::from_io(EntryKind::Directory, path, e))?;

    let mut entries = Vec::new();
    while let Some(entry) = dir
        .next_entry()
        .await
        .map_err(|e| FsError::from_io(EntryKind::Directory, path, e))?
    {
        let name = entry.file_name().to_string_lossy().to_string();
        // Follow symlinks; anything that cannot be inspected counts as a file
        let is_dir = fs::metadata(entry.path()).await.map(|m| m.is_dir()).unwrap_or(false);
        entries.push((name, is_dir));
    }

    if entries.is_empty() {
        return Ok(format!("Directory '{}' is empty.", display));
    }

    entries.sort();

    let mut result = format!("Contents of directory '{}':", display);
    for (name, is_dir) in entries {
        let kind = if is_dir { EntryKind::Directory } else { EntryKind::File };
        result.push_str(&format!("\n- {} ({})", name, kind));
    }

    Ok(result)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDirectoryArgs {
    pub dir_path: PathBuf,
}

pub struct ListDirectoryTool;

#[async_trait]
impl Tool for ListDirectoryTool {
    type Args = ListDirectoryArgs;

    fn name(&self) -> ToolName {
        ToolName::ListDirectory
    }

    fn description(&self) -> &'static str {
        "List the contents of a directory."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "dirPath": {
                    "type": "string",
                    "description": "The path to the directory to list. Defaults to the current directory."
                }
            },
            "required": []
        })
    }

    fn parse_args(&self, args: &ToolArgs) -> Result<ListDirectoryArgs, ArgumentError> {
        let dir_path = args.optional_str("dirPath")?.unwrap_or_else(|| ".".to_string());
        Ok(ListDirectoryArgs {
            dir_path: PathBuf::from(dir_path),
        })
    }

    fn describe(&self, args: &ListDirectoryArgs) -> String {
        format!("Listing directory: {}", args.dir_path.display())
    }

    async fn execute(&self, args: ListDirectoryArgs) -> ToolResult {
        match list_directory(&args.dir_path).await {
            Ok(listing) => ToolResult::success(listing),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}
