//! editFile tool - replace text in a file, or create/overwrite it

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;

use super::{ArgumentError, EntryKind, FsError, Tool, ToolArgs, ToolName, ToolResult};
use crate::approval::ApprovalRequest;

/// Apply an edit and report whether the file content changed.
///
/// With an empty `find` the file is created with `replace` (parent directories
/// included) or overwritten when its content differs. Otherwise every literal
/// occurrence of `find` is replaced in an existing file.
pub async fn edit_file(path: &Path, find: &str, replace: &str) -> Result<bool, FsError> {
    if find.is_empty() {
        return overwrite_file(path, replace).await;
    }

    let bytes = fs::read(path)
        .await
        .map_err(|e| FsError::from_io(EntryKind::File, path, e))?;
    let content = String::from_utf8(bytes).map_err(|_| FsError::undecodable(path))?;

    if !content.contains(find) {
        return Ok(false);
    }

    let updated = content.replace(find, replace);
    if updated == content {
        return Ok(false);
    }

    fs::write(path, updated)
        .await
        .map_err(|e| FsError::from_io(EntryKind::File, path, e))?;
    Ok(true)
}

async fn overwrite_file(path: &Path, content: &str) -> Result<bool, FsError> {
    match fs::read(path).await {
        Ok(existing) if existing == content.as_bytes() => return Ok(false),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| FsError::from_io(EntryKind::Directory, parent, e))?;
            }
        }
        Err(e) => return Err(FsError::from_io(EntryKind::File, path, e)),
    }

    fs::write(path, content)
        .await
        .map_err(|e| FsError::from_io(EntryKind::File, path, e))?;
    Ok(true)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditFileArgs {
    pub file_path: PathBuf,
    pub find: String,
    pub replace: String,
}

pub struct EditFileTool;

#[async_trait]
impl Tool for EditFileTool {
    type Args = EditFileArgs;

    fn name(&self) -> ToolName {
        ToolName::EditFile
    }

    fn description(&self) -> &'static str {
        "Edit a file by replacing every occurrence of findStr with replaceStr. \
         With an empty findStr the file is created with replaceStr as its content, \
         or overwritten if it already exists. Returns whether the file changed."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "The path of the file to modify"
                },
                "findStr": {
                    "type": "string",
                    "description": "The exact text to find in the file; empty to create or overwrite the file"
                },
                "replaceStr": {
                    "type": "string",
                    "description": "The text to replace it with"
                }
            },
            "required": ["filePath"]
        })
    }

    fn parse_args(&self, args: &ToolArgs) -> Result<EditFileArgs, ArgumentError> {
        Ok(EditFileArgs {
            file_path: PathBuf::from(args.required_str("filePath")?),
            find: args.verbatim_str("findStr")?,
            replace: args.verbatim_str("replaceStr")?,
        })
    }

    fn describe(&self, args: &EditFileArgs) -> String {
        format!("Editing file: {}", args.file_path.display())
    }

    fn approval(&self, args: &EditFileArgs) -> Option<ApprovalRequest> {
        let mut preview = self.describe(args);
        if !args.find.is_empty() {
            preview.push_str(&format!("\nContent to find\n```\n{}\n```", args.find));
        }
        if !args.replace.is_empty() {
            preview.push_str(&format!("\nContent to replace with\n```\n{}\n```", args.replace));
        }

        Some(ApprovalRequest {
            preview,
            question: "Do you want to edit this file?",
            cancelled_message: "File edit cancelled by user.",
        })
    }

    async fn execute(&self, args: EditFileArgs) -> ToolResult {
        match edit_file(&args.file_path, &args.find, &args.replace).await {
            Ok(changed) => ToolResult::success(changed.to_string()),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }

    fn report(&self, result: &ToolResult) -> String {
        match result.content.as_str() {
            "true" if !result.is_error() => "File edited successfully".to_string(),
            "false" if !result.is_error() => "No changes made".to_string(),
            other => other.to_string(),
        }
    }
}
