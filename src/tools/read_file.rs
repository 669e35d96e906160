//! readFileContent tool - read a text file, clipped to a bounded size

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;

use super::{ArgumentError, EntryKind, FsError, Tool, ToolArgs, ToolName, ToolResult, clip};

/// Read a UTF-8 file, clipping long content
pub async fn read_file_content(path: &Path) -> Result<String, FsError> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| FsError::from_io(EntryKind::File, path, e))?;
    let content = String::from_utf8(bytes).map_err(|_| FsError::undecodable(path))?;
    Ok(clip(content))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadFileArgs {
    pub file_path: PathBuf,
}

pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    type Args = ReadFileArgs;

    fn name(&self) -> ToolName {
        ToolName::ReadFileContent
    }

    fn description(&self) -> &'static str {
        "Read and return the content of a file. Long files are clipped to their beginning and end."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "The path to the file to read."
                }
            },
            "required": ["filePath"]
        })
    }

    fn parse_args(&self, args: &ToolArgs) -> Result<ReadFileArgs, ArgumentError> {
        Ok(ReadFileArgs {
            file_path: PathBuf::from(args.required_str("filePath")?),
        })
    }

    fn describe(&self, args: &ReadFileArgs) -> String {
        format!("Reading file: {}", args.file_path.display())
    }

    async fn execute(&self, args: ReadFileArgs) -> ToolResult {
        match read_file_content(&args.file_path).await {
            Ok(content) => ToolResult::success(content),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::CLIP_MARKER;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_small_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.txt");
        std::fs::write(&path, "line 1\nline 2\n").unwrap();

        assert_eq!(read_file_content(&path).await.unwrap(), "line 1\nline 2\n");
    }

    #[tokio::test]
    async fn test_read_long_file_is_clipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.txt");
        let content = format!("{}{}{}", "a".repeat(1000), "b".repeat(3000), "c".repeat(1000));
        std::fs::write(&path, &content).unwrap();

        let text = read_file_content(&path).await.unwrap();
        assert_eq!(text, format!("{}{}{}", "a".repeat(1000), CLIP_MARKER, "c".repeat(1000)));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let err = read_file_content(&path).await.unwrap_err();
        assert!(matches!(err, FsError::NotFound { kind: EntryKind::File, .. }));
        assert_eq!(err.to_string(), format!("Error: File '{}' not found.", path.display()));
    }

    #[tokio::test]
    async fn test_read_binary_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let err = read_file_content(&path).await.unwrap_err();
        assert!(matches!(err, FsError::Undecodable { .. }));
    }

    #[tokio::test]
    async fn test_execute_passes_content_through() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# Notes").unwrap();

        let result = ReadFileTool.execute(ReadFileArgs { file_path: path }).await;
        assert!(!result.is_error());
        assert_eq!(result.content, "# Notes");
    }

    #[tokio::test]
    async fn test_execute_missing_file_is_error_text() {
        let dir = tempdir().unwrap();
        let result = ReadFileTool
            .execute(ReadFileArgs {
                file_path: dir.path().join("nope"),
            })
            .await;

        assert!(result.is_error());
        assert!(result.content.starts_with("Error: File '"));
    }

    #[test]
    fn test_parse_args_requires_path() {
        let raw = ToolArgs::decode(ToolName::ReadFileContent, "{}").unwrap();
        assert!(matches!(
            ReadFileTool.parse_args(&raw),
            Err(ArgumentError::Missing { field: "filePath", .. })
        ));
    }
}
