//! Filesystem failure kinds shared by the file tools
//!
//! The `Display` text is what the model reads in the transcript.

use std::fmt;
use std::io;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => f.write_str("File"),
            EntryKind::Directory => f.write_str("Directory"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FsError {
    #[error("Error: {kind} '{path}' not found.")]
    NotFound { kind: EntryKind, path: String },

    #[error("Error: Permission denied to access '{path}'.")]
    PermissionDenied { path: String },

    #[error("Error: Unable to decode '{path}'. The file might be binary or use an unsupported encoding.")]
    Undecodable { path: String },

    #[error("Error accessing '{path}': {source}")]
    Io { path: String, source: io::Error },
}

impl FsError {
    /// Classify an IO failure on `path`
    pub fn from_io(kind: EntryKind, path: &Path, err: io::Error) -> Self {
        let path = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { kind, path },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path },
            io::ErrorKind::InvalidData => FsError::Undecodable { path },
            _ => FsError::Io { path, source: err },
        }
    }

    pub fn undecodable(path: &Path) -> Self {
        FsError::Undecodable {
            path: path.display().to_string(),
        }
    }
}
