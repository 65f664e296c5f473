//! Error types for Stubgen.

use std::path::PathBuf;

use crate::walker::WalkError;
use crate::writer::WriteError;

/// Top-level error type for Stubgen operations.
#[derive(Debug, thiserror::Error)]
pub enum StubgenError {
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("no C# source files found in {0}")]
    NoFilesFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("walk error: {0}")]
    Walk(#[from] WalkError),

    #[error("write error: {0}")]
    Write(#[from] WriteError),
}

/// Map an error to its exit code.
pub fn exit_code(error: &StubgenError) -> i32 {
    match error {
        StubgenError::PathNotFound(_) => 3,
        StubgenError::PermissionDenied(_) => 4,
        StubgenError::NoFilesFound(_) => 5,
        StubgenError::Io(_) => 1,
        StubgenError::Walk(_) => 2,
        StubgenError::Write(_) => 1,
    }
}
