//! Artifact persistence.
//!
//! Serializes a rendered stub to `<output_dir>/<ClassName>Tests.cs`.
//! Existing files at that path are overwritten unconditionally; when two
//! classes produce the same stub name, the last writer wins.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::stub::TestStub;
use crate::walker::SOURCE_EXTENSION;

/// Errors that can occur while persisting an artifact.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Compute the output path for a stub.
pub fn output_path(output_dir: &Path, stub: &TestStub) -> PathBuf {
    output_dir.join(format!("{}.{}", stub.file_base_name, SOURCE_EXTENSION))
}

/// Render and persist one stub, blocking until the bytes are written.
///
/// Emits one informational line naming the path written, for operator
/// visibility. Returns the path on success.
pub fn write_stub(output_dir: &Path, stub: &TestStub) -> Result<PathBuf, WriteError> {
    let path = output_path(output_dir, stub);

    fs::write(&path, stub.render()).map_err(|source| WriteError::Io {
        path: path.clone(),
        source,
    })?;

    info!("tests generated at {}", path.display());
    Ok(path)
}
