//! Error types for propagation cycles.

use std::path::PathBuf;
use thiserror::Error;

/// A read or write that failed while propagating.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to read source {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write peer {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// The file the failed operation targeted.
    pub fn path(&self) -> &std::path::Path {
        match self {
            SyncError::Read { path, .. } | SyncError::Write { path, .. } => path.as_path(),
        }
    }
}
