//! Error types for file-backed state storage.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during `FileStore` operations.
#[derive(Error, Debug)]
pub enum FileStoreError {
    /// The state file exists but could not be read.
    #[error("Failed to read state file {path}: {source}")]
    Read {
        /// Location of the state file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The state file could not be written.
    #[error("Failed to write state file {path}: {source}")]
    Write {
        /// Location of the state file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The state file path has no parent directory to stage writes in.
    #[error("State file path has no parent directory: {0}")]
    NoParent(PathBuf),
}
