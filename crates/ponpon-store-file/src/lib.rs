//! File-backed state medium for ponpon-journal.

mod error;

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use ponpon_core::StateMedium;
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub use error::FileStoreError;

/// Stores the habit record blob as a single file, replaced atomically on write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Use `path` as the state file. Nothing is touched until the first read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> Result<&Path, FileStoreError> {
        match self.path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Ok(Path::new(".")),
            Some(parent) => Ok(parent),
            None => Err(FileStoreError::NoParent(self.path.clone())),
        }
    }

    fn write_err(&self, source: std::io::Error) -> FileStoreError {
        FileStoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl StateMedium for FileStore {
    type Error = FileStoreError;

    fn get(&self) -> Result<Option<String>, Self::Error> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                debug!(path = %self.path.display(), bytes = contents.len(), "Read state file");
                Ok(Some(contents))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "State file not found");
                Ok(None)
            }
            Err(source) => Err(FileStoreError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn set(&mut self, blob: &str) -> Result<(), Self::Error> {
        let parent = self.parent_dir()?;
        fs::create_dir_all(parent).map_err(|err| self.write_err(err))?;

        // Stage next to the target so the rename stays on one filesystem.
        let mut staged = NamedTempFile::new_in(parent).map_err(|err| self.write_err(err))?;
        staged
            .write_all(blob.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|err| self.write_err(err))?;
        staged
            .persist(&self.path)
            .map_err(|err| self.write_err(err.error))?;

        info!(path = %self.path.display(), bytes = blob.len(), "Saved state file");
        Ok(())
    }
}
