//! Plain-file backend: one JSON document per record type.

use crate::backend::{BackendKind, DocumentBackend};
use crate::error::StorageResult;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A backend storing the document as a standalone file.
///
/// Writes replace the file wholesale. Missing parent directories are
/// created on write.
///
/// # Example
///
/// ```no_run
/// use simdb_storage::{DocumentBackend, FileBackend};
///
/// let mut backend = FileBackend::new("Database/User.json");
/// backend.write(b"{}").unwrap();
/// assert_eq!(backend.read().unwrap().as_deref(), Some(&b"{}"[..]));
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Creates a backend for the file at `path`.
    ///
    /// Nothing is touched on disk until the first `read` or `write`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentBackend for FileBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = File::create(&self.path)?;
        file.write_all(data)?;
        file.sync_all()?;
        tracing::trace!(path = %self.path.display(), bytes = data.len(), "wrote document file");
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::File
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
