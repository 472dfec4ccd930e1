//! Document backend trait definition.

use crate::error::StorageResult;
use std::fmt;

/// The persistence strategy behind a [`DocumentBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// One standalone file per record type.
    File,
    /// One named entry inside a shared archive file.
    Archive,
    /// Process-local memory, used by tests.
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::File => "file",
            Self::Archive => "archive",
            Self::Memory => "memory",
        };
        f.write_str(name)
    }
}

/// A storage target holding exactly one persisted document.
///
/// Backends are **opaque byte stores**. They do not interpret the document
/// they hold; the envelope format belongs to `simdb_codec`.
///
/// # Invariants
///
/// - `read` returns `None` when no document has been written yet
/// - `read` after a successful `write` returns exactly the written bytes
/// - `write` replaces the whole document
/// - Any file or archive handle is acquired inside the call and released
///   before it returns, on error paths too
///
/// Writes are not atomic. A crash in the middle of `write` can leave the
/// target truncated or, for archives, unreadable.
///
/// # Implementors
///
/// - [`super::FileBackend`] - standalone file
/// - [`super::ArchiveBackend`] - entry inside a shared zip archive
/// - [`super::InMemoryBackend`] - for testing
pub trait DocumentBackend: Send + Sync {
    /// Reads the full document.
    ///
    /// Returns `Ok(None)` if the document does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying file or archive cannot be read.
    fn read(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the document with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying file or archive cannot be written.
    fn write(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Returns the strategy this backend implements.
    fn kind(&self) -> BackendKind;

    /// Returns a human-readable description of the target, for logs.
    fn describe(&self) -> String;
}

impl<B: DocumentBackend + ?Sized> DocumentBackend for Box<B> {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        (**self).read()
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        (**self).write(data)
    }

    fn kind(&self) -> BackendKind {
        (**self).kind()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
