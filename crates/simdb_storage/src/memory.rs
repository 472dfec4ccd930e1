//! In-memory document backend for testing.

use crate::backend::{BackendKind, DocumentBackend};
use crate::error::StorageResult;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Slot {
    document: RwLock<Option<Vec<u8>>>,
    writes: AtomicU64,
}

/// An in-memory document backend.
///
/// Clones share the same slot, so a test can hand one clone to a store and
/// keep another to inspect what was written, or open a second store over
/// the same document.
///
/// # Example
///
/// ```rust
/// use simdb_storage::{DocumentBackend, InMemoryBackend};
///
/// let mut backend = InMemoryBackend::new();
/// let observer = backend.clone();
/// backend.write(b"test data").unwrap();
/// assert_eq!(observer.read().unwrap(), Some(b"test data".to_vec()));
/// assert_eq!(observer.write_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    slot: Arc<Slot>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that already holds `data`.
    ///
    /// Useful for loading hand-written documents.
    #[must_use]
    pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
        let backend = Self::new();
        *backend.slot.document.write() = Some(data.into());
        backend
    }

    /// Returns a copy of the stored document, if any.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.slot.document.read().clone()
    }

    /// Returns how many writes this slot has received.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.slot.writes.load(Ordering::SeqCst)
    }
}

impl DocumentBackend for InMemoryBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data())
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        *self.slot.document.write() = Some(data.to_vec());
        self.slot.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
