//! Test fixtures and store helpers.
//!
//! Provides stores rooted in a temporary directory that is removed when the
//! fixture is dropped.

use simdb_core::{Entity, EntityStore, StoreConfig};
use simdb_storage::InMemoryBackend;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A store bound to a temporary directory.
pub struct TestStore<T: Entity> {
    /// The store instance.
    pub store: EntityStore<T>,
    /// Configuration used to open the store.
    config: StoreConfig,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: TempDir,
}

impl<T: Entity> TestStore<T> {
    /// Opens a store in archive mode inside a fresh temporary directory.
    pub fn archive() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = StoreConfig::new().archive_path(temp_dir.path().join("Database.simdb"));
        Self::open_in(temp_dir, config)
    }

    /// Opens a store in plain-file mode inside a fresh temporary directory.
    pub fn plain_file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = StoreConfig::new()
            .use_archive(false)
            .base_dir(temp_dir.path().join("Database"));
        Self::open_in(temp_dir, config)
    }

    fn open_in(temp_dir: TempDir, config: StoreConfig) -> Self {
        let store = EntityStore::open(&config).expect("Failed to open test store");
        Self {
            store,
            config,
            temp_dir,
        }
    }

    /// Opens a second, independent store over the same target.
    pub fn reopen(&self) -> EntityStore<T> {
        EntityStore::open(&self.config).expect("Failed to reopen test store")
    }

    /// Opens a store of another record type with the same configuration.
    pub fn sibling<U: Entity>(&self) -> EntityStore<U> {
        EntityStore::open(&self.config).expect("Failed to open sibling store")
    }

    /// Returns the configuration the store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the temporary root directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Returns the file holding the document: the archive in archive mode,
    /// the JSON file otherwise.
    pub fn document_path(&self) -> PathBuf {
        if self.config.use_archive {
            self.config.resolved_archive_path().to_path_buf()
        } else {
            self.config.resolved_file_path(self.store.type_name())
        }
    }
}

impl<T: Entity> std::ops::Deref for TestStore<T> {
    type Target = EntityStore<T>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl<T: Entity> std::ops::DerefMut for TestStore<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

/// Opens a store over a fresh in-memory backend.
///
/// The returned backend shares its slot with the store, so it can be used
/// to inspect writes or to open a second store over the same document.
pub fn memory_store<T: Entity>() -> (EntityStore<T>, InMemoryBackend) {
    let backend = InMemoryBackend::new();
    let store = EntityStore::with_backend(backend.clone()).expect("Failed to open memory store");
    (store, backend)
}

/// Opens a store over an in-memory backend preloaded with `document`.
pub fn memory_store_with<T: Entity>(document: Vec<u8>) -> (EntityStore<T>, InMemoryBackend) {
    let backend = InMemoryBackend::with_data(document);
    let store = EntityStore::with_backend(backend.clone()).expect("Failed to open memory store");
    (store, backend)
}
