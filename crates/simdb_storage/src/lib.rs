//! # SimDB Storage
//!
//! Document backends for SimDB.
//!
//! Each backend holds exactly one persisted document (the envelope for one
//! record type) and treats it as **opaque bytes**. The envelope format is
//! owned by `simdb_codec`.
//!
//! ## Available Backends
//!
//! - [`FileBackend`] - one standalone file per record type
//! - [`ArchiveBackend`] - one named entry inside a shared zip archive
//! - [`InMemoryBackend`] - for testing
//!
//! ## Limitations
//!
//! No backend coordinates concurrent writers, and none replaces its target
//! atomically. Two stores writing the same target will overwrite each other.
//!
//! ## Example
//!
//! ```rust
//! use simdb_storage::{DocumentBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! assert!(backend.read().unwrap().is_none());
//! backend.write(b"hello world").unwrap();
//! assert_eq!(backend.read().unwrap(), Some(b"hello world".to_vec()));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod archive;
mod backend;
mod error;
mod file;
mod memory;

pub use archive::{ArchiveBackend, ArchiveEntry};
pub use backend::{BackendKind, DocumentBackend};
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
