//! # SimDB Core
//!
//! A generic, file-backed record store.
//!
//! An [`EntityStore<T>`] keeps every record of type `T` in memory and writes
//! the whole collection to one JSON envelope document after each change.
//! The document lives either in its own file or as an entry of a shared
//! zip archive (the default).
//!
//! This crate provides:
//! - The [`Entity`] trait and identity resolution ([`Identity`])
//! - [`EntityStore`] with insert, update, partial update, delete and lookup
//! - [`StoreConfig`] for choosing between archive and plain-file storage
//!
//! ## Example
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use simdb_core::{Entity, EntityStore, IdentityField};
//! use simdb_storage::InMemoryBackend;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl Entity for User {
//!     fn identity_fields() -> Vec<IdentityField<Self>> {
//!         vec![IdentityField::<Self>::new("id", |u| u.id).writable(|u, id| u.id = id)]
//!     }
//! }
//!
//! let mut users = EntityStore::<User>::with_backend(InMemoryBackend::new()).unwrap();
//! let alice = users.insert(User { id: 0, name: "Alice".into() }).unwrap();
//! assert_eq!(alice.id, 1);
//! assert_eq!(users.get_by_id(1).unwrap().name, "Alice");
//! assert_eq!(users.total_change(), 1);
//! ```
//!
//! ## Concurrency
//!
//! Stores are single-threaded and uncoordinated. Two stores (or processes)
//! writing the same target will silently overwrite each other and may
//! allocate the same identity twice.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod identity;
mod store;

pub use config::{
    document_name, StoreConfig, DEFAULT_ARCHIVE_PATH, DEFAULT_BASE_DIR, DOCUMENT_EXTENSION,
};
pub use error::{CoreError, CoreResult};
pub use identity::{Entity, IdGetter, IdSetter, Identity, IdentityAccess, IdentityField};
pub use store::{EntityStore, Mutator};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
