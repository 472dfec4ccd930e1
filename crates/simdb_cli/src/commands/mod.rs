//! CLI command implementations.

pub mod dump;
pub mod entries;
pub mod inspect;
pub mod verify;

use serde_json::Value;
use simdb_codec::Envelope;
use simdb_storage::{ArchiveBackend, DocumentBackend, FileBackend};
use std::path::Path;

/// Reads and decodes a document with untyped records.
///
/// With `entry` the path names an archive and the document is that entry;
/// otherwise the path is the document file itself.
pub fn load_document(
    path: &Path,
    entry: Option<&str>,
) -> Result<Envelope<Value>, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No file found at {:?}", path).into());
    }

    let bytes = match entry {
        Some(entry) => ArchiveBackend::new(path, entry).read()?,
        None => FileBackend::new(path).read()?,
    };
    let bytes = bytes.ok_or_else(|| match entry {
        Some(entry) => format!("Entry {entry:?} not found in {:?}", path),
        None => format!("No document found at {:?}", path),
    })?;

    tracing::debug!(path = %path.display(), entry = ?entry, bytes = bytes.len(), "read document");
    Ok(simdb_codec::decode(&bytes)?)
}
