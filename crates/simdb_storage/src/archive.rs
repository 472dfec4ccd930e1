//! Archive backend: one named entry inside a shared zip archive.

use crate::backend::{BackendKind, DocumentBackend};
use crate::error::{StorageError, StorageResult};
use std::fs;
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// A named entry inside an archive, as listed by [`ArchiveBackend::entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry name, e.g. `User.json`.
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Compressed size in bytes.
    pub compressed_size: u64,
}

/// A backend storing the document as one entry of a zip archive.
///
/// Several backends may point at the same archive with different entry
/// names; each write keeps every other entry intact.
///
/// A write rebuilds the archive in memory with the target entry replaced
/// and then rewrites the archive file. This is not atomic: a crash during
/// the final write can leave the whole archive unreadable.
///
/// # Example
///
/// ```no_run
/// use simdb_storage::{ArchiveBackend, DocumentBackend};
///
/// let mut users = ArchiveBackend::new("Database.simdb", "User.json");
/// let mut orders = ArchiveBackend::new("Database.simdb", "Order.json");
/// users.write(b"{}").unwrap();
/// orders.write(b"{}").unwrap();
/// assert!(users.read().unwrap().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveBackend {
    path: PathBuf,
    entry_name: String,
}

impl ArchiveBackend {
    /// Creates a backend for `entry_name` inside the archive at `path`.
    pub fn new(path: impl Into<PathBuf>, entry_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            entry_name: entry_name.into(),
        }
    }

    /// Returns the path to the archive file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the entry name inside the archive.
    #[must_use]
    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    /// Lists all entries of the archive at `path`.
    ///
    /// A missing or zero-length archive has no entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive exists but cannot be read.
    pub fn entries(path: &Path) -> StorageResult<Vec<ArchiveEntry>> {
        let Some(mut archive) = open_archive(path)? else {
            return Ok(Vec::new());
        };

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let file = archive.by_index_raw(index)?;
            entries.push(ArchiveEntry {
                name: file.name().to_string(),
                size: file.size(),
                compressed_size: file.compressed_size(),
            });
        }
        Ok(entries)
    }

    /// Creates an empty archive file if none exists yet.
    fn ensure_exists(&self) -> StorageResult<()> {
        if self.path.exists() {
            return Ok(());
        }
        create_parent_dir(&self.path)?;
        let empty = ZipWriter::new(Cursor::new(Vec::new())).finish()?;
        fs::write(&self.path, empty.into_inner())?;
        tracing::debug!(path = %self.path.display(), "created empty archive");
        Ok(())
    }
}

impl DocumentBackend for ArchiveBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        self.ensure_exists()?;
        let Some(mut archive) = open_archive(&self.path)? else {
            return Ok(None);
        };

        let mut entry = match archive.by_name(&self.entry_name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut data = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry.read_to_end(&mut data)?;
        Ok(Some(data))
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        if let Some(mut archive) = open_archive(&self.path)? {
            for index in 0..archive.len() {
                let file = archive.by_index_raw(index)?;
                if file.name() == self.entry_name {
                    continue;
                }
                writer.raw_copy_file(file)?;
            }
        }

        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.start_file(self.entry_name.as_str(), options)?;
        writer.write_all(data)?;
        let rebuilt = writer.finish()?.into_inner();

        create_parent_dir(&self.path)?;
        let mut file = fs::File::create(&self.path)?;
        file.write_all(&rebuilt)?;
        file.sync_all()?;

        tracing::trace!(
            path = %self.path.display(),
            entry = %self.entry_name,
            bytes = data.len(),
            "wrote archive entry"
        );
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Archive
    }

    fn describe(&self) -> String {
        format!("{}#{}", self.path.display(), self.entry_name)
    }
}

/// Opens the archive at `path`, or `None` when it is missing or zero-length.
fn open_archive(path: &Path) -> StorageResult<Option<ZipArchive<Cursor<Vec<u8>>>>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if bytes.is_empty() {
        return Ok(None);
    }

    match ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => Ok(Some(archive)),
        Err(ZipError::Io(e)) => Err(e.into()),
        Err(e) => Err(StorageError::corrupted(format!(
            "{}: {e}",
            path.display()
        ))),
    }
}

fn create_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
