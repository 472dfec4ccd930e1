//! Store configuration.

use std::path::{Path, PathBuf};

/// Default archive file shared by all record types.
pub const DEFAULT_ARCHIVE_PATH: &str = "Database.simdb";

/// Default directory for plain-file documents.
pub const DEFAULT_BASE_DIR: &str = "Database";

/// Extension of every document, both as a file and as an archive entry.
pub const DOCUMENT_EXTENSION: &str = "json";

/// Configuration for opening an [`crate::EntityStore`].
///
/// Defaults to archive mode with the archive at [`DEFAULT_ARCHIVE_PATH`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store documents as entries of a shared archive (true) or as one
    /// standalone file per record type (false).
    pub use_archive: bool,

    /// Explicit plain-file path. Overrides `base_dir/<TypeName>.json`.
    pub file_path: Option<PathBuf>,

    /// Explicit archive path. Overrides [`DEFAULT_ARCHIVE_PATH`].
    pub archive_path: Option<PathBuf>,

    /// Directory holding plain-file documents when `file_path` is unset.
    pub base_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            use_archive: true,
            file_path: None,
            archive_path: None,
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether documents live in a shared archive.
    #[must_use]
    pub fn use_archive(mut self, value: bool) -> Self {
        self.use_archive = value;
        self
    }

    /// Sets an explicit plain-file path.
    #[must_use]
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Sets an explicit archive path.
    #[must_use]
    pub fn archive_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.archive_path = Some(path.into());
        self
    }

    /// Sets the directory for default plain-file paths.
    #[must_use]
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Returns the plain-file path used for `type_name`.
    #[must_use]
    pub fn resolved_file_path(&self, type_name: &str) -> PathBuf {
        self.file_path
            .clone()
            .unwrap_or_else(|| self.base_dir.join(document_name(type_name)))
    }

    /// Returns the archive path.
    #[must_use]
    pub fn resolved_archive_path(&self) -> &Path {
        self.archive_path
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_ARCHIVE_PATH))
    }
}

/// Returns the document name for a record type: `<TypeName>.json`.
///
/// Used both as the default file name and as the archive entry name.
#[must_use]
pub fn document_name(type_name: &str) -> String {
    format!("{type_name}.{DOCUMENT_EXTENSION}")
}
