//! Error types for SimDB core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in SimDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] simdb_storage::StorageError),

    /// Envelope codec error.
    #[error("codec error: {0}")]
    Codec(#[from] simdb_codec::CodecError),

    /// The record type cannot be stored: no identity field, or the identity
    /// cannot be written.
    #[error("configuration error for {type_name}: {message}")]
    Configuration {
        /// Name of the record type.
        type_name: String,
        /// Description of the problem.
        message: String,
    },

    /// No record with the given identity exists in the working set.
    #[error("{type_name} with id {id} not found")]
    NotFound {
        /// Name of the record type.
        type_name: String,
        /// The identity that was looked up.
        id: i64,
    },

    /// The next identity would not fit in an `i64`.
    #[error("identity space exhausted for {type_name}")]
    IdentityOverflow {
        /// Name of the record type.
        type_name: String,
    },
}

impl CoreError {
    /// Creates a configuration error.
    pub fn configuration(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(type_name: impl Into<String>, id: i64) -> Self {
        Self::NotFound {
            type_name: type_name.into(),
            id,
        }
    }

    /// Returns true if this is a [`CoreError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a [`CoreError::Configuration`].
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
