//! The persisted envelope document.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

/// JSON key of the informational record type name.
pub const KEY_TYPE_NAME: &str = "EntityTypeName";
/// JSON key of the last successful save timestamp.
pub const KEY_LAST_UPDATE: &str = "EntityLastUpdate";
/// JSON key of the save counter.
pub const KEY_TOTAL_CHANGE: &str = "EntityTotalChange";
/// JSON key of the record array.
pub const KEY_DATA: &str = "EntityData";

/// A decoded document for one record type.
///
/// `type_name` is informational only; nothing relies on it matching the
/// record type that decodes the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    /// Record type name as written by the encoder, if present.
    pub type_name: Option<String>,
    /// Time of the most recent successful save, `None` if never saved.
    pub last_update: Option<DateTime<Utc>>,
    /// Number of saves performed on this document.
    pub total_change: u64,
    /// Records in document order.
    pub records: Vec<T>,
}

impl<T> Envelope<T> {
    /// Returns an envelope with no records and no history.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            type_name: None,
            last_update: None,
            total_change: 0,
            records: Vec::new(),
        }
    }
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    #[serde(rename = "EntityTypeName")]
    type_name: &'a str,
    #[serde(rename = "EntityLastUpdate")]
    last_update: Option<DateTime<Utc>>,
    #[serde(rename = "EntityTotalChange")]
    total_change: u64,
    #[serde(rename = "EntityData")]
    records: &'a [T],
}

// Every key is optional and `null` is accepted wherever a value may be absent.
#[derive(Deserialize)]
struct WireEnvelope<T> {
    #[serde(rename = "EntityTypeName")]
    type_name: Option<String>,
    #[serde(rename = "EntityLastUpdate")]
    last_update: Option<DateTime<Utc>>,
    #[serde(rename = "EntityTotalChange")]
    total_change: Option<u64>,
    #[serde(rename = "EntityData")]
    records: Option<Vec<T>>,
}

impl<T> From<WireEnvelope<T>> for Envelope<T> {
    fn from(wire: WireEnvelope<T>) -> Self {
        Self {
            type_name: wire.type_name,
            last_update: wire.last_update,
            total_change: wire.total_change.unwrap_or(0),
            records: wire.records.unwrap_or_default(),
        }
    }
}

/// Encodes records and metadata into an indented JSON document.
///
/// Field filtering is the record type's business: fields marked
/// `#[serde(skip_serializing)]` never reach the document.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if a record fails to serialize,
/// for example a map with non-string keys.
pub fn encode<T: Serialize>(
    type_name: &str,
    records: &[T],
    last_update: Option<DateTime<Utc>>,
    total_change: u64,
) -> CodecResult<Vec<u8>> {
    let envelope = EnvelopeRef {
        type_name,
        last_update,
        total_change,
        records,
    };
    serde_json::to_vec_pretty(&envelope).map_err(|e| CodecError::encoding_failed(e.to_string()))
}

/// Decodes a document produced by [`encode`].
///
/// Empty or whitespace-only input, and a bare `null`, decode to
/// [`Envelope::empty`]. Missing keys take their empty values.
///
/// # Errors
///
/// Returns [`CodecError::DecodingFailed`] on malformed JSON or records that
/// do not match `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<Envelope<T>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Envelope::empty());
    }

    let wire: Option<WireEnvelope<T>> =
        serde_json::from_slice(bytes).map_err(|e| CodecError::from_decode(&e))?;
    Ok(wire.map(Envelope::from).unwrap_or_default())
}
