//! Hand-written envelope documents.
//!
//! Useful for exercising the load path with content a store would never
//! produce itself, such as repeated identities.

use serde_json::{json, Value};

/// Builds an envelope document from raw JSON records.
///
/// The records are written as given, so they may repeat identities or
/// carry fields the record type does not know.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    type_name: String,
    total_change: u64,
    records: Vec<Value>,
}

impl DocumentBuilder {
    /// Starts a document for `type_name`.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Sets the save counter recorded in the document.
    #[must_use]
    pub fn total_change(mut self, total_change: u64) -> Self {
        self.total_change = total_change;
        self
    }

    /// Appends a raw record.
    #[must_use]
    pub fn record(mut self, record: Value) -> Self {
        self.records.push(record);
        self
    }

    /// Appends a [`crate::Contact`]-shaped record.
    #[must_use]
    pub fn contact(self, id: i64, name: &str) -> Self {
        self.record(json!({ "id": id, "name": name, "email": null }))
    }

    /// Encodes the document.
    pub fn build(&self) -> Vec<u8> {
        simdb_codec::encode(&self.type_name, &self.records, None, self.total_change)
            .expect("raw JSON records always encode")
    }
}
