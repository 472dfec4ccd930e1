//! # SimDB Codec
//!
//! JSON envelope encoding/decoding for SimDB.
//!
//! Every record type is persisted as one envelope document:
//!
//! ```text
//! {
//!   "EntityTypeName": "User",
//!   "EntityLastUpdate": "2024-03-01T12:30:00Z",
//!   "EntityTotalChange": 4,
//!   "EntityData": [ { ... }, { ... } ]
//! }
//! ```
//!
//! - Output is indented for human readability
//! - Records keep their in-memory order
//! - Fields marked `#[serde(skip_serializing)]` on the record type are
//!   omitted; pair them with `#[serde(default)]` so decoding does not
//!   require them
//! - Decoding tolerates empty input and missing keys
//!
//! ## Usage
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use simdb_codec::{decode, encode, Envelope};
//!
//! #[derive(Serialize, Deserialize)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! let users = vec![User { id: 1, name: "Alice".into() }];
//! let bytes = encode("User", &users, None, 1).unwrap();
//!
//! let envelope: Envelope<User> = decode(&bytes).unwrap();
//! assert_eq!(envelope.total_change, 1);
//! assert_eq!(envelope.records[0].name, "Alice");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod envelope;
mod error;

pub use envelope::{
    decode, encode, Envelope, KEY_DATA, KEY_LAST_UPDATE, KEY_TOTAL_CHANGE, KEY_TYPE_NAME,
};
pub use error::{CodecError, CodecResult};
