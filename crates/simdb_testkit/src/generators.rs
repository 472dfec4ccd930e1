//! Property-based test generators using proptest.
//!
//! Provides strategies for generating records and store operation
//! sequences.

use crate::records::Contact;
use proptest::prelude::*;

/// Strategy for generating display names.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{0,11}( [A-Z][a-z]{0,11})?").expect("Invalid regex")
}

/// Strategy for generating unsaved contacts.
///
/// The `id` is random so tests can check that stores ignore it.
pub fn contact_strategy() -> impl Strategy<Value = Contact> {
    (
        any::<i64>(),
        name_strategy(),
        prop::option::of("[a-z]{1,8}@example\\.com"),
        prop::option::of("[a-z ]{0,16}"),
    )
        .prop_map(|(id, name, email, draft_note)| Contact {
            id,
            name,
            email,
            draft_note,
        })
}

/// A single operation applied to a `Contact` store.
#[derive(Debug, Clone)]
pub enum StoreOp {
    /// Insert a new contact.
    Insert(Contact),
    /// Rename contact `id` through a full update.
    Rename {
        /// Target identity.
        id: i64,
        /// New name.
        name: String,
    },
    /// Set the e-mail of contact `id` through a partial update.
    SetEmail {
        /// Target identity.
        id: i64,
        /// New address.
        email: String,
    },
    /// Delete contact `id`.
    Delete(i64),
}

/// Strategy for one store operation.
///
/// Target identities are drawn from a small range so that operations hit
/// both existing and missing records.
pub fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        3 => contact_strategy().prop_map(StoreOp::Insert),
        1 => (1i64..12, name_strategy()).prop_map(|(id, name)| StoreOp::Rename { id, name }),
        1 => (1i64..12, "[a-z]{1,8}@example\\.com")
            .prop_map(|(id, email)| StoreOp::SetEmail { id, email }),
        1 => (1i64..12).prop_map(StoreOp::Delete),
    ]
}

/// Strategy for a sequence of store operations.
pub fn store_ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<StoreOp>> {
    prop::collection::vec(store_op_strategy(), 0..max_len)
}

/// Strategy for identity lists with repeats, as found in hand-edited
/// documents.
pub fn repeated_ids_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(1i64..8, 0..24)
}
