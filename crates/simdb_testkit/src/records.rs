//! Sample record types.
//!
//! Each type exercises a different identity declaration.

use serde::{Deserialize, Serialize};
use simdb_core::{Entity, IdentityField};

/// A record with a plain writable `id` and one non-persisted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Identity.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Optional e-mail address.
    pub email: Option<String>,
    /// Scratch value that is never written to the document.
    #[serde(skip_serializing, default)]
    pub draft_note: Option<String>,
}

impl Contact {
    /// Creates an unsaved contact called `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: None,
            draft_note: None,
        }
    }
}

impl Entity for Contact {
    fn identity_fields() -> Vec<IdentityField<Self>> {
        vec![IdentityField::<Self>::new("id", |c| c.id).writable(|c, id| c.id = id)]
    }
}

/// A record whose identity is private and set through [`Ticket::set_id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(rename = "ID")]
    id: i64,
    /// Summary line.
    pub title: String,
    /// Whether the ticket is closed.
    pub closed: bool,
}

impl Ticket {
    /// Creates an open, unsaved ticket.
    pub fn open(title: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            closed: false,
        }
    }

    /// Returns the identity.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Assigns the identity.
    pub fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl Entity for Ticket {
    fn identity_fields() -> Vec<IdentityField<Self>> {
        vec![IdentityField::<Self>::new("ID", Ticket::id).assigned_by(Ticket::set_id)]
    }
}

/// A record keyed by `number` even though it also has an `id` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    /// Explicit key.
    pub number: i64,
    /// Identifier from an upstream system; not the key.
    pub id: i64,
    /// Badge holder.
    pub holder: String,
}

impl Badge {
    /// Creates an unsaved badge carrying upstream identifier `id`.
    pub fn issued_to(holder: impl Into<String>, id: i64) -> Self {
        Self {
            number: 0,
            id,
            holder: holder.into(),
        }
    }
}

impl Entity for Badge {
    fn identity_fields() -> Vec<IdentityField<Self>> {
        vec![
            IdentityField::<Self>::new("id", |b| b.id).writable(|b, v| b.id = v),
            IdentityField::<Self>::new("number", |b| b.number)
                .writable(|b, v| b.number = v)
                .key(),
        ]
    }
}

/// A record whose `id` can be read but never assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Identity, fixed at construction.
    pub id: i64,
    /// Captured text.
    pub body: String,
}

impl Entity for Snapshot {
    fn identity_fields() -> Vec<IdentityField<Self>> {
        vec![IdentityField::<Self>::new("id", |s| s.id)]
    }
}

/// A record with no identity at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// Message text.
    pub message: String,
}

impl Entity for LogLine {}
