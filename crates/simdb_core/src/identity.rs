//! Record identity: the `Entity` trait and identity field resolution.
//!
//! A record type declares the integer fields that could act as its identity
//! through [`Entity::identity_fields`]. [`Identity::resolve`] then picks one:
//!
//! 1. the field marked with [`IdentityField::key`], if any
//! 2. otherwise the field named `id`, compared case-insensitively
//!
//! If neither exists the type cannot be stored and resolution fails with
//! [`CoreError::Configuration`].

use crate::error::{CoreError, CoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Reads an identity value from a record.
pub type IdGetter<T> = fn(&T) -> i64;

/// Writes an identity value into a record.
pub type IdSetter<T> = fn(&mut T, i64);

/// Trait for record types stored by an [`crate::EntityStore`].
///
/// Persistence goes through `serde`. Fields that must not be written to the
/// document are marked `#[serde(skip_serializing, default)]`.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use simdb_core::{Entity, IdentityField};
///
/// #[derive(Clone, Serialize, Deserialize)]
/// struct User {
///     id: i64,
///     name: String,
///     #[serde(skip_serializing, default)]
///     session: Option<String>,
/// }
///
/// impl Entity for User {
///     fn identity_fields() -> Vec<IdentityField<Self>> {
///         vec![IdentityField::<Self>::new("id", |u| u.id).writable(|u, id| u.id = id)]
///     }
/// }
///
/// assert_eq!(User::type_name(), "User");
/// ```
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Integer fields that may serve as this type's identity.
    ///
    /// The default is empty, which makes the type unstorable.
    fn identity_fields() -> Vec<IdentityField<Self>> {
        Vec::new()
    }

    /// Name used for the default document path and archive entry.
    ///
    /// Defaults to the last path segment of the Rust type name with any
    /// generic arguments removed.
    fn type_name() -> String {
        short_type_name(std::any::type_name::<Self>()).to_string()
    }
}

/// How an identity value is written back into a record.
pub enum IdentityAccess<T> {
    /// The field is written directly.
    Writable(IdSetter<T>),
    /// The field is private and set through a dedicated assignment method.
    AssignMethod(IdSetter<T>),
    /// The field cannot be written.
    ReadOnly,
}

impl<T> Clone for IdentityAccess<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for IdentityAccess<T> {}

impl<T> fmt::Debug for IdentityAccess<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Writable(_) => "Writable",
            Self::AssignMethod(_) => "AssignMethod",
            Self::ReadOnly => "ReadOnly",
        };
        f.write_str(name)
    }
}

/// Describes one integer field of a record type.
pub struct IdentityField<T> {
    name: &'static str,
    is_key: bool,
    get: IdGetter<T>,
    access: IdentityAccess<T>,
}

impl<T> IdentityField<T> {
    /// Describes a read-only field called `name`.
    pub const fn new(name: &'static str, get: IdGetter<T>) -> Self {
        Self {
            name,
            is_key: false,
            get,
            access: IdentityAccess::ReadOnly,
        }
    }

    /// Marks this field as the explicit key of the type.
    #[must_use]
    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    /// Makes the field directly writable.
    #[must_use]
    pub fn writable(mut self, set: IdSetter<T>) -> Self {
        self.access = IdentityAccess::Writable(set);
        self
    }

    /// Routes writes through a dedicated assignment method.
    #[must_use]
    pub fn assigned_by(mut self, assign: IdSetter<T>) -> Self {
        self.access = IdentityAccess::AssignMethod(assign);
        self
    }

    /// Returns the field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if the field is marked as the key.
    #[must_use]
    pub const fn is_key(&self) -> bool {
        self.is_key
    }

    /// Returns how the field is written.
    #[must_use]
    pub const fn access(&self) -> IdentityAccess<T> {
        self.access
    }
}

impl<T> Clone for IdentityField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for IdentityField<T> {}

impl<T> fmt::Debug for IdentityField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityField")
            .field("name", &self.name)
            .field("is_key", &self.is_key)
            .field("access", &self.access)
            .finish()
    }
}

/// The resolved identity of a record type.
pub struct Identity<T> {
    type_name: String,
    field: IdentityField<T>,
}

impl<T: Entity> Identity<T> {
    /// Resolves the identity field of `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] if `T` has neither a key field
    /// nor a field named `id`.
    pub fn resolve() -> CoreResult<Self> {
        let type_name = T::type_name();
        let fields = T::identity_fields();

        let field = fields
            .iter()
            .find(|f| f.is_key())
            .or_else(|| fields.iter().find(|f| f.name().eq_ignore_ascii_case("id")))
            .copied()
            .ok_or_else(|| {
                CoreError::configuration(
                    type_name.as_str(),
                    "no identity field: declare a field named `id` or mark one as key",
                )
            })?;

        tracing::trace!(
            type_name = %type_name,
            field = field.name(),
            access = ?field.access(),
            "resolved identity field"
        );
        Ok(Self { type_name, field })
    }
}

impl<T> Identity<T> {
    /// Returns the resolved field.
    #[must_use]
    pub fn field(&self) -> &IdentityField<T> {
        &self.field
    }

    /// Reads the identity of `record`.
    #[inline]
    pub fn get(&self, record: &T) -> i64 {
        (self.field.get)(record)
    }

    /// Writes `id` into `record`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] if the field is read-only.
    pub fn assign(&self, record: &mut T, id: i64) -> CoreResult<()> {
        match self.field.access {
            IdentityAccess::Writable(set) | IdentityAccess::AssignMethod(set) => {
                set(record, id);
                Ok(())
            }
            IdentityAccess::ReadOnly => Err(CoreError::configuration(
                self.type_name.as_str(),
                format!(
                    "identity field `{}` is not writable and has no assignment method",
                    self.field.name()
                ),
            )),
        }
    }
}

impl<T> fmt::Debug for Identity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("type_name", &self.type_name)
            .field("field", &self.field)
            .finish()
    }
}

fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
