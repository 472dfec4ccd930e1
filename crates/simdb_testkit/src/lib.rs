//! # SimDB Testkit
//!
//! Test utilities for SimDB.
//!
//! This crate provides:
//! - Sample record types covering each identity style
//! - Temporary-directory store fixtures for archive and plain-file mode
//! - Hand-written document builders for load-path tests
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use simdb_testkit::prelude::*;
//!
//! let mut fixture = TestStore::<Contact>::archive();
//! let contact = fixture.store.insert(Contact::named("Ada")).unwrap();
//! assert_eq!(contact.id, 1);
//!
//! let reopened = fixture.reopen();
//! assert_eq!(reopened.total_change(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod documents;
pub mod fixtures;
pub mod generators;
pub mod records;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::documents::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::records::*;
}

pub use documents::*;
pub use fixtures::*;
pub use generators::*;
pub use records::*;
