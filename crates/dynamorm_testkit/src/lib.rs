//! # dynamorm Testkit
//!
//! Test utilities for dynamorm.
//!
//! This crate provides:
//! - Example entities: a person, and a user with a set-once username
//! - Repository fixtures over an in-memory store
//! - A recording store wrapper with failure injection
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use dynamorm_testkit::prelude::*;
//!
//! let users = TestRepository::users();
//! users.create(&ctx(), &UserModel::with_username("002", "fherbert")).unwrap();
//!
//! let writes = users.store.writes();
//! assert_eq!(writes.len(), 1);
//! assert_eq!(writes[0].puts().len(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod models;
pub mod recording;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::models::*;
    pub use crate::recording::*;
}

pub use fixtures::*;
pub use generators::*;
pub use models::*;
pub use recording::*;
