//! # dynamorm Core
//!
//! Typed repositories over a key-value item store.
//!
//! This crate provides:
//! - [`Key`] and the existence guards derived from it
//! - the [`Entity`] contract, with optional related entities ([`HasRelated`])
//! - write planning: one guarded put per entity, root first
//! - write execution: a single conditional put, or one atomic transaction
//!   when related entities are involved
//! - the set-once rule for dependent values ([`classify_dependent`])
//! - [`Repository`], the `get` / `create` / `update` facade
//!
//! ## Example
//!
//! ```rust
//! use dynamorm_core::{Entity, Key, Repository};
//! use dynamorm_codec::from_item;
//! use dynamorm_storage::{Context, InMemoryStore};
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Person {
//!     #[serde(rename = "PK")]
//!     id: String,
//!     #[serde(rename = "Name")]
//!     name: String,
//! }
//!
//! impl Entity for Person {
//!     type Item = Self;
//!
//!     fn item(&self) -> &Self {
//!         self
//!     }
//!
//!     fn key(&self) -> Key {
//!         Key::single("PK", self.id.clone())
//!     }
//! }
//!
//! let store = Arc::new(InMemoryStore::new().with_table("people", &["PK"]));
//! let people = Repository::new(store, "people", |item: &dynamorm_codec::Item| {
//!     from_item::<Person>(item).map_err(dynamorm_core::CoreError::Decode)
//! });
//! let ctx = Context::background();
//!
//! let alice = Person { id: "001".into(), name: "Alice".into() };
//! people.create(&ctx, &alice).unwrap();
//!
//! let loaded = people.get(&ctx, &alice.key()).unwrap();
//! assert_eq!(loaded.name, "Alice");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod document;
mod entity;
mod error;
mod key;
mod put;
mod relation;
mod repository;
mod write;

pub use builder::RepositoryBuilder;
pub use config::RepositoryConfig;
pub use document::{document_modeler, Document};
pub use entity::{ConditionSlot, DynEntity, Entity, HasRelated};
pub use error::{CoreError, CoreResult};
pub use key::Key;
pub use put::assemble;
pub use relation::{classify_dependent, DependentState};
pub use repository::{Modeler, Repository};
pub use write::{execute_write, plan_write, WriteGroup, WriteIntent};
