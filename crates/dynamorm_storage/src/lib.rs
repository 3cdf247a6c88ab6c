//! # dynamorm Storage
//!
//! Item store contract, condition expressions and an in-memory store.
//!
//! This crate is the lowest layer that knows about requests. An item store
//! reads and writes whole items by primary key and evaluates condition
//! expressions; it knows nothing about entities or repositories.
//!
//! ## Design Principles
//!
//! - Stores are synchronous and must be `Send + Sync`
//! - Every call carries a caller [`Context`] that the store honours
//! - Conditions are built as a [`Condition`] tree and rendered once into an
//!   [`Expression`] with `#n`/`:n` placeholders
//! - Transactional writes are all-or-nothing
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and local tooling
//!
//! ## Example
//!
//! ```rust
//! use dynamorm_codec::{AttributeValue, Item};
//! use dynamorm_storage::{Condition, Context, InMemoryStore, ItemStore, PutRequest, StoreError};
//!
//! let store = InMemoryStore::new().with_table("users", &["PK"]);
//! let ctx = Context::background();
//!
//! let mut item = Item::new();
//! item.insert("PK".into(), AttributeValue::from("001"));
//! let put = PutRequest::new("users", item).with_condition(Condition::attribute_not_exists("PK"));
//!
//! store.put_item(&ctx, &put).unwrap();
//! assert!(matches!(
//!     store.put_item(&ctx, &put),
//!     Err(StoreError::ConditionFailed { .. })
//! ));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod context;
mod error;
mod expression;
mod memory;
mod request;

pub use backend::ItemStore;
pub use context::{CancelHandle, Context};
pub use error::{CancellationReason, StoreError, StoreResult};
pub use expression::{Comparator, Condition, Expression};
pub use memory::{InMemoryStore, StoreSnapshot, TableSnapshot, MAX_TRANSACTION_ITEMS};
pub use request::{GetRequest, PutRequest};
