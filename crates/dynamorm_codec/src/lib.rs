//! # dynamorm codec
//!
//! Conversion between Rust records and the item store's attribute maps.
//!
//! Any `serde` record that serializes to a map can be turned into an
//! [`Item`] and back:
//! - [`to_item`] encodes a record into an attribute map
//! - [`from_item`] decodes an attribute map into a record
//! - [`AttributeValue`] is the dynamic value type the store understands
//!
//! ## Usage
//!
//! ```
//! use dynamorm_codec::{from_item, to_item, AttributeValue};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Person {
//!     #[serde(rename = "PK")]
//!     id: String,
//!     #[serde(rename = "Age")]
//!     age: u32,
//! }
//!
//! let person = Person { id: "ABC".into(), age: 30 };
//! let item = to_item(&person).unwrap();
//! assert_eq!(item.get("Age"), Some(&AttributeValue::N("30".into())));
//!
//! let decoded: Person = from_item(&item).unwrap();
//! assert_eq!(person, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod finite;
mod number;
mod value;

pub use decoder::{from_attribute_value, from_item};
pub use encoder::{to_attribute_value, to_item};
pub use error::{CodecError, CodecResult};
pub use number::normalize_number;
pub use value::{AttributeValue, Item};
