//! Property-based test generators using proptest.
//!
//! Provides strategies for generating keys, attribute values, items and
//! fixture entities that respect the store's rules (non-empty attribute
//! names, scalar key values).

use crate::models::PersonModel;
use dynamorm_codec::{AttributeValue, Item};
use dynamorm_core::Key;
use proptest::prelude::*;

/// Strategy for generating attribute names.
pub fn attribute_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][A-Za-z0-9]{0,7}").expect("Invalid regex")
}

/// Strategy for generating values usable in a key.
pub fn key_value_strategy() -> impl Strategy<Value = AttributeValue> {
    prop_oneof![
        prop::string::string_regex("[a-z0-9#]{1,12}")
            .expect("Invalid regex")
            .prop_map(AttributeValue::S),
        any::<i64>().prop_map(AttributeValue::from),
    ]
}

/// Strategy for generating keys with one to three attributes.
pub fn key_strategy() -> impl Strategy<Value = Key> {
    prop::collection::btree_map(attribute_name_strategy(), key_value_strategy(), 1..=3)
        .prop_map(Key::from)
}

/// Strategy for generating non-key attribute values.
pub fn attribute_value_strategy() -> impl Strategy<Value = AttributeValue> {
    prop_oneof![
        any::<String>().prop_map(AttributeValue::S),
        any::<i64>().prop_map(AttributeValue::from),
        any::<bool>().prop_map(AttributeValue::Bool),
        Just(AttributeValue::Null),
        prop::collection::vec(any::<i32>().prop_map(AttributeValue::from), 0..4)
            .prop_map(AttributeValue::L),
    ]
}

/// Strategy for generating items of up to `max_len` attributes.
pub fn item_strategy(max_len: usize) -> impl Strategy<Value = Item> {
    prop::collection::btree_map(attribute_name_strategy(), attribute_value_strategy(), 0..=max_len)
}

/// Strategy for generating usernames.
pub fn username_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9]{2,11}").expect("Invalid regex")
}

/// Strategy for generating people.
pub fn person_strategy() -> impl Strategy<Value = PersonModel> {
    (
        prop::string::string_regex("p#[0-9]{1,4}").expect("Invalid regex"),
        prop::string::string_regex("[a-z]{1,8}").expect("Invalid regex"),
        any::<String>(),
        any::<i64>(),
        prop::collection::vec("[a-z]{1,6}", 0..3),
    )
        .prop_map(|(pk, sk, name, age, hobbies)| {
            hobbies
                .iter()
                .fold(PersonModel::new(&pk, &sk, &name, age), |person, hobby| {
                    person.with_hobby(hobby)
                })
        })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
