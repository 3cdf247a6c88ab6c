//! Entity contracts.

use crate::error::{CoreError, CoreResult};
use crate::key::Key;
use dynamorm_codec::Item;
use dynamorm_storage::Expression;
use serde::Serialize;

/// A record that can be written through a repository.
///
/// `item()` is the serializable payload. It may or may not carry the key
/// attributes itself; the key is overlaid on the encoded payload before
/// writing, and wins on conflict.
///
/// # Guards
///
/// If `condition()` returns a guard, it is used verbatim for this entity's
/// write. Otherwise the repository derives one from the key: "does not
/// exist" for creates and "already exists" for updates.
///
/// # Related entities
///
/// An entity that must be written together with other records returns
/// itself from `relations()`. Related entities are written in the same
/// transaction, each with its own guard; their own relations are not
/// followed.
pub trait Entity {
    /// The serializable payload type.
    type Item: Serialize;

    /// Returns the payload to encode.
    fn item(&self) -> &Self::Item;

    /// Returns the primary key.
    fn key(&self) -> Key;

    /// Returns a guard that replaces the key-derived default.
    fn condition(&self) -> Option<Expression> {
        None
    }

    /// Returns the related-entity capability, if this entity has one.
    fn relations(&self) -> Option<&dyn HasRelated> {
        None
    }
}

/// Capability of entities whose writes must include other records.
pub trait HasRelated {
    /// Computes the related entities to write alongside the owner.
    ///
    /// # Errors
    ///
    /// Implementations fail when the owner's state forbids the write (for
    /// example a set-once value was changed). The whole write is abandoned
    /// before any store call.
    fn related(&self) -> CoreResult<Vec<Box<dyn DynEntity + '_>>>;
}

/// Object-safe view of an [`Entity`], used for related entities.
///
/// Implemented for every [`Entity`]; there is no need to implement it by
/// hand.
pub trait DynEntity {
    /// Returns the primary key.
    fn entity_key(&self) -> Key;

    /// Encodes the payload into an item.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if the payload cannot be encoded
    /// as a map.
    fn encode_item(&self) -> CoreResult<Item>;

    /// Returns the entity's own guard.
    fn entity_condition(&self) -> Option<Expression>;
}

impl<E: Entity> DynEntity for E {
    fn entity_key(&self) -> Key {
        self.key()
    }

    fn encode_item(&self) -> CoreResult<Item> {
        dynamorm_codec::to_item(self.item()).map_err(CoreError::Serialization)
    }

    fn entity_condition(&self) -> Option<Expression> {
        self.condition()
    }
}

/// Holder for a pre-seeded guard, meant to be embedded in entities.
///
/// Serializable entities should mark the field `#[serde(skip)]`.
///
/// ```
/// use dynamorm_core::ConditionSlot;
/// use dynamorm_storage::Condition;
///
/// let mut slot = ConditionSlot::new();
/// assert!(slot.get().is_none());
/// slot.set(Condition::attribute_not_exists("PK"));
/// assert_eq!(slot.get().unwrap().expression(), "attribute_not_exists (#0)");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionSlot {
    condition: Option<Expression>,
}

impl ConditionSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the guard, replacing any previous one.
    pub fn set(&mut self, condition: impl Into<Expression>) {
        self.condition = Some(condition.into());
    }

    /// Seeds the guard, builder style.
    #[must_use]
    pub fn with(mut self, condition: impl Into<Expression>) -> Self {
        self.set(condition);
        self
    }

    /// Returns the seeded guard.
    #[must_use]
    pub fn get(&self) -> Option<&Expression> {
        self.condition.as_ref()
    }

    /// Removes and returns the seeded guard.
    pub fn take(&mut self) -> Option<Expression> {
        self.condition.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynamorm_codec::AttributeValue;
    use dynamorm_storage::Condition;

    #[derive(Serialize)]
    struct Note {
        #[serde(rename = "Body")]
        body: String,
        #[serde(skip)]
        guard: ConditionSlot,
    }

    impl Entity for Note {
        type Item = Self;

        fn item(&self) -> &Self {
            self
        }

        fn key(&self) -> Key {
            Key::single("PK", "note")
        }

        fn condition(&self) -> Option<Expression> {
            self.guard.get().cloned()
        }
    }

    #[test]
    fn dyn_view_delegates() {
        let note = Note {
            body: "hi".into(),
            guard: ConditionSlot::new().with(Condition::attribute_exists("PK")),
        };
        let entity: &dyn DynEntity = &note;

        assert_eq!(entity.entity_key(), Key::single("PK", "note"));
        let item = entity.encode_item().unwrap();
        assert_eq!(item.get("Body"), Some(&AttributeValue::from("hi")));
        assert!(!item.contains_key("guard"));
        assert_eq!(
            entity.entity_condition().map(|e| e.expression().to_string()),
            Some("attribute_exists (#0)".to_string())
        );
        assert!(note.relations().is_none());
    }

    #[test]
    fn non_map_payload_fails_to_encode() {
        struct Scalar;
        impl Entity for Scalar {
            type Item = u32;
            fn item(&self) -> &u32 {
                &7
            }
            fn key(&self) -> Key {
                Key::single("PK", "x")
            }
        }

        assert!(matches!(
            Scalar.encode_item(),
            Err(CoreError::Serialization(_))
        ));
    }

    #[test]
    fn slot_take_clears() {
        let mut slot = ConditionSlot::new().with(Condition::attribute_exists("PK"));
        assert!(slot.take().is_some());
        assert!(slot.get().is_none());
    }
}
