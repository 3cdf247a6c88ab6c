//! Turning one entity into one put request.

use crate::entity::DynEntity;
use crate::error::CoreResult;
use dynamorm_storage::PutRequest;

/// Builds the put request for one entity.
///
/// The payload is encoded, the key attributes are overlaid (the key wins on
/// conflict), and the entity's own guard is attached if it has one. A
/// missing guard is left unset; choosing a default is the caller's job.
///
/// # Errors
///
/// Returns [`crate::CoreError::MissingKey`] or
/// [`crate::CoreError::InvalidKey`] for an unusable key, and
/// [`crate::CoreError::Serialization`] if the payload cannot be encoded.
pub fn assemble(table_name: &str, entity: &dyn DynEntity) -> CoreResult<PutRequest> {
    let key = entity.entity_key();
    key.validate()?;

    let mut item = entity.encode_item()?;
    item.extend(key.into_item());

    Ok(PutRequest {
        table_name: table_name.to_string(),
        item,
        condition: entity.entity_condition(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::error::CoreError;
    use crate::key::Key;
    use dynamorm_codec::AttributeValue;
    use dynamorm_storage::{Condition, Expression};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Profile {
        #[serde(rename = "PK")]
        pk: String,
        #[serde(rename = "Name")]
        name: String,
    }

    struct ProfileEntity {
        profile: Profile,
        key: Key,
        guard: Option<Expression>,
    }

    impl Entity for ProfileEntity {
        type Item = Profile;

        fn item(&self) -> &Profile {
            &self.profile
        }

        fn key(&self) -> Key {
            self.key.clone()
        }

        fn condition(&self) -> Option<Expression> {
            self.guard.clone()
        }
    }

    fn entity(pk_in_item: &str, key: Key) -> ProfileEntity {
        ProfileEntity {
            profile: Profile {
                pk: pk_in_item.into(),
                name: "Alice".into(),
            },
            key,
            guard: None,
        }
    }

    #[test]
    fn key_overlays_payload() {
        let e = entity("stale", Key::single("PK", "001").with("SK", "profile"));
        let put = assemble("people", &e).unwrap();

        assert_eq!(put.table_name, "people");
        assert_eq!(put.item.get("PK"), Some(&AttributeValue::from("001")));
        assert_eq!(put.item.get("SK"), Some(&AttributeValue::from("profile")));
        assert_eq!(put.item.get("Name"), Some(&AttributeValue::from("Alice")));
        assert!(put.condition.is_none());
    }

    #[test]
    fn entity_guard_is_attached() {
        let mut e = entity("001", Key::single("PK", "001"));
        e.guard = Some(Condition::equal("Name", "Alice").build());
        let put = assemble("people", &e).unwrap();
        assert_eq!(put.condition_expression(), Some("#0 = :0"));
    }

    #[test]
    fn empty_key_fails_before_encoding() {
        let e = entity("001", Key::new());
        assert_eq!(assemble("people", &e), Err(CoreError::MissingKey));
    }
}
