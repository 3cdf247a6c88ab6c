//! Saving users together with their username reservations.

use dynamorm_codec::AttributeValue;
use dynamorm_core::{CoreError, Key, Repository, RepositoryConfig, WriteIntent};
use dynamorm_storage::{CancellationReason, PutRequest, StoreError};
use dynamorm_testkit::prelude::*;
use std::sync::Arc;

fn transaction(call: &StoreCall) -> &[PutRequest] {
    match call {
        StoreCall::Transact(puts) => puts,
        other => panic!("expected a transaction, found {other:?}"),
    }
}

fn load(users: &TestRepository<UserModel>, id: &str) -> UserModel {
    users.get(&ctx(), &Key::single("PK", id)).unwrap()
}

#[test]
fn create_writes_user_and_username_atomically() {
    let users = TestRepository::users();
    users
        .create(&ctx(), &UserModel::with_username("002", "fherbert"))
        .unwrap();

    let writes = users.store.writes();
    assert_eq!(writes.len(), 1);
    let puts = transaction(&writes[0]);
    assert_eq!(puts.len(), 2);

    let root = &puts[0];
    assert_eq!(
        root.item,
        item(&[("PK", "002"), ("Username", "fherbert"), ("Type", "User")])
    );
    assert_eq!(root.condition_expression(), Some("attribute_not_exists (#0)"));

    let username = &puts[1];
    assert_eq!(
        username.item,
        item(&[("PK", "fherbert"), ("UserId", "002"), ("Type", "Username")])
    );
    assert_eq!(
        username.condition_expression(),
        Some("attribute_not_exists (#0)")
    );
    assert_eq!(
        username.condition.as_ref().unwrap().names().get("#0").map(String::as_str),
        Some("PK")
    );

    assert_eq!(users.item_count(), 2);
    assert!(users.stored(&[("PK", "fherbert"), ("UserId", "002")]).is_some());
}

#[test]
fn user_without_username_is_a_single_put() {
    let users = TestRepository::users();
    let mut user = UserModel::new("001");
    user.set_name("John Appleseed");
    users.create(&ctx(), &user).unwrap();

    let writes = users.store.writes();
    assert!(matches!(writes.as_slice(), [StoreCall::Put(_)]));
    assert_eq!(users.item_count(), 1);
}

#[test]
fn setting_a_username_later_reserves_it() {
    let users = TestRepository::users();
    users.seed(item(&[("PK", "001"), ("Type", "User")]));

    let mut user = load(&users, "001");
    assert_eq!(user.loaded_username(), None);
    user.set_username("jappleseed");
    users.update(&ctx(), &user).unwrap();

    let writes = users.store.writes();
    let puts = transaction(&writes[0]);
    assert_eq!(puts[0].condition_expression(), Some("attribute_exists (#0)"));
    assert_eq!(puts[1].condition_expression(), Some("attribute_not_exists (#0)"));
    assert!(users
        .stored(&[("PK", "jappleseed"), ("UserId", "001"), ("Type", "Username")])
        .is_some());
}

#[test]
fn changing_a_set_username_is_refused_locally() {
    let users = TestRepository::users();
    users
        .create(&ctx(), &UserModel::with_username("001", "jappleseed"))
        .unwrap();
    users.store.clear();

    let mut user = load(&users, "001");
    user.set_username("other");
    let err = users.update(&ctx(), &user).unwrap_err();
    assert_eq!(
        err,
        CoreError::ImmutableFieldChanged {
            field: "Username".into(),
            stored: "\"jappleseed\"".into(),
            attempted: "\"other\"".into(),
        }
    );
    assert!(users.store.writes().is_empty());
    assert!(users.stored(&[("PK", "other")]).is_none());
}

#[test]
fn clearing_a_set_username_is_refused_locally() {
    let users = TestRepository::users();
    users
        .create(&ctx(), &UserModel::with_username("001", "jappleseed"))
        .unwrap();
    users.store.clear();

    let mut user = load(&users, "001");
    user.clear_username();
    assert_eq!(
        users.update(&ctx(), &user).unwrap_err(),
        CoreError::ImmutableFieldChanged {
            field: "Username".into(),
            stored: "\"jappleseed\"".into(),
            attempted: "nothing".into(),
        }
    );
    assert!(users.store.writes().is_empty());
    assert_eq!(load(&users, "001").username(), Some("jappleseed"));
    assert!(users
        .stored(&[("PK", "jappleseed"), ("UserId", "001")])
        .is_some());
}

#[test]
fn unchanged_username_is_reasserted() {
    let users = TestRepository::users();
    users
        .create(&ctx(), &UserModel::with_username("001", "jappleseed"))
        .unwrap();
    users.store.clear();

    let mut user = load(&users, "001");
    user.set_name("John Appleseed");
    users.update(&ctx(), &user).unwrap();

    let writes = users.store.writes();
    let puts = transaction(&writes[0]);
    let guard = puts[1].condition.as_ref().unwrap();
    assert_eq!(guard.expression(), "(attribute_exists (#0)) AND (#1 = :0)");
    assert_eq!(guard.names().get("#1").map(String::as_str), Some("UserId"));
    assert_eq!(guard.values().get(":0"), Some(&AttributeValue::from("001")));

    assert_eq!(load(&users, "001").name(), Some("John Appleseed"));
}

#[test]
fn taken_username_rejects_the_whole_group() {
    let users = TestRepository::users();
    users
        .create(&ctx(), &UserModel::with_username("001", "jappleseed"))
        .unwrap();

    let err = users
        .create(&ctx(), &UserModel::with_username("003", "jappleseed"))
        .unwrap_err();
    assert_eq!(err, CoreError::ConditionFailed { index: Some(1) });
    assert!(users.stored(&[("PK", "003")]).is_none());
    assert!(users
        .stored(&[("PK", "jappleseed"), ("UserId", "001")])
        .is_some());
}

#[test]
fn reservation_owned_by_someone_else_fails() {
    let users = TestRepository::users();
    users.seed(item(&[("PK", "001"), ("Type", "User"), ("Username", "jappleseed")]));
    users.seed(item(&[("PK", "jappleseed"), ("Type", "Username"), ("UserId", "999")]));

    let mut user = load(&users, "001");
    user.set_name("John");
    let err = users.update(&ctx(), &user).unwrap_err();
    assert_eq!(err, CoreError::ConditionFailed { index: Some(1) });
    assert_eq!(load(&users, "001").name(), None);
}

#[test]
fn saving_again_without_reload_fails_until_reloaded() {
    let users = TestRepository::users();
    let mut user = UserModel::with_username("002", "fherbert");
    users.create(&ctx(), &user).unwrap();

    // The instance still believes the username was never stored.
    user.set_name("Frank Herbert");
    let err = users.update(&ctx(), &user).unwrap_err();
    assert_eq!(err, CoreError::ConditionFailed { index: Some(1) });

    let mut reloaded = load(&users, "002");
    reloaded.set_name("Frank Herbert");
    users.update(&ctx(), &reloaded).unwrap();
    assert_eq!(load(&users, "002").name(), Some("Frank Herbert"));
}

#[test]
fn conflicting_transaction_is_aborted() {
    let users = TestRepository::users();
    users.store.fail_next(StoreError::TransactionCanceled {
        reasons: vec![
            CancellationReason::None,
            CancellationReason::TransactionConflict,
        ],
    });

    let err = users
        .create(&ctx(), &UserModel::with_username("002", "fherbert"))
        .unwrap_err();
    assert!(matches!(err, CoreError::Aborted { .. }));
    assert!(!err.is_condition_failed());
    assert_eq!(users.item_count(), 0);
}

#[test]
fn oversized_group_is_refused_before_any_call() {
    let store = Arc::new(RecordingStore::new(
        dynamorm_storage::InMemoryStore::new().with_table(USERS_TABLE, &["PK"]),
    ));
    let repo = Repository::<UserModel, TestStore>::with_config(
        Arc::clone(&store),
        RepositoryConfig::new(USERS_TABLE).max_transaction_items(1),
        Arc::new(user_modeler()),
    )
    .unwrap();

    let err = repo
        .create(&ctx(), &UserModel::with_username("002", "fherbert"))
        .unwrap_err();
    assert_eq!(err, CoreError::WriteGroupTooLarge { size: 2, limit: 1 });
    assert_eq!(store.call_count(), 0);

    repo.create(&ctx(), &UserModel::new("001")).unwrap();
    assert_eq!(store.inner().item_count(USERS_TABLE), 1);
}

#[test]
fn plan_matches_what_is_sent() {
    let users = TestRepository::users();
    let user = UserModel::with_username("002", "fherbert");
    let group = users.plan(&user, WriteIntent::Create).unwrap();
    assert!(group.is_transactional());
    assert_eq!(group.related().len(), 1);

    users.create(&ctx(), &user).unwrap();
    assert_eq!(users.store.writes()[0].puts(), group.requests());
}
