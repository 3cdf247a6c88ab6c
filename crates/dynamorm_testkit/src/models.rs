//! Example entities used across the test suites.
//!
//! - [`PersonModel`]: a plain record with a composite key
//! - [`UserModel`]: a user whose username is mirrored into a separate
//!   [`UsernameModel`] record, written in the same transaction
//!
//! The username may be set once. After that, every save re-asserts that the
//! username record exists and still belongs to the user.

use dynamorm_codec::{from_item, Item};
use dynamorm_core::{
    classify_dependent, ConditionSlot, CoreError, CoreResult, DynEntity, Entity, HasRelated, Key,
};
use dynamorm_storage::Expression;
use serde::{Deserialize, Serialize};

/// Type discriminant of user records.
pub const USER_TYPE: &str = "User";

/// Type discriminant of username records.
pub const USERNAME_TYPE: &str = "Username";

/// Stored shape of a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Partition key.
    #[serde(rename = "PK")]
    pub pk: String,
    /// Sort key.
    #[serde(rename = "SK")]
    pub sk: String,
    /// Display name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Age in years.
    #[serde(rename = "Age")]
    pub age: i64,
    /// Hobbies, in order.
    #[serde(rename = "Hobbies", default)]
    pub hobbies: Vec<String>,
}

/// A person keyed by `PK` and `SK`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonModel {
    record: PersonRecord,
    guard: ConditionSlot,
}

impl PersonModel {
    /// Creates a person without hobbies.
    pub fn new(pk: &str, sk: &str, name: &str, age: i64) -> Self {
        Self::from_record(PersonRecord {
            pk: pk.to_string(),
            sk: sk.to_string(),
            name: name.to_string(),
            age,
            hobbies: Vec::new(),
        })
    }

    /// Wraps a stored record.
    pub fn from_record(record: PersonRecord) -> Self {
        Self {
            record,
            guard: ConditionSlot::new(),
        }
    }

    /// Adds a hobby.
    #[must_use]
    pub fn with_hobby(mut self, hobby: &str) -> Self {
        self.record.hobbies.push(hobby.to_string());
        self
    }

    /// Returns the stored shape.
    pub fn record(&self) -> &PersonRecord {
        &self.record
    }

    /// Sets the name.
    pub fn set_name(&mut self, name: &str) {
        self.record.name = name.to_string();
    }

    /// Sets the age.
    pub fn set_age(&mut self, age: i64) {
        self.record.age = age;
    }

    /// Replaces the key-derived guard for the next save.
    pub fn set_condition(&mut self, condition: impl Into<Expression>) {
        self.guard.set(condition);
    }
}

impl Entity for PersonModel {
    type Item = PersonRecord;

    fn item(&self) -> &PersonRecord {
        &self.record
    }

    fn key(&self) -> Key {
        Key::single("PK", self.record.pk.clone()).with("SK", self.record.sk.clone())
    }

    fn condition(&self) -> Option<Expression> {
        self.guard.get().cloned()
    }
}

/// Decodes person records.
pub fn person_modeler() -> impl Fn(&Item) -> CoreResult<PersonModel> + Send + Sync + 'static {
    |item: &Item| {
        let record: PersonRecord = from_item(item).map_err(CoreError::Decode)?;
        Ok(PersonModel::from_record(record))
    }
}

/// Stored shape of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// User id; the partition key.
    #[serde(rename = "PK")]
    pub id: String,
    /// Display name.
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unique username, once chosen.
    #[serde(rename = "Username", default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Type discriminant.
    #[serde(rename = "Type", default)]
    pub kind: String,
}

/// A user, remembering the username it was loaded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserModel {
    record: UserRecord,
    loaded_username: Option<String>,
}

impl UserModel {
    /// Creates a user that has never been stored.
    pub fn new(id: &str) -> Self {
        Self {
            record: UserRecord {
                id: id.to_string(),
                name: None,
                username: None,
                kind: USER_TYPE.to_string(),
            },
            loaded_username: None,
        }
    }

    /// Creates a never-stored user with a username.
    pub fn with_username(id: &str, username: &str) -> Self {
        let mut user = Self::new(id);
        user.set_username(username);
        user
    }

    /// Creates a never-stored user with every detail set.
    pub fn with_details(id: &str, name: &str, username: &str) -> Self {
        let mut user = Self::with_username(id, username);
        user.set_name(name);
        user
    }

    /// Returns the user id.
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// Returns the name.
    pub fn name(&self) -> Option<&str> {
        self.record.name.as_deref()
    }

    /// Returns the username about to be saved.
    pub fn username(&self) -> Option<&str> {
        self.record.username.as_deref()
    }

    /// Returns the username the user was loaded with.
    pub fn loaded_username(&self) -> Option<&str> {
        self.loaded_username.as_deref()
    }

    /// Sets the username.
    pub fn set_username(&mut self, username: &str) {
        self.record.username = Some(username.to_string());
    }

    /// Removes the username.
    pub fn clear_username(&mut self) {
        self.record.username = None;
    }

    /// Sets the name.
    pub fn set_name(&mut self, name: &str) {
        self.record.name = Some(name.to_string());
    }
}

impl Entity for UserModel {
    type Item = UserRecord;

    fn item(&self) -> &UserRecord {
        &self.record
    }

    fn key(&self) -> Key {
        Key::single("PK", self.record.id.clone())
    }

    fn relations(&self) -> Option<&dyn HasRelated> {
        Some(self)
    }
}

impl HasRelated for UserModel {
    fn related(&self) -> CoreResult<Vec<Box<dyn DynEntity + '_>>> {
        let state = classify_dependent(
            "Username",
            self.loaded_username.as_deref(),
            self.record.username.as_deref(),
        )?;
        let Some(username) = self.record.username.as_deref() else {
            return Ok(Vec::new());
        };

        let mut record = UsernameModel::new(username, &self.record.id);
        if let Some(guard) = state.guard(&record.key(), "UserId", self.record.id.as_str())? {
            record.set_condition(guard);
        }
        let related: Box<dyn DynEntity + '_> = Box::new(record);
        Ok(vec![related])
    }
}

/// Decodes user records, refusing anything that is not a user.
pub fn user_modeler() -> impl Fn(&Item) -> CoreResult<UserModel> + Send + Sync + 'static {
    |item: &Item| {
        let record: UserRecord = from_item(item).map_err(CoreError::Decode)?;
        if record.kind != USER_TYPE {
            return Err(CoreError::incompatible(USER_TYPE, record.kind));
        }
        Ok(UserModel {
            loaded_username: record.username.clone(),
            record,
        })
    }
}

/// Stored shape of a username reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernameRecord {
    /// The username; the partition key.
    #[serde(rename = "PK")]
    pub username: String,
    /// Type discriminant.
    #[serde(rename = "Type", default)]
    pub kind: String,
    /// Owning user id.
    #[serde(rename = "UserId")]
    pub user_id: String,
}

/// A username reservation pointing back at its user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameModel {
    record: UsernameRecord,
    guard: ConditionSlot,
}

impl UsernameModel {
    /// Creates a reservation of `username` for `user_id`.
    pub fn new(username: &str, user_id: &str) -> Self {
        Self {
            record: UsernameRecord {
                username: username.to_string(),
                kind: USERNAME_TYPE.to_string(),
                user_id: user_id.to_string(),
            },
            guard: ConditionSlot::new(),
        }
    }

    /// Returns the owning user id.
    pub fn user_id(&self) -> &str {
        &self.record.user_id
    }

    /// Seeds the guard for the next save.
    pub fn set_condition(&mut self, condition: impl Into<Expression>) {
        self.guard.set(condition);
    }
}

impl Entity for UsernameModel {
    type Item = UsernameRecord;

    fn item(&self) -> &UsernameRecord {
        &self.record
    }

    fn key(&self) -> Key {
        Key::single("PK", self.record.username.clone())
    }

    fn condition(&self) -> Option<Expression> {
        self.guard.get().cloned()
    }
}

/// Decodes username records.
pub fn username_modeler() -> impl Fn(&Item) -> CoreResult<UsernameModel> + Send + Sync + 'static {
    |item: &Item| {
        let record: UsernameRecord = from_item(item).map_err(CoreError::Decode)?;
        if record.kind != USERNAME_TYPE {
            return Err(CoreError::incompatible(USERNAME_TYPE, record.kind));
        }
        Ok(UsernameModel {
            record,
            guard: ConditionSlot::new(),
        })
    }
}
