//! Account storage.
//!
//! [`UserStore`] is the single storage seam of the engine: one in-memory
//! implementation for tests and ephemeral deployments, one sea-orm backed
//! implementation for persistent ones. Username uniqueness is enforced by
//! the store itself, not by callers: [`MemoryStore`] checks and inserts
//! under one write lock, [`DatabaseStore`] relies on the unique index on
//! `users.username`.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    SqlErr,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{Balance, EngineError, ResultEngine, users};

/// One account record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    pub balance: Balance,
}

/// Fields required to create an account. The id is generated by the store.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub balance: Balance,
}

/// Full replacement of the mutable account fields.
#[derive(Clone, Debug)]
pub struct UserChanges {
    pub username: String,
    pub password: String,
    pub balance: Balance,
}

impl TryFrom<users::Model> for User {
    type Error = EngineError;

    fn try_from(model: users::Model) -> Result<Self, Self::Error> {
        Ok(User {
            balance: Balance::try_from(model.balance_minor)?,
            id: model.id,
            username: model.username,
            password: model.password,
        })
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new account, failing with [`EngineError::ExistingKey`] when
    /// the username is already taken. The check and the insert are atomic.
    async fn create(&self, new: NewUser) -> ResultEngine<User>;

    async fn by_id(&self, id: &str) -> ResultEngine<Option<User>>;

    /// Exact, case-sensitive username lookup.
    async fn by_username(&self, username: &str) -> ResultEngine<Option<User>>;

    async fn list(&self) -> ResultEngine<Vec<User>>;

    /// Replaces username, password and balance of an existing account.
    ///
    /// Fails with [`EngineError::KeyNotFound`] for an unknown id and with
    /// [`EngineError::ExistingKey`] when the new username belongs to a
    /// different account.
    async fn update(&self, id: &str, changes: UserChanges) -> ResultEngine<User>;
}

/// Account store backed by a process-local map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, new: NewUser) -> ResultEngine<User> {
        let mut users = self.users.write().await;
        if users.values().any(|user| user.username == new.username) {
            return Err(EngineError::ExistingKey(new.username));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: new.username,
            password: new.password,
            balance: new.balance,
        };
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn by_id(&self, id: &str) -> ResultEngine<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn by_username(&self, username: &str) -> ResultEngine<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn list(&self) -> ResultEngine<Vec<User>> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn update(&self, id: &str, changes: UserChanges) -> ResultEngine<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(id) {
            return Err(EngineError::KeyNotFound(id.to_string()));
        }
        if users
            .values()
            .any(|user| user.username == changes.username && user.id != id)
        {
            return Err(EngineError::ExistingKey(changes.username));
        }

        let user = users
            .get_mut(id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        user.username = changes.username;
        user.password = changes.password;
        user.balance = changes.balance;
        Ok(user.clone())
    }
}

/// Account store backed by a sea-orm connection.
#[derive(Clone, Debug)]
pub struct DatabaseStore {
    db: DatabaseConnection,
}

impl DatabaseStore {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for DatabaseStore {
    async fn create(&self, new: NewUser) -> ResultEngine<User> {
        let model = users::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            username: ActiveValue::Set(new.username.clone()),
            password: ActiveValue::Set(new.password),
            balance_minor: ActiveValue::Set(new.balance.minor()),
        };

        match model.insert(&self.db).await {
            Ok(inserted) => inserted.try_into(),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(EngineError::ExistingKey(new.username))
                }
                _ => Err(EngineError::Database(err)),
            },
        }
    }

    async fn by_id(&self, id: &str) -> ResultEngine<Option<User>> {
        users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn by_username(&self, username: &str) -> ResultEngine<Option<User>> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn list(&self) -> ResultEngine<Vec<User>> {
        users::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn update(&self, id: &str, changes: UserChanges) -> ResultEngine<User> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;

        let mut model: users::ActiveModel = model.into();
        model.username = ActiveValue::Set(changes.username.clone());
        model.password = ActiveValue::Set(changes.password);
        model.balance_minor = ActiveValue::Set(changes.balance.minor());

        match model.update(&self.db).await {
            Ok(updated) => updated.try_into(),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(EngineError::ExistingKey(changes.username))
                }
                _ => Err(EngineError::Database(err)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: "pw".to_string(),
            balance: Balance::ZERO,
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_rejects_duplicates() {
        let store = MemoryStore::new();

        let alice = store.create(new_user("alice")).await.unwrap();
        assert!(!alice.id.is_empty());

        let err = store.create(new_user("alice")).await.unwrap_err();
        assert_eq!(err, EngineError::ExistingKey("alice".to_string()));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn username_lookup_is_case_sensitive() {
        let store = MemoryStore::new();
        store.create(new_user("alice")).await.unwrap();

        assert!(store.by_username("alice").await.unwrap().is_some());
        assert!(store.by_username("Alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_replaces_all_fields() {
        let store = MemoryStore::new();
        let alice = store.create(new_user("alice")).await.unwrap();

        let updated = store
            .update(
                &alice.id,
                UserChanges {
                    username: "alice2".to_string(),
                    password: "p2".to_string(),
                    balance: Balance::try_from(4250i64).unwrap(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.username, "alice2");
        assert_eq!(updated.balance.to_string(), "42.50");
        assert!(store.by_username("alice").await.unwrap().is_none());
        assert!(store.by_username("alice2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_rejects_unknown_id_and_taken_username() {
        let store = MemoryStore::new();
        let alice = store.create(new_user("alice")).await.unwrap();
        store.create(new_user("bob")).await.unwrap();

        let changes = UserChanges {
            username: "bob".to_string(),
            password: "pw".to_string(),
            balance: Balance::ZERO,
        };
        let err = store.update(&alice.id, changes.clone()).await.unwrap_err();
        assert_eq!(err, EngineError::ExistingKey("bob".to_string()));

        let err = store.update("missing", changes).await.unwrap_err();
        assert_eq!(err, EngineError::KeyNotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn update_may_keep_own_username() {
        let store = MemoryStore::new();
        let alice = store.create(new_user("alice")).await.unwrap();

        let updated = store
            .update(
                &alice.id,
                UserChanges {
                    username: "alice".to_string(),
                    password: "new-pw".to_string(),
                    balance: Balance::ZERO,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.password, "new-pw");
    }

    #[tokio::test]
    async fn concurrent_registrations_cannot_both_win() {
        let store = std::sync::Arc::new(MemoryStore::new());

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let store = store.clone();
            tasks.spawn(async move { store.create(new_user("alice")).await });
        }

        let mut created = 0;
        while let Some(result) = tasks.join_next().await {
            if result.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
