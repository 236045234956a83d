use sea_orm::Database;

use engine::{Balance, DatabaseStore, EngineError, NewUser, UserChanges, UserStore};
use migration::MigratorTrait;

async fn store_with_db() -> DatabaseStore {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    DatabaseStore::new(db)
}

fn new_user(username: &str, balance_minor: i64) -> NewUser {
    NewUser {
        username: username.to_string(),
        password: "pw".to_string(),
        balance: Balance::try_from(balance_minor).unwrap(),
    }
}

#[tokio::test]
async fn create_and_lookup_roundtrip() {
    let store = store_with_db().await;

    let alice = store.create(new_user("alice", 1050)).await.unwrap();
    assert_eq!(alice.balance.to_string(), "10.50");

    let by_id = store.by_id(&alice.id).await.unwrap().unwrap();
    assert_eq!(by_id, alice);

    let by_name = store.by_username("alice").await.unwrap().unwrap();
    assert_eq!(by_name.id, alice.id);

    assert!(store.by_username("Alice").await.unwrap().is_none());
    assert!(store.by_id("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn unique_index_rejects_duplicate_username() {
    let store = store_with_db().await;
    store.create(new_user("alice", 0)).await.unwrap();

    let err = store.create(new_user("alice", 0)).await.unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alice".to_string()));
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_replaces_fields_and_guards_username() {
    let store = store_with_db().await;
    let alice = store.create(new_user("alice", 0)).await.unwrap();
    store.create(new_user("bob", 0)).await.unwrap();

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

    let err = store
        .update(
            &alice.id,
            UserChanges {
                username: "bob".to_string(),
                password: "p2".to_string(),
                balance: Balance::ZERO,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("bob".to_string()));

    let err = store
        .update(
            "missing",
            UserChanges {
                username: "carol".to_string(),
                password: "p".to_string(),
                balance: Balance::ZERO,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("missing".to_string()));
}
