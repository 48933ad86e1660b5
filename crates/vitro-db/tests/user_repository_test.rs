//! Integration tests for the user repository using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use vitro_core::models::user::CreateUser;
use vitro_core::repository::{CreateUserOutcome, UserRepository};
use vitro_db::{SurrealUserRepository, verify_password};

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vitro_db::run_migrations(&db).await.unwrap();
    db
}

fn alice() -> CreateUser {
    CreateUser {
        username: "alice".into(),
        password: "correct-horse-battery".into(),
        is_admin: true,
    }
}

#[tokio::test]
async fn create_and_find_user() {
    let repo = SurrealUserRepository::new(setup().await);

    let user = match repo.create(alice()).await.unwrap() {
        CreateUserOutcome::Created(user) => user,
        other => panic!("expected Created, got {other:?}"),
    };

    assert_eq!(user.username, "alice");
    assert!(user.is_admin);

    // Password should be hashed, not stored in plaintext.
    assert_ne!(user.password_hash, "correct-horse-battery");
    assert!(user.password_hash.starts_with("$argon2id$"));

    let fetched = repo.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(fetched.username, "alice");
    assert_eq!(fetched.password_hash, user.password_hash);
    assert!(fetched.is_admin);
}

#[tokio::test]
async fn find_absent_user_is_none() {
    let repo = SurrealUserRepository::new(setup().await);
    assert!(repo.find_by_username("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn any_exists_flips_after_first_create() {
    let repo = SurrealUserRepository::new(setup().await);

    assert!(!repo.any_exists().await.unwrap());
    repo.create(alice()).await.unwrap();
    assert!(repo.any_exists().await.unwrap());
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let repo = SurrealUserRepository::new(setup().await);

    let CreateUserOutcome::Created(original) = repo.create(alice()).await.unwrap() else {
        panic!("first create should succeed");
    };

    let second = repo
        .create(CreateUser {
            username: "alice".into(),
            password: "another-password".into(),
            is_admin: false,
        })
        .await
        .unwrap();
    assert_eq!(second, CreateUserOutcome::DuplicateUsername);

    // The original record and its hash are unchanged.
    let stored = repo.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(stored.password_hash, original.password_hash);
    assert!(stored.is_admin);
}

#[tokio::test]
async fn empty_input_is_rejected_before_any_write() {
    let repo = SurrealUserRepository::new(setup().await);

    let outcome = repo
        .create(CreateUser {
            username: "".into(),
            password: "pw".into(),
            is_admin: false,
        })
        .await
        .unwrap();
    assert!(matches!(outcome, CreateUserOutcome::InvalidInput(_)));

    let outcome = repo
        .create(CreateUser {
            username: "bob".into(),
            password: "".into(),
            is_admin: false,
        })
        .await
        .unwrap();
    assert!(matches!(outcome, CreateUserOutcome::InvalidInput(_)));

    assert!(!repo.any_exists().await.unwrap());
}

#[tokio::test]
async fn stored_hash_round_trips_through_the_store() {
    let repo = SurrealUserRepository::new(setup().await);

    repo.create(alice()).await.unwrap();

    // What was written is what is read: verification must succeed on the
    // hash as fetched from storage.
    let stored = repo.find_by_username("alice").await.unwrap().unwrap();
    assert!(verify_password("correct-horse-battery", &stored.password_hash, None).unwrap());
    assert!(!verify_password("wrong", &stored.password_hash, None).unwrap());
}

#[tokio::test]
async fn pepper_changes_verification_input() {
    let db = setup().await;
    let pepper = "server-secret-pepper".to_string();
    let repo = SurrealUserRepository::with_pepper(db, pepper.clone());

    repo.create(alice()).await.unwrap();

    let stored = repo.find_by_username("alice").await.unwrap().unwrap();
    assert!(
        verify_password("correct-horse-battery", &stored.password_hash, Some(&pepper)).unwrap()
    );
    // Without pepper should fail.
    assert!(!verify_password("correct-horse-battery", &stored.password_hash, None).unwrap());
}
