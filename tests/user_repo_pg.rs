//! Runs against a live Postgres when TEST_DATABASE_URL is set, otherwise each test returns early.

use sqli_dao::db::error::DbError;
use sqli_dao::db::repo::{UserRepo, UserRepository};
use sqli_dao::{Db, NewUser, UserId};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

async fn repo() -> Option<UserRepository> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let db = Arc::new(Db::with_pool_size(&url, 4).expect("pool"));
    db.init().await.expect("migrations");
    Some(UserRepository::new(db))
}

fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    format!("{prefix}_{}_{nanos}", std::process::id())
}

#[tokio::test]
async fn get_by_id_returns_inserted_row() {
    let Some(repo) = repo().await else { return };

    let username = unique("byid");
    let new = NewUser::new("Grace", "Hopper", &username, "cobol")
        .unwrap()
        .with_middle_name("Brewster")
        .with_admin(true);
    let inserted = repo.insert(&new).await.unwrap();

    let found = repo.get_by_id(inserted.id).await.unwrap().unwrap();
    assert_eq!(found, inserted);
    assert_eq!(found.first_name, "Grace");
    assert_eq!(found.middle_name.as_deref(), Some("Brewster"));
    assert_eq!(found.last_name, "Hopper");
    assert_eq!(found.username, username);
    assert_eq!(found.pwd_hash, new.pwd_hash);
    assert!(found.is_admin);
}

#[tokio::test]
async fn get_by_id_missing_is_none() {
    let Some(repo) = repo().await else { return };

    assert!(repo.get_by_id(UserId(-1)).await.unwrap().is_none());
}

#[tokio::test]
async fn get_by_username_is_case_sensitive() {
    let Some(repo) = repo().await else { return };

    let username = unique("Case");
    repo.insert(&NewUser::new("Alan", "Turing", &username, "enigma").unwrap())
        .await
        .unwrap();

    let found = repo.get_by_username(&username).await.unwrap().unwrap();
    assert_eq!(found.username, username);
    assert!(found.middle_name.is_none());
    assert!(!found.is_admin);

    assert!(repo.get_by_username(&username.to_lowercase()).await.unwrap().is_none());
    assert!(repo.get_by_username(&unique("absent")).await.unwrap().is_none());
}

#[tokio::test]
async fn username_is_bound_not_interpolated() {
    let Some(repo) = repo().await else { return };

    let hostile = "x' OR '1'='1";
    assert!(repo.get_by_username(hostile).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_unique_violation() {
    let Some(repo) = repo().await else { return };

    let username = unique("dup");
    let new = NewUser::new("Edsger", "Dijkstra", &username, "goto").unwrap();
    repo.insert(&new).await.unwrap();

    assert!(matches!(repo.insert(&new).await, Err(DbError::UniqueViolation(_))));
}

#[tokio::test]
async fn stored_hash_round_trips() {
    let Some(repo) = repo().await else { return };

    let username = unique("pw");
    repo.insert(&NewUser::new("Barbara", "Liskov", &username, "substitution").unwrap())
        .await
        .unwrap();

    let user = repo.get_by_username(&username).await.unwrap().unwrap();
    assert!(user.check_password("substitution"));
    assert!(!user.check_password("Substitution"));
    assert!(!user.check_password(""));
}
