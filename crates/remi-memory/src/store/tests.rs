use super::Store;
use chrono::{NaiveDate, NaiveDateTime};
use remi_core::traits::ReminderStore;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Create an in-memory store for testing.
async fn test_store() -> Store {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    Store::run_migrations(&pool).await.unwrap();
    Store { pool }
}

fn due(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap()
}

#[tokio::test]
async fn test_create_and_list() {
    let store = test_store().await;
    let id = store
        .create("U1", "Birthday party", due(2020, 9, 24, 15, 8))
        .await
        .unwrap();
    assert!(!id.is_empty());

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);
    assert_eq!(all[0].owner, "U1");
    assert_eq!(all[0].text, "Birthday party");
    assert_eq!(all[0].due_at, due(2020, 9, 24, 15, 8));
}

#[tokio::test]
async fn test_list_all_ordered_by_due_time() {
    let store = test_store().await;
    store
        .create("U1", "later", due(2030, 1, 2, 9, 0))
        .await
        .unwrap();
    store
        .create("U2", "sooner", due(2030, 1, 1, 9, 0))
        .await
        .unwrap();

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].text, "sooner");
    assert_eq!(all[1].text, "later");
}

#[tokio::test]
async fn test_list_for_owner_filters() {
    let store = test_store().await;
    store
        .create("U1", "mine", due(2030, 1, 1, 9, 0))
        .await
        .unwrap();
    store
        .create("U2", "theirs", due(2030, 1, 1, 9, 0))
        .await
        .unwrap();

    let mine = store.list_for_owner("U1").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].text, "mine");

    let nobody = store.list_for_owner("U3").await.unwrap();
    assert!(nobody.is_empty());
}

#[tokio::test]
async fn test_delete_if_present_claims_once() {
    let store = test_store().await;
    let id = store
        .create("U1", "once", due(2030, 1, 1, 9, 0))
        .await
        .unwrap();

    assert!(store.delete_if_present(&id).await.unwrap());
    // The claim is spent: a second deleter sees nothing.
    assert!(!store.delete_if_present(&id).await.unwrap());
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_unknown_id_is_false() {
    let store = test_store().await;
    assert!(!store.delete_if_present("no-such-id").await.unwrap());
}

#[tokio::test]
async fn test_created_at_is_set() {
    let store = test_store().await;
    store
        .create("U1", "x", due(2030, 1, 1, 9, 0))
        .await
        .unwrap();
    let all = store.list_all().await.unwrap();
    // Sanity: created_at parses and is recent-ish (same century).
    assert!(all[0].created_at.and_utc().timestamp() > 0);
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let store = test_store().await;
    Store::run_migrations(&store.pool).await.unwrap();
    Store::run_migrations(&store.pool).await.unwrap();
    let applied: Vec<(String,)> = sqlx::query_as("SELECT name FROM _migrations")
        .fetch_all(&store.pool)
        .await
        .unwrap();
    assert_eq!(applied.len(), 1);
}
