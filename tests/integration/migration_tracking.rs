use crate::helpers::project::{TestProject, snapshot};
use anyhow::Result;
use smooth_migrate::config::{HistoryBackend, HistoryConfig};
use smooth_migrate::migration_tracking::{
    History, HistoryRecord, HistoryStore, previous_snapshot,
};
use std::fs;

fn record(identity: &str, table: &str, columns: &[(&str, &str)], batch: i64) -> HistoryRecord {
    HistoryRecord::new(
        identity,
        snapshot(table, columns).to_json().unwrap(),
        Some(format!("database/migrations/{}_{}.php", table, batch)),
        batch,
    )
}

#[tokio::test]
async fn test_file_history_round_trip() -> Result<()> {
    let project = TestProject::new();
    let store = project.history();
    store.ensure_repository().await?;
    assert!(store.path().exists());

    let first = store
        .record_migration(record("PostsSchema", "posts", &[("id", "increments")], 1))
        .await?;
    let second = store
        .record_migration(record("UsersSchema", "users", &[("id", "increments")], 1))
        .await?;
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);

    assert_eq!(store.last_batch_number("PostsSchema").await?, 1);
    assert_eq!(store.last_batch_number("CommentsSchema").await?, 0);

    let found = store.find_by_batch("UsersSchema", 1).await?.unwrap();
    assert_eq!(found, second);
    assert_eq!(found.snapshot()?.table, "users");
    Ok(())
}

#[tokio::test]
async fn test_recording_same_batch_replaces_record() -> Result<()> {
    let project = TestProject::new();
    let store = project.history();

    store
        .record_migration(record("PostsSchema", "posts", &[("id", "increments")], 1))
        .await?;
    store
        .record_migration(record(
            "PostsSchema",
            "posts",
            &[("id", "increments"), ("title", "string")],
            1,
        ))
        .await?;

    let records = store.list(Some("PostsSchema")).await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 1);
    assert_eq!(records[0].snapshot()?.spec("title"), Some("string"));
    Ok(())
}

#[tokio::test]
async fn test_previous_snapshot_walks_back_over_unreadable_records() -> Result<()> {
    let project = TestProject::new();
    let store = project.history();

    store
        .record_migration(record("PostsSchema", "posts", &[("id", "increments")], 1))
        .await?;
    store
        .record_migration(HistoryRecord::new("PostsSchema", "not json", None, 3))
        .await?;

    let snapshot = previous_snapshot(&store, "PostsSchema", 3).await?.unwrap();
    assert_eq!(snapshot.table, "posts");

    assert!(previous_snapshot(&store, "PostsSchema", 0).await?.is_none());
    assert!(previous_snapshot(&store, "UsersSchema", 3).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_open_file_backend_relative_to_root() -> Result<()> {
    let project = TestProject::new();
    let config = HistoryConfig {
        backend: HistoryBackend::File,
        file: "state/history.json".to_string(),
        ..project.config.history.clone()
    };

    let history = History::open(&config, project.root()).await?;
    history.ensure_repository().await?;

    let path = project.root().join("state/history.json");
    assert_eq!(fs::read_to_string(path)?.trim(), "[]");
    assert!(history.describe().contains("state/history.json"));
    Ok(())
}

#[tokio::test]
async fn test_postgres_backend_requires_url() -> Result<()> {
    let project = TestProject::new();
    let config = HistoryConfig {
        backend: HistoryBackend::Postgres,
        database_url: None,
        ..project.config.history.clone()
    };

    let err = History::open(&config, project.root()).await.err().unwrap();
    assert!(err.to_string().contains("database URL"));
    Ok(())
}
