//! Integration tests for the brew history on disk.
//!
//! These tests run a `BrewHistoryStore` over a `FileStore` in a temporary
//! directory:
//! - Adding sessions and reading them back after a restart
//! - Deleting and clearing
//! - Recovering from corrupt files
//! - Change notifications

use chrono::{DateTime, Utc};
use tempfile::TempDir;

use brewbro::history::{BrewHistoryStore, HISTORY_STORAGE_KEY};
use brewbro::storage::{FileStore, KeyValueStore};
use brewbro::types::{SessionDraft, TemperatureRange};

// ============================================================================
// Test Helpers
// ============================================================================

fn create_store() -> (TempDir, BrewHistoryStore<FileStore>) {
    let dir = tempfile::tempdir().unwrap();
    let store = BrewHistoryStore::new(FileStore::new(dir.path()));
    (dir, store)
}

async fn reopen(dir: &TempDir) -> BrewHistoryStore<FileStore> {
    BrewHistoryStore::open(FileStore::new(dir.path()))
        .await
        .unwrap()
}

fn yirgacheffe() -> SessionDraft {
    SessionDraft::new("Yirgacheffe", 150)
        .with_roast_level("Light")
        .with_temperature(TemperatureRange::new("92", "198"))
}

fn history_file(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join(format!("{}.json", HISTORY_STORAGE_KEY))
}

// ============================================================================
// Add Tests
// ============================================================================

#[tokio::test]
async fn test_add_first_session() {
    let (_dir, mut store) = create_store();
    store.load().await.unwrap();
    assert!(store.is_empty());

    let session = store.add_session(yirgacheffe()).await.unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(session.brew_time, 150);
    assert_eq!(session.roast_level, "Light");
    assert!(!session.id.is_empty());
    let created: DateTime<Utc> = session.created_at.to_rfc3339().parse().unwrap();
    assert_eq!(created, session.created_at);
}

#[tokio::test]
async fn test_newest_first_with_distinct_ids() {
    let (_dir, mut store) = create_store();

    let first = store.add_session(yirgacheffe()).await.unwrap();
    let second = store
        .add_session(SessionDraft::new("Kenya AA", 120))
        .await
        .unwrap();

    let ids: Vec<&str> = store.sessions().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_round_trip_through_disk() {
    let (dir, mut store) = create_store();
    store.add_session(yirgacheffe()).await.unwrap();
    store
        .add_session(
            SessionDraft::new("Sumatra Mandheling", 180)
                .with_roast_level("Dark")
                .with_equipment(Some("French press".to_string()))
                .with_taste_notes(Some("Earthy".to_string())),
        )
        .await
        .unwrap();

    let reloaded = reopen(&dir).await;
    assert_eq!(reloaded.sessions(), store.sessions());

    store.refresh().await.unwrap();
    assert_eq!(reloaded.sessions(), store.sessions());
}

#[tokio::test]
async fn test_persisted_format_is_camel_case_array() {
    let (dir, mut store) = create_store();
    store.add_session(yirgacheffe()).await.unwrap();

    let raw = std::fs::read_to_string(history_file(&dir)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &value.as_array().unwrap()[0];
    assert_eq!(entry["beanName"], "Yirgacheffe");
    assert_eq!(entry["brewTime"], 150);
    assert_eq!(entry["temperature"]["celsius"], "92");
    assert!(entry.get("createdAt").is_some());
    assert!(entry.get("equipment").is_none());
}

// ============================================================================
// Delete / Clear Tests
// ============================================================================

#[tokio::test]
async fn test_delete_session() {
    let (dir, mut store) = create_store();
    let first = store.add_session(yirgacheffe()).await.unwrap();
    let second = store
        .add_session(SessionDraft::new("Kenya AA", 120))
        .await
        .unwrap();

    assert!(store.delete_session(&first.id).await.unwrap());
    assert!(!store.delete_session("no-such-id").await.unwrap());

    let reloaded = reopen(&dir).await;
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.sessions()[0].id, second.id);
}

#[tokio::test]
async fn test_clear_then_refresh_is_empty() {
    let (dir, mut store) = create_store();
    store.add_session(yirgacheffe()).await.unwrap();

    store.clear_history().await.unwrap();
    assert!(store.is_empty());
    assert!(!history_file(&dir).exists());

    store.refresh().await.unwrap();
    assert!(store.is_empty());

    // Clearing twice is fine
    store.clear_history().await.unwrap();
}

// ============================================================================
// Recovery Tests
// ============================================================================

#[tokio::test]
async fn test_corrupt_file_loads_empty() {
    let (dir, _store) = create_store();
    let storage = FileStore::new(dir.path());
    storage
        .set(HISTORY_STORAGE_KEY, "{not json at all")
        .await
        .unwrap();

    let mut store = reopen(&dir).await;
    assert!(store.is_empty());
    assert!(store.last_error().is_none());

    // The next write replaces the corrupt file
    store.add_session(yirgacheffe()).await.unwrap();
    assert_eq!(reopen(&dir).await.len(), 1);
}

#[tokio::test]
async fn test_bad_entries_are_skipped() {
    let (dir, mut store) = create_store();
    let kept = store.add_session(yirgacheffe()).await.unwrap();

    let raw = std::fs::read_to_string(history_file(&dir)).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value
        .as_array_mut()
        .unwrap()
        .push(serde_json::json!({"beanName": 42}));
    std::fs::write(history_file(&dir), value.to_string()).unwrap();

    let reloaded = reopen(&dir).await;
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.sessions()[0].id, kept.id);
}

// ============================================================================
// Subscription Tests
// ============================================================================

#[tokio::test]
async fn test_subscribers_see_changes() {
    let (_dir, mut store) = create_store();
    let mut rx = store.subscribe();

    store.add_session(yirgacheffe()).await.unwrap();
    assert!(rx.has_changed().unwrap());
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.sessions.len(), 1);
    assert!(!snapshot.is_loading);
    assert!(snapshot.error.is_none());

    store.clear_history().await.unwrap();
    assert!(rx.borrow_and_update().sessions.is_empty());
}
