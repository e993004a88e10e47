use std::{env, path::PathBuf, sync::Arc, time::Duration};

use rand::{Rng, distr::Alphanumeric};
use spotiplay::{
    management::{FileTokenStore, MemoryTokenStore, TokenStore},
    types::{TokenRecord, TokenResponse},
};

fn record(access_token: &str, expires_at: Option<i64>) -> TokenRecord {
    TokenRecord {
        access_token: access_token.to_string(),
        refresh_token: Some("refresh".to_string()),
        token_type: "Bearer".to_string(),
        scope: Some("streaming".to_string()),
        expires_at,
    }
}

fn temp_token_path() -> PathBuf {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    env::temp_dir()
        .join(format!("spotiplay-test-{suffix}"))
        .join("token.json")
}

async fn cleanup(path: &PathBuf) {
    if let Some(dir) = path.parent() {
        let _ = async_fs::remove_dir_all(dir).await;
    }
}

#[tokio::test]
async fn test_memory_store_notifies_subscribers() {
    let store = MemoryTokenStore::default();
    let mut rx = store.subscribe();
    assert!(store.current().is_none());

    store.save(&record("a", Some(100))).await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().as_ref().unwrap().access_token, "a");
    assert_eq!(store.current().unwrap().access_token, "a");

    store.clear().await.unwrap();
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_none());
    assert!(store.current().is_none());
}

#[tokio::test]
async fn test_file_store_persists_across_instances() {
    let path = temp_token_path();
    let saved = record("persisted", Some(1_700_003_600));

    let store = FileTokenStore::open(path.clone()).await.unwrap();
    assert!(store.current().is_none());
    store.save(&saved).await.unwrap();
    assert_eq!(store.path(), &path);

    let reopened = FileTokenStore::open(path.clone()).await.unwrap();
    assert_eq!(reopened.current(), Some(saved));

    reopened.clear().await.unwrap();
    assert!(reopened.current().is_none());
    assert!(!path.exists());

    // Clearing an already empty store is fine.
    reopened.clear().await.unwrap();

    cleanup(&path).await;
}

#[tokio::test]
async fn test_file_store_sync_picks_up_other_writers() {
    let path = temp_token_path();
    let ours = FileTokenStore::open(path.clone()).await.unwrap();
    let theirs = FileTokenStore::open(path.clone()).await.unwrap();
    let mut rx = ours.subscribe();

    theirs.save(&record("from-elsewhere", None)).await.unwrap();
    assert!(ours.current().is_none());

    assert!(ours.sync().await.unwrap());
    assert!(rx.has_changed().unwrap());
    assert_eq!(ours.current().unwrap().access_token, "from-elsewhere");

    // Nothing changed on disk since the last sync.
    rx.borrow_and_update();
    assert!(!ours.sync().await.unwrap());
    assert!(!rx.has_changed().unwrap());

    theirs.clear().await.unwrap();
    assert!(ours.sync().await.unwrap());
    assert!(ours.current().is_none());

    cleanup(&path).await;
}

#[tokio::test]
async fn test_file_store_watch_publishes_changes() {
    let path = temp_token_path();
    let ours = Arc::new(FileTokenStore::open(path.clone()).await.unwrap());
    let theirs = FileTokenStore::open(path.clone()).await.unwrap();
    let mut rx = ours.subscribe();
    let watcher = ours.watch(Duration::from_millis(20));

    theirs.save(&record("polled", None)).await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rx.borrow().as_ref().unwrap().access_token, "polled");

    watcher.abort();
    cleanup(&path).await;
}

#[tokio::test]
async fn test_file_store_rejects_corrupt_file() {
    let path = temp_token_path();
    async_fs::create_dir_all(path.parent().unwrap()).await.unwrap();
    async_fs::write(&path, "{ not json").await.unwrap();

    assert!(FileTokenStore::open(path.clone()).await.is_err());

    async_fs::write(&path, "").await.unwrap();
    let store = FileTokenStore::open(path.clone()).await.unwrap();
    assert!(store.current().is_none());

    cleanup(&path).await;
}

#[test]
fn test_record_staleness() {
    let now = 1_700_000_000;

    assert!(!record("t", Some(now + 1)).is_stale_at(now));
    assert!(record("t", Some(now)).is_stale_at(now));
    assert!(record("t", Some(now - 1)).is_stale_at(now));
    assert!(!record("t", None).is_stale_at(now));

    assert_eq!(record("t", Some(now + 90)).remaining_secs(now), Some(90));
    assert_eq!(record("t", None).remaining_secs(now), None);
}

#[test]
fn test_record_defaults_when_fields_are_missing() {
    let parsed: TokenRecord = serde_json::from_str(r#"{ "access_token": "abc" }"#).unwrap();

    assert_eq!(parsed.access_token, "abc");
    assert_eq!(parsed.token_type, "Bearer");
    assert_eq!(parsed.refresh_token, None);
    assert_eq!(parsed.scope, None);
    assert_eq!(parsed.expires_at, None);
}

#[test]
fn test_token_response_into_record() {
    let response: TokenResponse = serde_json::from_str(
        r#"{ "access_token": "abc", "token_type": "Bearer", "expires_in": 3600, "refresh_token": "r" }"#,
    )
    .unwrap();

    let record = response.into_record(1_000);

    assert_eq!(record.expires_at, Some(4_600));
    assert_eq!(record.refresh_token.as_deref(), Some("r"));
    assert_eq!(record.scope, None);
}
