use std::{path::PathBuf, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{sync::watch, task::JoinHandle};

use crate::{error::StoreError, types::TokenRecord};

/// Persistent holder of the single token record.
///
/// Every write is published on a `watch` channel so consumers, including
/// other processes' changes picked up by the store itself, are notified
/// without talking to the provider.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// The last known record, without touching the backing storage.
    fn current(&self) -> Option<TokenRecord>;

    fn subscribe(&self) -> watch::Receiver<Option<TokenRecord>>;

    async fn save(&self, record: &TokenRecord) -> Result<(), StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}

/// In-memory store; state lives as long as the process.
#[derive(Debug)]
pub struct MemoryTokenStore {
    tx: watch::Sender<Option<TokenRecord>>,
}

impl MemoryTokenStore {
    pub fn new(initial: Option<TokenRecord>) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    fn current(&self) -> Option<TokenRecord> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<TokenRecord>> {
        self.tx.subscribe()
    }

    async fn save(&self, record: &TokenRecord) -> Result<(), StoreError> {
        self.tx.send_replace(Some(record.clone()));
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.tx.send_replace(None);
        Ok(())
    }
}

/// JSON file store shared by every spotiplay process of the user.
///
/// There is no locking between processes: the last writer wins.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    tx: watch::Sender<Option<TokenRecord>>,
}

impl FileTokenStore {
    /// Opens the store, reading the record if the file exists.
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        let initial = read_record(&path).await?;
        let (tx, _) = watch::channel(initial);
        Ok(Self { path, tx })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Re-reads the file and publishes the record if it differs from the
    /// last known one. Returns whether a change was published.
    pub async fn sync(&self) -> Result<bool, StoreError> {
        let on_disk = read_record(&self.path).await?;
        let changed = self.tx.send_if_modified(|current| {
            if *current == on_disk {
                false
            } else {
                *current = on_disk;
                true
            }
        });
        if changed {
            tracing::debug!(path = %self.path.display(), "token file changed externally");
        }
        Ok(changed)
    }

    /// Polls the file every `interval` so writes made by other processes
    /// reach this process' subscribers.
    pub fn watch(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = store.sync().await {
                    tracing::warn!(error = %e, "failed to re-read token file");
                }
            }
        })
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    fn current(&self) -> Option<TokenRecord> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<TokenRecord>> {
        self.tx.subscribe()
    }

    async fn save(&self, record: &TokenRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(record)?;
        async_fs::write(&self.path, json).await?;
        self.tx.send_replace(Some(record.clone()));
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.tx.send_replace(None);
        Ok(())
    }
}

async fn read_record(path: &PathBuf) -> Result<Option<TokenRecord>, StoreError> {
    match async_fs::read_to_string(path).await {
        Ok(content) if content.trim().is_empty() => Ok(None),
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
