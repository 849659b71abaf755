use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use tracing::debug;

use crate::repositories::SnapshotRepository;

/// Stable storage keys, one per persisted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKey {
    Words,
    Punishments,
    TimeConfig,
    Stats,
}

impl SnapshotKey {
    pub const ALL: [SnapshotKey; 4] = [
        SnapshotKey::Words,
        SnapshotKey::Punishments,
        SnapshotKey::TimeConfig,
        SnapshotKey::Stats,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SnapshotKey::Words => "hangman-words",
            SnapshotKey::Punishments => "hangman-punishments",
            SnapshotKey::TimeConfig => "hangman-time-config",
            SnapshotKey::Stats => "hangman-stats",
        }
    }
}

impl std::fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SnapshotRepository {
    /// Keys with no stored document yet. Those fall back to defaults on load.
    pub async fn missing_keys(&self) -> Result<Vec<SnapshotKey>> {
        let stored = self.keys().await?;
        Ok(SnapshotKey::ALL
            .into_iter()
            .filter(|key| !stored.iter().any(|s| s == key.as_str()))
            .collect())
    }
}

/// Key-value persistence for catalogs, timing settings and statistics.
/// `load` returns `None` on first run so callers can fall back to defaults.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self, key: SnapshotKey) -> Result<Option<String>>;
    async fn save(&self, key: SnapshotKey, payload: String) -> Result<()>;
    async fn remove(&self, key: SnapshotKey) -> Result<bool>;
}

#[async_trait]
impl SnapshotStore for SnapshotRepository {
    async fn load(&self, key: SnapshotKey) -> Result<Option<String>> {
        self.find(key.as_str()).await
    }

    async fn save(&self, key: SnapshotKey, payload: String) -> Result<()> {
        self.upsert(key.as_str(), payload).await
    }

    async fn remove(&self, key: SnapshotKey) -> Result<bool> {
        self.delete(key.as_str()).await
    }
}

/// In-process store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    entries: RwLock<HashMap<SnapshotKey, String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self, key: SnapshotKey) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(&key).cloned())
    }

    async fn save(&self, key: SnapshotKey, payload: String) -> Result<()> {
        self.entries.write().await.insert(key, payload);
        Ok(())
    }

    async fn remove(&self, key: SnapshotKey) -> Result<bool> {
        Ok(self.entries.write().await.remove(&key).is_some())
    }
}

pub async fn load_snapshot<T: DeserializeOwned>(
    store: &dyn SnapshotStore,
    key: SnapshotKey,
) -> Result<Option<T>> {
    let Some(payload) = store.load(key).await? else {
        debug!("No snapshot stored under {}", key);
        return Ok(None);
    };
    let value = serde_json::from_str(&payload)
        .with_context(|| format!("Corrupt snapshot under {}", key))?;
    Ok(Some(value))
}

pub async fn save_snapshot<T: Serialize + Sync>(
    store: &dyn SnapshotStore,
    key: SnapshotKey,
    value: &T,
) -> Result<()> {
    let payload = serde_json::to_string(value)?;
    store.save(key, payload).await?;
    debug!("Saved snapshot {}", key);
    Ok(())
}
