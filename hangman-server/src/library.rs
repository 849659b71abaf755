use std::sync::Arc;

use hangman_core::{ContentLibrary, PunishmentCatalog, WordCatalog};
use hangman_persistence::{SnapshotKey, SnapshotStore, load_snapshot, save_snapshot};
use hangman_types::{
    GameError, GameStats, NewPunishment, PunishmentEntry, PunishmentId, RoundStatus, TimeConfig,
    TimeConfigUpdate,
};
use serde::de::DeserializeOwned;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{info, warn};

use crate::error::ServerResult;

/// Content and statistics shared by every session, written through to the
/// snapshot store on each change.
pub struct SharedLibrary {
    content: RwLock<ContentLibrary>,
    stats: RwLock<GameStats>,
    store: Arc<dyn SnapshotStore>,
}

impl SharedLibrary {
    /// Load persisted snapshots, falling back to the built-in defaults for
    /// anything missing or unreadable.
    pub async fn load(store: Arc<dyn SnapshotStore>) -> Self {
        let words = load_or(store.as_ref(), SnapshotKey::Words, WordCatalog::with_defaults).await;
        let punishments = load_or(
            store.as_ref(),
            SnapshotKey::Punishments,
            PunishmentCatalog::with_defaults,
        )
        .await;
        let time_config = load_or(store.as_ref(), SnapshotKey::TimeConfig, TimeConfig::default).await;
        let stats = load_or(store.as_ref(), SnapshotKey::Stats, GameStats::default).await;

        info!(
            "Library loaded: {} words, {} punishments, timer {}",
            words.len(),
            punishments.len(),
            if time_config.enabled { "on" } else { "off" }
        );

        Self {
            content: RwLock::new(ContentLibrary {
                words,
                punishments,
                time_config,
            }),
            stats: RwLock::new(stats),
            store,
        }
    }

    pub async fn content(&self) -> RwLockReadGuard<'_, ContentLibrary> {
        self.content.read().await
    }

    pub async fn words(&self) -> WordCatalog {
        self.content.read().await.words.clone()
    }

    /// Returns false when the word was already present.
    pub async fn add_word(&self, category: &str, word: &str) -> ServerResult<bool> {
        let mut content = self.content.write().await;
        let mut words = content.words.clone();
        if !words.add(category, word)? {
            return Ok(false);
        }
        save_snapshot(self.store.as_ref(), SnapshotKey::Words, &words).await?;
        content.words = words;
        Ok(true)
    }

    pub async fn remove_word(&self, word: &str) -> ServerResult<bool> {
        let mut content = self.content.write().await;
        let mut words = content.words.clone();
        if !words.remove(word) {
            return Ok(false);
        }
        save_snapshot(self.store.as_ref(), SnapshotKey::Words, &words).await?;
        content.words = words;
        Ok(true)
    }

    pub async fn reset_words(&self) -> ServerResult<usize> {
        let mut content = self.content.write().await;
        let words = WordCatalog::with_defaults();
        save_snapshot(self.store.as_ref(), SnapshotKey::Words, &words).await?;
        content.words = words;
        Ok(content.words.len())
    }

    pub async fn punishments(&self) -> Vec<PunishmentEntry> {
        self.content.read().await.punishments.entries().to_vec()
    }

    pub async fn add_punishment(&self, punishment: NewPunishment) -> ServerResult<PunishmentEntry> {
        let mut content = self.content.write().await;
        let mut punishments = content.punishments.clone();
        let entry = punishments.add(punishment)?;
        save_snapshot(self.store.as_ref(), SnapshotKey::Punishments, &punishments).await?;
        content.punishments = punishments;
        Ok(entry)
    }

    pub async fn remove_punishment(&self, id: PunishmentId) -> ServerResult<()> {
        let mut content = self.content.write().await;
        let mut punishments = content.punishments.clone();
        if !punishments.remove(id) {
            return Err(GameError::PunishmentNotFound { id: id.to_string() }.into());
        }
        save_snapshot(self.store.as_ref(), SnapshotKey::Punishments, &punishments).await?;
        content.punishments = punishments;
        Ok(())
    }

    pub async fn reset_punishments(&self) -> ServerResult<usize> {
        let mut content = self.content.write().await;
        let punishments = PunishmentCatalog::with_defaults();
        save_snapshot(self.store.as_ref(), SnapshotKey::Punishments, &punishments).await?;
        content.punishments = punishments;
        Ok(content.punishments.len())
    }

    pub async fn time_config(&self) -> TimeConfig {
        self.content.read().await.time_config.clone()
    }

    /// Applies to rounds started after the update.
    pub async fn update_time_config(&self, update: &TimeConfigUpdate) -> ServerResult<TimeConfig> {
        let mut content = self.content.write().await;
        let updated = content.time_config.apply(update)?;
        save_snapshot(self.store.as_ref(), SnapshotKey::TimeConfig, &updated).await?;
        content.time_config = updated.clone();
        Ok(updated)
    }

    pub async fn toggle_timer(&self) -> ServerResult<TimeConfig> {
        let mut content = self.content.write().await;
        let toggled = content.time_config.toggled();
        save_snapshot(self.store.as_ref(), SnapshotKey::TimeConfig, &toggled).await?;
        content.time_config = toggled.clone();
        Ok(toggled)
    }

    pub async fn stats(&self) -> GameStats {
        self.stats.read().await.clone()
    }

    /// Count a resolved round. A storage failure is logged, not returned,
    /// so a game in progress never stalls on the database.
    pub async fn record_round(&self, status: RoundStatus) -> GameStats {
        let mut stats = self.stats.write().await;
        stats.record(status);
        if let Err(e) = save_snapshot(self.store.as_ref(), SnapshotKey::Stats, &*stats).await {
            warn!("Failed to persist statistics: {:#}", e);
        }
        stats.clone()
    }

    pub async fn reset_stats(&self) -> ServerResult<()> {
        let mut stats = self.stats.write().await;
        self.store.remove(SnapshotKey::Stats).await?;
        *stats = GameStats::default();
        Ok(())
    }
}

async fn load_or<T: DeserializeOwned>(
    store: &dyn SnapshotStore,
    key: SnapshotKey,
    default: impl FnOnce() -> T,
) -> T {
    match load_snapshot(store, key).await {
        Ok(Some(value)) => value,
        Ok(None) => default(),
        Err(e) => {
            warn!("Ignoring unreadable snapshot {}: {:#}", key, e);
            default()
        }
    }
}
