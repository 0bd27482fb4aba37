use crate::database::{KeyValueStore, StorageError};
use std::sync::Arc;
use tokio::sync::RwLock;

pub const RECENT_SEARCHES_KEY: &str = "recentSearches";
pub const MAX_RECENT_SEARCHES: usize = 10;

/// Move `city` to the front, dropping any exact duplicate, capped at `max`.
pub fn push_front_unique(entries: &[String], city: &str, max: usize) -> Vec<String> {
    std::iter::once(city.to_string())
        .chain(entries.iter().filter(|c| c.as_str() != city).cloned())
        .take(max)
        .collect()
}

/// Most-recent-first list of looked-up cities, mirrored to the key/value store.
pub struct RecentSearches {
    storage: Arc<dyn KeyValueStore>,
    entries: RwLock<Vec<String>>,
}

impl RecentSearches {
    /// Never fails: a missing or unreadable ledger starts empty.
    pub async fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let entries = match storage.get(RECENT_SEARCHES_KEY).await {
            Ok(Some(raw)) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|e| {
                tracing::debug!("Ignoring malformed recent searches: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::debug!("Could not read recent searches: {}", e);
                Vec::new()
            }
        };

        Self {
            storage,
            entries: RwLock::new(entries),
        }
    }

    pub async fn list(&self) -> Vec<String> {
        self.entries.read().await.clone()
    }

    pub async fn add(&self, city: &str) -> Vec<String> {
        let mut entries = self.entries.write().await;
        let updated = push_front_unique(&entries, city, MAX_RECENT_SEARCHES);

        if let Err(e) = self.persist(&updated).await {
            tracing::warn!("Failed to persist recent searches: {}", e);
        }

        *entries = updated.clone();
        updated
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;

        if let Err(e) = self.storage.remove(RECENT_SEARCHES_KEY).await {
            tracing::warn!("Failed to remove persisted recent searches: {}", e);
        }

        entries.clear();
    }

    async fn persist(&self, entries: &[String]) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(entries)?;
        self.storage.set(RECENT_SEARCHES_KEY, &encoded).await
    }
}
