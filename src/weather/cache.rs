use super::types::WeatherRecord;
use crate::utils::{cache_key, Clock};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub record: WeatherRecord,
    pub fetched_at_ms: i64,
}

/// Current-weather cache keyed by lower-cased city name.
///
/// moka's TTL only bounds memory; whether an entry may be served is decided
/// against the injected clock so the window is exact.
pub struct WeatherCache {
    entries: Cache<String, CacheEntry>,
    duration: Duration,
    clock: Arc<dyn Clock>,
}

impl WeatherCache {
    pub fn new(duration: Duration, clock: Arc<dyn Clock>) -> Self {
        let entries = Cache::builder()
            .max_capacity(1000)
            .time_to_live(duration)
            .build();

        Self {
            entries,
            duration,
            clock,
        }
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn is_valid(&self, entry: &CacheEntry) -> bool {
        let age_ms = self.clock.now_ms() - entry.fetched_at_ms;
        i128::from(age_ms) < self.duration.as_millis() as i128
    }

    pub async fn get(&self, city: &str) -> Option<WeatherRecord> {
        let key = cache_key(city);
        let entry = self.entries.get(&key).await?;

        if self.is_valid(&entry) {
            Some(entry.record)
        } else {
            tracing::debug!("Cache entry for {} is stale, dropping it", key);
            self.entries.invalidate(&key).await;
            None
        }
    }

    pub async fn put(&self, city: &str, record: WeatherRecord, fetched_at_ms: i64) {
        self.entries
            .insert(
                cache_key(city),
                CacheEntry {
                    record,
                    fetched_at_ms,
                },
            )
            .await;
    }
}
