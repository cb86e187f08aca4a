//! Affinity store: routing memory mapping user keys to the backend
//! that last proved authoritative for them

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dirmux_core::config::CacheConfig;
use tokio::sync::RwLock;

/// Keyed store for user-to-backend routes.
///
/// TTL policy is owned by the implementation. Concurrent requests may
/// race on the same key; last write wins, a wrong route self-heals on
/// the next affinity dispatch.
#[async_trait]
pub trait AffinityStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, prefix: &str);

    async fn remove(&self, key: &str);
}

/// In-memory affinity store with per-entry TTL.
pub struct MemoryAffinityStore {
    entries: RwLock<HashMap<String, CachedPrefix>>,
    ttl: Duration,
}

struct CachedPrefix {
    prefix: String,
    cached_at: Instant,
}

impl MemoryAffinityStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Duration::from_secs(config.ttl_seconds))
    }

    /// Number of live (non-expired) entries.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries
            .values()
            .filter(|e| e.cached_at.elapsed() < self.ttl)
            .count()
    }
}

#[async_trait]
impl AffinityStore for MemoryAffinityStore {
    async fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;

        if let Some(cached) = entries.get(key) {
            if cached.cached_at.elapsed() < self.ttl {
                return Some(cached.prefix.clone());
            }
        }

        None
    }

    async fn set(&self, key: &str, prefix: &str) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CachedPrefix {
                prefix: prefix.to_string(),
                cached_at: Instant::now(),
            },
        );
    }

    async fn remove(&self, key: &str) {
        let mut entries = self.entries.write().await;
        entries.remove(key);
    }
}
