//! Key-value cache for read-heavy reference data
//!
//! Values are stored as JSON strings so the [`Cache`] trait stays object-safe
//! and maps one-to-one onto an external store such as Redis. The bundled
//! [`InMemoryCache`] keeps entries in a sharded `DashMap` with a per-entry
//! expiry; expired entries are dropped lazily on read and on insert.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: String, ttl: Duration);

    async fn delete(&self, key: &str);

    /// Drop every key starting with `prefix`
    async fn delete_prefix(&self, prefix: &str);
}

/// Cache key templates
pub mod keys {
    pub const PROVINCES: &str = "location:provinces";
    pub const CATEGORY_TREE: &str = "category:tree";
    pub const ACTIVE_BANNERS: &str = "marketplace:banners";
    pub const VOUCHERS_PREFIX: &str = "marketplace:vouchers:";

    pub fn cities(province_id: i32) -> String {
        format!("location:cities:{}", province_id)
    }

    pub fn districts(city_id: i32) -> String {
        format!("location:districts:{}", city_id)
    }

    pub fn subdistricts(district_id: i32) -> String {
        format!("location:subdistricts:{}", district_id)
    }

    /// Active vouchers are cached per calendar day
    pub fn active_vouchers(today: &str) -> String {
        format!("{}{}", VOUCHERS_PREFIX, today)
    }
}

/// Read and decode a cached value. Undecodable entries are evicted.
pub async fn get_json<T: DeserializeOwned>(cache: &dyn Cache, key: &str) -> Option<T> {
    let raw = cache.get(key).await?;
    match serde_json::from_str(&raw) {
        Ok(value) => {
            tracing::debug!("cache hit: {}", key);
            Some(value)
        }
        Err(e) => {
            tracing::warn!("Dropping undecodable cache entry {}: {}", key, e);
            cache.delete(key).await;
            None
        }
    }
}

pub async fn set_json<T: Serialize + ?Sized + Sync>(
    cache: &dyn Cache,
    key: &str,
    value: &T,
    ttl: Duration,
) {
    match serde_json::to_string(value) {
        Ok(raw) => cache.set(key, raw, ttl).await,
        Err(e) => tracing::warn!("Failed to encode cache entry {}: {}", key, e),
    }
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

pub struct InMemoryCache {
    entries: DashMap<String, CacheEntry>,
    max_entries: usize,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn make_room(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);

        if self.entries.len() < self.max_entries {
            return;
        }

        let soonest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().expires_at)
            .map(|entry| entry.key().clone());
        if let Some(key) = soonest {
            self.entries.remove(&key);
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        }
        None
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        if !self.entries.contains_key(key) && self.entries.len() >= self.max_entries {
            self.make_room();
        }
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    async fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    async fn delete_prefix(&self, prefix: &str) {
        self.entries.retain(|key, _| !key.starts_with(prefix));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn set_then_get() {
        let cache = InMemoryCache::new();
        cache.set("a", "1".to_string(), MINUTE).await;
        assert_eq!(cache.get("a").await.as_deref(), Some("1"));
        assert_eq!(cache.get("b").await, None);
    }

    #[tokio::test]
    async fn expired_entries_are_not_returned() {
        let cache = InMemoryCache::new();
        cache.set("a", "1".to_string(), Duration::ZERO).await;
        assert_eq!(cache.get("a").await, None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn delete_prefix_only_touches_matching_keys() {
        let cache = InMemoryCache::new();
        cache.set(&keys::cities(1), "[]".to_string(), MINUTE).await;
        cache.set(&keys::cities(2), "[]".to_string(), MINUTE).await;
        cache.set(keys::PROVINCES, "[]".to_string(), MINUTE).await;

        cache.delete_prefix("location:cities:").await;

        assert_eq!(cache.get(&keys::cities(1)).await, None);
        assert_eq!(cache.get(&keys::cities(2)).await, None);
        assert!(cache.get(keys::PROVINCES).await.is_some());
    }

    #[tokio::test]
    async fn capacity_is_bounded() {
        let cache = InMemoryCache::with_capacity(2);
        cache.set("a", "1".to_string(), Duration::from_secs(10)).await;
        cache.set("b", "2".to_string(), Duration::from_secs(20)).await;
        cache.set("c", "3".to_string(), Duration::from_secs(30)).await;

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").await, None);
        assert!(cache.get("c").await.is_some());
    }

    #[tokio::test]
    async fn json_helpers_round_trip_and_evict_garbage() {
        let cache = InMemoryCache::new();
        set_json(&cache, "nums", &vec![1, 2, 3], MINUTE).await;
        let nums: Option<Vec<i32>> = get_json(&cache, "nums").await;
        assert_eq!(nums, Some(vec![1, 2, 3]));

        cache.set("bad", "{not json".to_string(), MINUTE).await;
        let bad: Option<Vec<i32>> = get_json(&cache, "bad").await;
        assert_eq!(bad, None);
        assert_eq!(cache.get("bad").await, None);
    }
}
