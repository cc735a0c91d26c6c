use dashmap::DashMap;
use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

use crate::metrics::CACHE_SIZE;

// Cache entry with timestamp
#[derive(Clone)]
pub struct CacheEntry {
    pub response: String,
    pub created_at: Instant,
}

// Create a cache key (hash of the parts, normalised)
pub fn make_cache_key(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.trim().to_lowercase());
        hasher.update([0u8]); // separator so ("ab", "c") != ("a", "bc")
    }
    format!("{:x}", hasher.finalize())
}

// Cached value if still fresh
pub fn lookup<T: DeserializeOwned>(
    cache: &DashMap<String, CacheEntry>,
    key: &str,
    ttl: Duration,
) -> Option<T> {
    let entry = cache.get(key)?;
    if entry.created_at.elapsed() >= ttl {
        return None;
    }
    serde_json::from_str(&entry.response).ok()
}

pub fn store<T: Serialize>(cache: &DashMap<String, CacheEntry>, key: String, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        cache.insert(key, CacheEntry {
            response: json,
            created_at: Instant::now(),
        });
        CACHE_SIZE.set(cache.len() as f64);
    }
}

// Drop expired entries
pub fn evict_expired(cache: &DashMap<String, CacheEntry>, ttl: Duration) -> usize {
    let before = cache.len();
    cache.retain(|_, entry| entry.created_at.elapsed() < ttl);
    CACHE_SIZE.set(cache.len() as f64);
    before.saturating_sub(cache.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_is_normalised() {
        assert_eq!(
            make_cache_key(&["weather", "London", "GB"]),
            make_cache_key(&["weather", " london ", "gb"])
        );
    }

    #[test]
    fn test_key_parts_are_separated() {
        assert_ne!(
            make_cache_key(&["weather", "ab", "c"]),
            make_cache_key(&["weather", "a", "bc"])
        );
        assert_ne!(
            make_cache_key(&["weather", "paris", ""]),
            make_cache_key(&["weather", "paris", "fr"])
        );
    }

    #[test]
    fn test_lookup_respects_ttl() {
        let cache = DashMap::new();
        let key = make_cache_key(&["weather", "oslo", "no"]);
        store(&cache, key.clone(), &json!({"name": "Oslo"}));

        let hit: Option<serde_json::Value> = lookup(&cache, &key, Duration::from_secs(60));
        assert_eq!(hit, Some(json!({"name": "Oslo"})));

        let miss: Option<serde_json::Value> = lookup(&cache, &key, Duration::ZERO);
        assert!(miss.is_none());
    }

    #[test]
    fn test_evict_expired() {
        let cache = DashMap::new();
        store(&cache, "a".to_string(), &1u32);
        store(&cache, "b".to_string(), &2u32);

        assert_eq!(evict_expired(&cache, Duration::from_secs(60)), 0);
        assert_eq!(evict_expired(&cache, Duration::ZERO), 2);
        assert!(cache.is_empty());
    }
}
