//! Key-value cache for upstream responses.
//!
//! The engine only assumes that a value read back is no older than the TTL
//! it was stored with. Values are kept as JSON so one store serves every
//! record type.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub trait Cache: Send + Sync {
    fn get(&self, key: &str) -> Option<serde_json::Value>;

    fn set(&self, key: &str, value: serde_json::Value, ttl: Duration);

    fn invalidate(&self, key: &str);
}

struct CacheEntry {
    data: serde_json::Value,
    expires_at: Instant,
}

/// Process-local cache. Expired entries are dropped when read and on every write.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(%err, "cache lock poisoned; treating as miss");
                return None;
            }
        };
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.data.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        if let Ok(mut entries) = self.entries.lock() {
            let now = Instant::now();
            entries.retain(|_, entry| entry.expires_at > now);
            entries.insert(
                key.to_string(),
                CacheEntry {
                    data: value,
                    expires_at: now + ttl,
                },
            );
        }
    }

    fn invalidate(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// Cache that stores nothing.
pub struct NoopCache;

impl Cache for NoopCache {
    fn get(&self, _key: &str) -> Option<serde_json::Value> {
        None
    }

    fn set(&self, _key: &str, _value: serde_json::Value, _ttl: Duration) {}

    fn invalidate(&self, _key: &str) {}
}

/// Fixed-length key for a section and the IDs that scope it.
///
/// Course IDs contain characters many stores reject and can be long, so
/// the joined parts are hashed.
pub fn cache_key(section: &str, parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(section.as_bytes());
    for part in parts {
        hasher.update([0u8]);
        hasher.update(part.as_bytes());
    }
    format!("{section}:{}", hex::encode(hasher.finalize()))
}
