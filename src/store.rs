//! Key-Value Store Module
//!
//! The narrow capability interface the remote tier expects from a backing
//! key-value store, plus an in-memory reference implementation used by the
//! test suites and as a local stand-in.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;

// == Key-Value Store Trait ==
/// The six primitives the remote tier needs from a backing store.
///
/// Implementations may wrap a single connection, a pool or a cluster
/// client; the tiers are indifferent. Transport failures are reported as
/// [`crate::CacheError::Store`].
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Stores a value and its absolute TTL in one operation (SETEX).
    async fn set_ex(&self, key: &str, ttl: Duration, value: &str) -> Result<()>;

    /// Resets the TTL of an existing key. A missing key is not an error.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<()>;

    /// Deletes a key, returning how many entries were removed.
    async fn del(&self, key: &str) -> Result<u64>;

    /// Deletes every key matching a wildcard pattern, returning the count.
    async fn del_pattern(&self, pattern: &str) -> Result<u64>;

    /// Checks whether a key currently exists.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Reads the raw string stored under a key, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;
}

// == In-Memory Store ==
/// Reference [`KeyValueStore`] backed by a process-local map.
///
/// Honors per-key TTLs lazily on read and supports trailing-`*` prefix
/// patterns in [`KeyValueStore::del_pattern`]. Never fails.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, StoredValue>>,
}

#[derive(Debug)]
struct StoredValue {
    payload: String,
    expires_at: Instant,
}

impl StoredValue {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn set_ex(&self, key: &str, ttl: Duration, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            StoredValue {
                payload: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.lock().await;
        if let Some(stored) = entries.get_mut(key) {
            if !stored.is_expired() {
                stored.expires_at = Instant::now() + ttl;
            }
        }
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<u64> {
        let mut entries = self.entries.lock().await;
        Ok(u64::from(entries.remove(key).is_some()))
    }

    async fn del_pattern(&self, pattern: &str) -> Result<u64> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();

        match pattern.strip_suffix('*') {
            Some(prefix) => entries.retain(|key, _| !key.starts_with(prefix)),
            None => {
                entries.remove(pattern);
            }
        }

        Ok((before - entries.len()) as u64)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(stored) if stored.is_expired() => {
                entries.remove(key);
                Ok(false)
            }
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(stored) if stored.is_expired() => {
                entries.remove(key);
                Ok(None)
            }
            Some(stored) => Ok(Some(stored.payload.clone())),
            None => Ok(None),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_set_ex_and_get() {
        let store = InMemoryStore::new();

        store.set_ex("k", TTL, "v").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
        assert!(store.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_expired_entry_is_absent() {
        let store = InMemoryStore::new();

        store.set_ex("k", Duration::from_millis(20), "v").await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(!store.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_expire_extends_deadline() {
        let store = InMemoryStore::new();

        store.set_ex("k", Duration::from_millis(40), "v").await.unwrap();
        store.expire("k", TTL).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_del_reports_count() {
        let store = InMemoryStore::new();

        store.set_ex("k", TTL, "v").await.unwrap();

        assert_eq!(store.del("k").await.unwrap(), 1);
        assert_eq!(store.del("k").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_del_pattern_prefix_match() {
        let store = InMemoryStore::new();

        store.set_ex("cache:a", TTL, "1").await.unwrap();
        store.set_ex("cache:b", TTL, "2").await.unwrap();
        store.set_ex("other:c", TTL, "3").await.unwrap();

        assert_eq!(store.del_pattern("cache:*").await.unwrap(), 2);
        assert!(store.exists("other:c").await.unwrap());
    }
}
