//! Memory Cache Module
//!
//! The in-process tier: a map from key to timestamped value with lazy
//! expiry on read and periodic sweep-based garbage collection.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{Cache, CacheEntry};
use crate::error::Result;
use crate::tasks::gc::{self, Sweepable};
use crate::ttl::TtlPolicy;

// == Memory Cache ==
/// In-process cache tier.
///
/// Construction registers the instance weakly with the process-wide GC
/// registry, so the background scheduler sweeps it without further caller
/// action and dropping the last `Arc` silently retires it from sweeps.
///
/// Expiry is evaluated against the timestamp as it stood before the
/// current access: with refresh-on-access enabled, reads spaced within the
/// TTL keep an entry alive indefinitely, while the first gap exceeding the
/// TTL expires it.
#[derive(Debug)]
pub struct MemoryCache<V> {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// Expiry rules for every entry in this tier
    policy: TtlPolicy,
}

impl<V> MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a new memory cache and registers it for background sweeps.
    pub fn new(policy: TtlPolicy) -> Arc<Self> {
        let cache = Arc::new(Self {
            entries: RwLock::new(HashMap::new()),
            policy,
        });

        let weak = Arc::downgrade(&cache);
        let handle: Weak<dyn Sweepable> = weak;
        gc::register(handle);

        cache
    }

    /// The TTL policy this tier was built with.
    pub fn policy(&self) -> &TtlPolicy {
        &self.policy
    }

    // == Garbage Collection ==
    /// Removes every expired entry, independent of access.
    ///
    /// Intended to be driven periodically by the GC scheduler to bound map
    /// growth when entries are written but never read again. Returns the
    /// number of entries removed.
    pub async fn garbage_collect(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(&self.policy));
        before - entries.len()
    }

    // == Strict Existence Check ==
    /// Existence check that also evaluates TTL expiry, unlike
    /// [`Cache::contains`]. Does not evict or refresh.
    pub async fn contains_live(&self, key: &str) -> bool {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(&self.policy))
    }

    // == Length ==
    /// Current number of entries, expired-but-unswept ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl<V> Cache<V> for MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn put(&self, key: &str, value: V) -> Result<V> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), CacheEntry::new(value.clone()));
        Ok(value)
    }

    async fn invalidate(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(key).is_some())
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.clear();
        Ok(())
    }

    /// Checks key presence only. An expired entry that has not yet been
    /// evicted by a `get` or a sweep still reports true: documented
    /// behavior, kept for compatibility. Use
    /// [`MemoryCache::contains_live`] for a strict check.
    async fn contains(&self, key: &str) -> Result<bool> {
        let entries = self.entries.read().await;
        Ok(entries.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Option<V>> {
        let mut entries = self.entries.write().await;

        if let Some(entry) = entries.get_mut(key) {
            if !entry.is_expired(&self.policy) {
                if self.policy.refresh_on_access() {
                    entry.refresh();
                }
                return Ok(Some(entry.value.clone()));
            }
        } else {
            return Ok(None);
        }

        // Expired: evict lazily and report a miss.
        entries.remove(key);
        Ok(None)
    }
}

#[async_trait]
impl<V> Sweepable for MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn sweep(&self) -> usize {
        self.garbage_collect().await
    }
}
