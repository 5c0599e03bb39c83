//! Burst Cache Module
//!
//! Composes two tiers behind the cache contract to absorb request bursts:
//! a fast, short-lived "minor" tier consulted first, and a slower,
//! longer-lived "major" tier used as the fallback.

use async_trait::async_trait;

use crate::cache::Cache;
use crate::error::Result;

// == Burst Cache ==
/// Composite tier over a minor and a major cache.
///
/// Writes go to both tiers; reads prefer the minor tier and fall back to
/// the major one. A fallback hit never backfills the minor tier, so the
/// miss-then-fallback cost repeats until the next `put`. Being a cache
/// itself, a burst cache nests arbitrarily.
pub struct BurstCache<V> {
    minor: Box<dyn Cache<V>>,
    major: Box<dyn Cache<V>>,
}

impl<V> BurstCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Wraps a minor (fast) and major (slow) tier.
    pub fn new(minor: Box<dyn Cache<V>>, major: Box<dyn Cache<V>>) -> Self {
        Self { minor, major }
    }
}

#[async_trait]
impl<V> Cache<V> for BurstCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Writes to the minor then the major tier. Both writes are attempted
    /// even when the first fails, and a failure on either side is
    /// reported; there is no rollback of the write that succeeded.
    async fn put(&self, key: &str, value: V) -> Result<V> {
        let minor = self.minor.put(key, value.clone()).await;
        let major = self.major.put(key, value.clone()).await;

        minor?;
        major?;

        Ok(value)
    }

    async fn invalidate(&self, key: &str) -> Result<bool> {
        let minor = self.minor.invalidate(key).await;
        let major = self.major.invalidate(key).await;

        Ok(minor? | major?)
    }

    async fn clear(&self) -> Result<()> {
        let minor = self.minor.clear().await;
        let major = self.major.clear().await;

        minor?;
        major?;

        Ok(())
    }

    async fn contains(&self, key: &str) -> Result<bool> {
        if self.minor.contains(key).await? {
            return Ok(true);
        }
        self.major.contains(key).await
    }

    async fn get(&self, key: &str) -> Result<Option<V>> {
        if let Some(value) = self.minor.get(key).await? {
            return Ok(Some(value));
        }
        self.major.get(key).await
    }
}
