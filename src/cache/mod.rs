//! Cache Module
//!
//! The uniform cache contract and its three tiers: in-process memory,
//! remote key-value, and the composite burst tier that fans out across
//! any two of them.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

mod burst;
mod codec;
mod entry;
mod memory;
mod remote;


// Re-export public types
pub use burst::BurstCache;
pub use codec::{Decoded, PrimitiveCodec, PrimitiveValue, SerdeCodec, ValueCodec};
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use remote::RemoteCache;

// == Cache Contract ==
/// The key-value store contract implemented by every tier.
///
/// Operations are safe to call concurrently on one instance for different
/// keys. Two concurrent writers to the same key resolve as last write wins,
/// with no ordering guarantee beyond the backing store's own atomicity for
/// a single `put`.
#[async_trait]
pub trait Cache<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    /// Stores a value under a key, overwriting any existing entry.
    ///
    /// Returns the value that was stored, not a confirmation of
    /// durability: the remote tier writes in the background.
    async fn put(&self, key: &str, value: V) -> Result<V>;

    /// Removes the entry if present, returning whether anything was removed.
    async fn invalidate(&self, key: &str) -> Result<bool>;

    /// Removes every entry belonging to this tier's namespace.
    async fn clear(&self) -> Result<()>;

    /// Checks whether a key exists.
    ///
    /// Whether this also evaluates TTL expiry is tier-specific; see the
    /// memory tier's documented behavior.
    async fn contains(&self, key: &str) -> Result<bool>;

    /// Returns the value if present and unexpired. A miss is `Ok(None)`,
    /// never an error.
    async fn get(&self, key: &str) -> Result<Option<V>>;
}

// == Supplier Combinators ==
/// Read-through helpers available on every [`Cache`] implementation.
///
/// Both take the fallback computation as a future, which stays unpolled
/// on a cache hit.
#[allow(async_fn_in_trait)]
pub trait CacheExt<V>: Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Returns the cached value, or computes one without storing it.
    async fn get_or<F>(&self, key: &str, supplier: F) -> Result<Option<V>>
    where
        F: Future<Output = Option<V>> + Send,
    {
        match self.get(key).await? {
            Some(value) => Ok(Some(value)),
            None => Ok(supplier.await),
        }
    }

    /// Returns the cached value, or computes, stores and returns one.
    ///
    /// Nothing is stored when the supplier yields no value.
    async fn get_or_cache<F>(&self, key: &str, supplier: F) -> Result<Option<V>>
    where
        F: Future<Output = Option<V>> + Send,
    {
        if let Some(value) = self.get(key).await? {
            return Ok(Some(value));
        }

        match supplier.await {
            Some(value) => Ok(Some(self.put(key, value).await?)),
            None => Ok(None),
        }
    }
}

impl<V, C> CacheExt<V> for C
where
    V: Clone + Send + Sync + 'static,
    C: Cache<V> + ?Sized,
{
}

// == Pointer Delegation ==
// Tiers compose as trait objects, so shared and boxed handles must
// themselves satisfy the contract.

#[async_trait]
impl<V, C> Cache<V> for Arc<C>
where
    V: Clone + Send + Sync + 'static,
    C: Cache<V> + ?Sized,
{
    async fn put(&self, key: &str, value: V) -> Result<V> {
        (**self).put(key, value).await
    }

    async fn invalidate(&self, key: &str) -> Result<bool> {
        (**self).invalidate(key).await
    }

    async fn clear(&self) -> Result<()> {
        (**self).clear().await
    }

    async fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key).await
    }

    async fn get(&self, key: &str) -> Result<Option<V>> {
        (**self).get(key).await
    }
}

#[async_trait]
impl<V, C> Cache<V> for Box<C>
where
    V: Clone + Send + Sync + 'static,
    C: Cache<V> + ?Sized,
{
    async fn put(&self, key: &str, value: V) -> Result<V> {
        (**self).put(key, value).await
    }

    async fn invalidate(&self, key: &str) -> Result<bool> {
        (**self).invalidate(key).await
    }

    async fn clear(&self) -> Result<()> {
        (**self).clear().await
    }

    async fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key).await
    }

    async fn get(&self, key: &str) -> Result<Option<V>> {
        (**self).get(key).await
    }
}
