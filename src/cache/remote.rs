//! Remote Cache Module
//!
//! A keyed tier backed by an external key-value store. Writes are
//! fire-and-forget background tasks; reads are synchronous round trips.
//! Structured payloads that fail to decode are treated as misses and
//! purged asynchronously (self-healing).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Notify;
use tracing::warn;

use crate::cache::{Cache, Decoded, PrimitiveCodec, PrimitiveValue, SerdeCodec, ValueCodec};
use crate::error::Result;
use crate::key::KeyNamespace;
use crate::serialize::SerializationAdapter;
use crate::store::KeyValueStore;
use crate::ttl::TtlPolicy;

// == Pending Writes ==
/// Tracks in-flight background operations so a graceful shutdown can
/// drain them instead of dropping writes.
#[derive(Debug, Default)]
struct PendingWrites {
    count: AtomicUsize,
    drained: Notify,
}

impl PendingWrites {
    fn begin(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
    }

    fn finish(&self) {
        if self.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.drained.notify_waiters();
        }
    }

    async fn wait_idle(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            // Register before checking, so a finish() racing this check
            // still wakes us.
            notified.as_mut().enable();

            if self.count.load(Ordering::Acquire) == 0 {
                return;
            }

            notified.await;
        }
    }
}

// == Remote Cache ==
/// Cache tier backed by an external key-value store.
///
/// `put` returns the input value immediately; the write itself is a
/// background task with SETEX semantics, so durability is best-effort and
/// a racing read on another replica may miss it. With refresh-on-access,
/// `get` issues a separate EXPIRE after the read; the two calls are not
/// atomic and a concurrent expiry in between is acceptable.
pub struct RemoteCache<V> {
    store: Arc<dyn KeyValueStore>,
    namespace: KeyNamespace,
    policy: TtlPolicy,
    codec: Box<dyn ValueCodec<V>>,
    pending: Arc<PendingWrites>,
}

impl<V> RemoteCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a remote cache from its parts. Prefer the
    /// [`RemoteCache::primitive`] and [`RemoteCache::serialized`]
    /// constructors, which pick the codec from the value type.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        namespace: KeyNamespace,
        policy: TtlPolicy,
        codec: Box<dyn ValueCodec<V>>,
    ) -> Self {
        Self {
            store,
            namespace,
            policy,
            codec,
            pending: Arc::new(PendingWrites::default()),
        }
    }

    /// The key namespace this tier writes under.
    pub fn namespace(&self) -> &KeyNamespace {
        &self.namespace
    }

    // == Flush ==
    /// Waits until every in-flight background write and self-heal issued
    /// by this instance has completed. Intended for graceful shutdown;
    /// the regular contract never requires it.
    pub async fn flush(&self) {
        self.pending.wait_idle().await;
    }

    /// Spawns the fire-and-forget SETEX write. Failures are logged and
    /// unobservable to the caller by design.
    fn spawn_write(&self, storage_key: String, payload: String) {
        let store = Arc::clone(&self.store);
        let ttl = self.policy.ttl();
        let pending = Arc::clone(&self.pending);

        pending.begin();
        tokio::spawn(async move {
            if let Err(err) = store.set_ex(&storage_key, ttl, &payload).await {
                warn!("background write for {} failed: {}", storage_key, err);
            }
            pending.finish();
        });
    }

    /// Asynchronously purges an entry whose payload failed to decode, so
    /// a future write can repopulate it cleanly.
    fn spawn_heal(&self, storage_key: String, reason: String) {
        warn!(
            "healing corrupt cache entry {} ({}), treating as miss",
            storage_key, reason
        );

        let store = Arc::clone(&self.store);
        let pending = Arc::clone(&self.pending);

        pending.begin();
        tokio::spawn(async move {
            if let Err(err) = store.del(&storage_key).await {
                warn!("self-heal delete for {} failed: {}", storage_key, err);
            }
            pending.finish();
        });
    }
}

impl<V: PrimitiveValue> RemoteCache<V> {
    /// Remote cache for a string-coercible scalar type. No serialization
    /// strategy needed.
    pub fn primitive(
        store: Arc<dyn KeyValueStore>,
        namespace: KeyNamespace,
        policy: TtlPolicy,
    ) -> Self {
        Self::new(store, namespace, policy, Box::new(PrimitiveCodec::new()))
    }
}

impl<V> RemoteCache<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Remote cache for a structured type, encoded through the given
    /// serialization strategy.
    pub fn serialized(
        store: Arc<dyn KeyValueStore>,
        namespace: KeyNamespace,
        policy: TtlPolicy,
        adapter: Arc<dyn SerializationAdapter>,
    ) -> Self {
        Self::new(store, namespace, policy, Box::new(SerdeCodec::new(adapter)))
    }
}

#[async_trait]
impl<V> Cache<V> for RemoteCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn put(&self, key: &str, value: V) -> Result<V> {
        // Encoding problems are real errors and surface now; only the
        // store round trip is fire-and-forget.
        let payload = self.codec.encode(&value)?;
        self.spawn_write(self.namespace.build(key), payload);
        Ok(value)
    }

    async fn invalidate(&self, key: &str) -> Result<bool> {
        let removed = self.store.del(&self.namespace.build(key)).await?;
        Ok(removed > 0)
    }

    async fn clear(&self) -> Result<()> {
        self.store.del_pattern(&self.namespace.wildcard()).await?;
        Ok(())
    }

    async fn contains(&self, key: &str) -> Result<bool> {
        self.store.exists(&self.namespace.build(key)).await
    }

    async fn get(&self, key: &str) -> Result<Option<V>> {
        let storage_key = self.namespace.build(key);

        let raw = match self.store.get(&storage_key).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        if self.policy.refresh_on_access() {
            self.store.expire(&storage_key, self.policy.ttl()).await?;
        }

        match self.codec.decode(&raw)? {
            Decoded::Value(value) => Ok(Some(value)),
            Decoded::Invalid(reason) => {
                if self.codec.self_heals() {
                    self.spawn_heal(storage_key, reason);
                }
                Ok(None)
            }
        }
    }
}
