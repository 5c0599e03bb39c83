//! Library Entry Point
//!
//! Caches are constructed against a [`Strata`] instance, which carries the
//! shared settings and makes sure the background GC loop is running.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::{BurstCache, Cache, MemoryCache, PrimitiveValue, RemoteCache};
use crate::config::CacheSettings;
use crate::error::{CacheError, Result};
use crate::key::KeyNamespace;
use crate::store::KeyValueStore;
use crate::tasks::gc;
use crate::ttl::TtlPolicy;

// == Strata ==
/// Entry point for the caching library.
///
/// Construction starts the process-wide GC sweep loop (when called inside
/// a tokio runtime; otherwise start it explicitly via [`gc::start`]). The
/// loop has process lifetime by default; [`gc::shutdown`] stops it for
/// environments with explicit lifecycle management.
pub struct Strata {
    settings: CacheSettings,
}

impl Strata {
    // == Constructor ==
    /// Creates a new library instance from settings.
    pub fn new(settings: CacheSettings) -> Self {
        gc::start(gc::GC_INTERVAL);
        Self { settings }
    }

    /// The settings caches are built from.
    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    // == Shared Pieces ==
    fn default_policy(&self) -> Result<TtlPolicy> {
        let ttl = self.settings.default_ttl().ok_or_else(|| {
            CacheError::Config("no ttl specified and no default was set".to_string())
        })?;
        TtlPolicy::new(ttl, self.settings.default_refresh())
    }

    fn store(&self) -> Result<Arc<dyn KeyValueStore>> {
        self.settings
            .store()
            .cloned()
            .ok_or_else(|| CacheError::Config("no key-value store configured".to_string()))
    }

    fn namespace(&self, name: &str) -> Result<KeyNamespace> {
        KeyNamespace::new(
            format!("{}:{}", self.settings.root(), name),
            self.settings.version().map(str::to_string),
        )
    }

    // == Memory Tier ==
    /// In-process cache using the default TTL policy.
    pub fn memory_cache<V>(&self) -> Result<Arc<MemoryCache<V>>>
    where
        V: Clone + Send + Sync + 'static,
    {
        Ok(MemoryCache::new(self.default_policy()?))
    }

    /// In-process cache with an explicit TTL policy.
    pub fn memory_cache_with<V>(&self, ttl: Duration, refresh: bool) -> Result<Arc<MemoryCache<V>>>
    where
        V: Clone + Send + Sync + 'static,
    {
        Ok(MemoryCache::new(TtlPolicy::new(ttl, refresh)?))
    }

    // == Remote Tier ==
    /// Remote cache for a string-coercible scalar type, stored under
    /// `root:name` plus the configured version.
    pub fn remote_cache<V: PrimitiveValue>(&self, name: &str) -> Result<RemoteCache<V>> {
        Ok(RemoteCache::primitive(
            self.store()?,
            self.namespace(name)?,
            self.default_policy()?,
        ))
    }

    /// Remote cache for a scalar type with an explicit TTL policy.
    pub fn remote_cache_with<V: PrimitiveValue>(
        &self,
        name: &str,
        ttl: Duration,
        refresh: bool,
    ) -> Result<RemoteCache<V>> {
        Ok(RemoteCache::primitive(
            self.store()?,
            self.namespace(name)?,
            TtlPolicy::new(ttl, refresh)?,
        ))
    }

    /// Remote cache for a structured type, encoded through the configured
    /// serialization strategy. Fails at construction when no strategy is
    /// configured.
    pub fn remote_serialized_cache<V>(&self, name: &str) -> Result<RemoteCache<V>>
    where
        V: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let serializer = self.settings.serializer().cloned().ok_or_else(|| {
            CacheError::Config("no serialization adapter configured".to_string())
        })?;

        Ok(RemoteCache::serialized(
            self.store()?,
            self.namespace(name)?,
            self.default_policy()?,
            serializer,
        ))
    }

    /// Remote cache holding lists of a structured element type.
    pub fn remote_list_cache<T>(&self, name: &str) -> Result<RemoteCache<Vec<T>>>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.remote_serialized_cache::<Vec<T>>(name)
    }

    // == Burst Tier ==
    /// Composite tier over a minor (fast) and major (slow) cache.
    pub fn burst_cache<V>(
        &self,
        minor: Box<dyn Cache<V>>,
        major: Box<dyn Cache<V>>,
    ) -> BurstCache<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        BurstCache::new(minor, major)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::JsonAdapter;
    use crate::store::InMemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Session {
        token: String,
    }

    fn full_settings() -> CacheSettings {
        CacheSettings::new()
            .with_default_ttl(Duration::from_secs(300))
            .with_store(Arc::new(InMemoryStore::new()))
            .with_serializer(Arc::new(JsonAdapter))
    }

    #[tokio::test]
    async fn test_memory_cache_requires_some_ttl() {
        let strata = Strata::new(CacheSettings::new());

        let result = strata.memory_cache::<String>();
        assert!(matches!(result, Err(CacheError::Config(_))));

        // An explicit TTL works without a default.
        assert!(strata
            .memory_cache_with::<String>(Duration::from_secs(1), false)
            .is_ok());
    }

    #[tokio::test]
    async fn test_remote_cache_requires_store() {
        let strata = Strata::new(
            CacheSettings::new().with_default_ttl(Duration::from_secs(300)),
        );

        let result = strata.remote_cache::<String>("user");
        assert!(matches!(result, Err(CacheError::Config(_))));
    }

    #[tokio::test]
    async fn test_serialized_cache_requires_adapter() {
        let strata = Strata::new(
            CacheSettings::new()
                .with_default_ttl(Duration::from_secs(300))
                .with_store(Arc::new(InMemoryStore::new())),
        );

        // Missing strategy is fatal at construction, not first use.
        let result = strata.remote_serialized_cache::<Session>("session");
        assert!(matches!(result, Err(CacheError::Config(_))));
    }

    #[tokio::test]
    async fn test_remote_namespace_includes_root_version_and_name() {
        let strata = Strata::new(full_settings().with_root("app").with_version("v1"));

        let cache = strata.remote_cache::<i64>("user").unwrap();
        assert_eq!(cache.namespace().build("42"), "app:user:v1:42");
    }

    #[tokio::test]
    async fn test_constructs_every_tier() {
        let strata = Strata::new(full_settings());

        let memory = strata.memory_cache::<Session>().unwrap();
        let remote = strata.remote_serialized_cache::<Session>("session").unwrap();
        let _list = strata.remote_list_cache::<Session>("sessions").unwrap();
        let _primitive = strata.remote_cache::<i64>("counter").unwrap();
        let _burst: BurstCache<Session> = strata.burst_cache(Box::new(memory), Box::new(remote));
    }
}
