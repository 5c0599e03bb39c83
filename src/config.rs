//! Configuration Module
//!
//! Library-wide defaults shared by every cache built against one
//! [`crate::Strata`] instance: the default TTL policy, the deployment
//! version used to namespace keys, the backing key-value store handle and
//! the serialization strategy for structured values.

use std::sync::Arc;
use std::time::Duration;

use crate::serialize::SerializationAdapter;
use crate::store::KeyValueStore;

/// Default root under which remote tiers namespace their keys.
pub const DEFAULT_ROOT: &str = "strata:cache";

// == Cache Settings ==
/// Settings for the caching library.
///
/// All fields are optional; caches built from settings that are missing a
/// needed piece (a TTL, the store handle, the serializer for a structured
/// type) fail at construction with a configuration error, not at first use.
#[derive(Clone, Default)]
pub struct CacheSettings {
    default_ttl: Option<Duration>,
    default_refresh: bool,
    version: Option<String>,
    root: Option<String>,
    store: Option<Arc<dyn KeyValueStore>>,
    serializer: Option<Arc<dyn SerializationAdapter>>,
}

impl CacheSettings {
    /// Creates empty settings.
    pub fn new() -> Self {
        Self::default()
    }

    // == Builders ==
    /// Default time-to-live for caches built without an explicit TTL.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Default refresh-on-access flag.
    pub fn with_refresh_on_access(mut self, refresh: bool) -> Self {
        self.default_refresh = refresh;
        self
    }

    /// Deployment version segment included in every built key, letting
    /// incompatible payload schemas coexist in one store.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Root key prefix for remote tiers. Defaults to [`DEFAULT_ROOT`].
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// The backing key-value store remote tiers write to.
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// The serialization strategy for structured values.
    pub fn with_serializer(mut self, serializer: Arc<dyn SerializationAdapter>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    // == Accessors ==
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    pub fn default_refresh(&self) -> bool {
        self.default_refresh
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn root(&self) -> &str {
        self.root.as_deref().unwrap_or(DEFAULT_ROOT)
    }

    pub fn store(&self) -> Option<&Arc<dyn KeyValueStore>> {
        self.store.as_ref()
    }

    pub fn serializer(&self) -> Option<&Arc<dyn SerializationAdapter>> {
        self.serializer.as_ref()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::JsonAdapter;

    #[test]
    fn test_settings_default() {
        let settings = CacheSettings::new();

        assert_eq!(settings.default_ttl(), None);
        assert!(!settings.default_refresh());
        assert_eq!(settings.version(), None);
        assert_eq!(settings.root(), DEFAULT_ROOT);
        assert!(settings.store().is_none());
        assert!(settings.serializer().is_none());
    }

    #[test]
    fn test_settings_builders() {
        let settings = CacheSettings::new()
            .with_default_ttl(Duration::from_secs(300))
            .with_refresh_on_access(true)
            .with_version("v2")
            .with_root("app:cache")
            .with_serializer(Arc::new(JsonAdapter));

        assert_eq!(settings.default_ttl(), Some(Duration::from_secs(300)));
        assert!(settings.default_refresh());
        assert_eq!(settings.version(), Some("v2"));
        assert_eq!(settings.root(), "app:cache");
        assert!(settings.serializer().is_some());
    }
}
