//! Strata - a tiered TTL caching library
//!
//! Store, retrieve and expire values behind one uniform contract while
//! choosing among interchangeable tiers: an in-process memory tier, a
//! remote key-value tier, and a composite burst tier that fans writes
//! across a fast and a slow cache.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use strata_cache::{CacheExt, CacheSettings, InMemoryStore, JsonAdapter, Strata};
//!
//! # async fn example() -> strata_cache::Result<()> {
//! let strata = Strata::new(
//!     CacheSettings::new()
//!         .with_default_ttl(Duration::from_secs(300))
//!         .with_store(Arc::new(InMemoryStore::new()))
//!         .with_serializer(Arc::new(JsonAdapter)),
//! );
//!
//! let names = strata.memory_cache::<String>()?;
//! let name = names
//!     .get_or_cache("user:42", async { Some("alice".to_string()) })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod serialize;
pub mod store;
pub mod strata;
pub mod tasks;
pub mod ttl;

pub use cache::{
    BurstCache, Cache, CacheEntry, CacheExt, Decoded, MemoryCache, PrimitiveCodec,
    PrimitiveValue, RemoteCache, SerdeCodec, ValueCodec,
};
pub use config::CacheSettings;
pub use error::{CacheError, Result};
pub use key::KeyNamespace;
pub use serialize::{JsonAdapter, SerializationAdapter, SerializeError};
pub use store::{InMemoryStore, KeyValueStore};
pub use strata::Strata;
pub use tasks::gc;
pub use ttl::TtlPolicy;
