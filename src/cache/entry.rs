//! Cache Entry Module
//!
//! Defines the timestamped value held by the memory tier.

use std::time::Instant;

use crate::ttl::TtlPolicy;

// == Cache Entry ==
/// A value together with the moment it was last touched.
///
/// Owned exclusively by the memory tier that created it: replaced wholesale
/// on `put`, mutated only by [`CacheEntry::refresh`], destroyed on
/// invalidation or a garbage-collection sweep.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the entry was created or last refreshed
    last_touched: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry touched now.
    pub fn new(value: V) -> Self {
        Self {
            value,
            last_touched: Instant::now(),
        }
    }

    // == Refresh ==
    /// Resets the expiry clock.
    pub fn refresh(&mut self) {
        self.last_touched = Instant::now();
    }

    // == Expiry ==
    /// Checks the entry against a TTL policy.
    pub fn is_expired(&self, policy: &TtlPolicy) -> bool {
        policy.is_expired(self.last_touched)
    }
}
