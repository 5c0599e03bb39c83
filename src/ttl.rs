//! TTL Policy Module
//!
//! Defines the expiry rules carried by every cache tier: how long an entry
//! lives and whether an access resets its clock.

use std::time::{Duration, Instant};

use crate::error::{CacheError, Result};

// == TTL Policy ==
/// Immutable time-to-live configuration for a cache tier.
///
/// An entry is expired once strictly more than `ttl` has elapsed since it
/// was last touched. With `refresh_on_access` enabled, a successful read
/// counts as a touch and resets the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    ttl: Duration,
    refresh_on_access: bool,
}

impl TtlPolicy {
    // == Constructor ==
    /// Creates a new TTL policy.
    ///
    /// # Errors
    /// Returns [`CacheError::Config`] if `ttl` is zero.
    pub fn new(ttl: Duration, refresh_on_access: bool) -> Result<Self> {
        if ttl.is_zero() {
            return Err(CacheError::Config("ttl must be greater than zero".to_string()));
        }

        Ok(Self {
            ttl,
            refresh_on_access,
        })
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether a successful read resets the entry's expiry clock.
    pub fn refresh_on_access(&self) -> bool {
        self.refresh_on_access
    }

    // == Expiry Check ==
    /// Returns true if more than `ttl` has elapsed since `last_touched`.
    pub fn is_expired(&self, last_touched: Instant) -> bool {
        last_touched.elapsed() > self.ttl
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_policy_rejects_zero_ttl() {
        let result = TtlPolicy::new(Duration::ZERO, false);
        assert!(matches!(result, Err(CacheError::Config(_))));
    }

    #[test]
    fn test_policy_accessors() {
        let policy = TtlPolicy::new(Duration::from_secs(60), true).unwrap();
        assert_eq!(policy.ttl(), Duration::from_secs(60));
        assert!(policy.refresh_on_access());
    }

    #[test]
    fn test_not_expired_within_ttl() {
        let policy = TtlPolicy::new(Duration::from_secs(60), false).unwrap();
        assert!(!policy.is_expired(Instant::now()));
    }

    #[test]
    fn test_expired_after_ttl_elapses() {
        let policy = TtlPolicy::new(Duration::from_millis(20), false).unwrap();
        let touched = Instant::now();

        sleep(Duration::from_millis(40));

        assert!(policy.is_expired(touched));
    }
}
