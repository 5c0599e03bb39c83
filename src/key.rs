//! Key Namespace Module
//!
//! Maps a logical cache name plus an optional deployment version and a
//! caller-supplied identifier onto a single storage key.

use crate::error::{CacheError, Result};

// == Key Namespace ==
/// Deterministic key builder for a keyed cache tier.
///
/// A built key takes the form `root:version:identifier`, with the version
/// segment omitted when no version is configured. The version segment lets
/// deployments with incompatible payload schemas coexist in one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNamespace {
    root: String,
    version: Option<String>,
}

impl KeyNamespace {
    // == Constructor ==
    /// Creates a new key namespace.
    ///
    /// # Errors
    /// Returns [`CacheError::Config`] if `root` is empty.
    pub fn new(root: impl Into<String>, version: Option<String>) -> Result<Self> {
        let root = root.into();
        if root.is_empty() {
            return Err(CacheError::Config("namespace root must not be empty".to_string()));
        }

        Ok(Self { root, version })
    }

    /// The namespace root.
    pub fn root(&self) -> &str {
        &self.root
    }

    // == Key Building ==
    /// Builds the storage key for an identifier.
    pub fn build(&self, identifier: &str) -> String {
        match &self.version {
            Some(version) => format!("{}:{}:{}", self.root, version, identifier),
            None => format!("{}:{}", self.root, identifier),
        }
    }

    /// Builds the wildcard pattern covering every key in this namespace.
    pub fn wildcard(&self) -> String {
        self.build("*")
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_version() {
        let namespace = KeyNamespace::new("cache", Some("v2".to_string())).unwrap();
        assert_eq!(namespace.build("user:42"), "cache:v2:user:42");
    }

    #[test]
    fn test_build_without_version() {
        let namespace = KeyNamespace::new("cache", None).unwrap();
        assert_eq!(namespace.build("user:42"), "cache:user:42");
    }

    #[test]
    fn test_wildcard_covers_namespace() {
        let namespace = KeyNamespace::new("app:session", Some("v1".to_string())).unwrap();
        assert_eq!(namespace.wildcard(), "app:session:v1:*");
    }

    #[test]
    fn test_empty_root_rejected() {
        let result = KeyNamespace::new("", None);
        assert!(matches!(result, Err(CacheError::Config(_))));
    }
}
