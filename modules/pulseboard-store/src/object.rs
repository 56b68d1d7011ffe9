//! ObjectStore — the pipeline's sole coordination point.
//!
//! Batch artifacts are immutable blobs; progress markers live in the
//! metadata attached to each object, never in the content bytes.
//! `replace_meta` is the only mutation allowed on an existing object.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// String key/value metadata attached to an object out-of-band from its
/// content. Carries the pipeline's progress markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta(BTreeMap<String, String>);

impl ObjectMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style entry insertion.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether `key` is present with exactly `value`.
    pub fn is(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Opaque key/value + scan surface over batch objects.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// All keys starting with `prefix`, in lexicographic order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Content bytes plus attached metadata.
    async fn get(&self, key: &str) -> Result<(Vec<u8>, ObjectMeta)>;

    /// Metadata only, without reading content.
    async fn head(&self, key: &str) -> Result<ObjectMeta>;

    /// Write a new object (or overwrite an existing key) with metadata.
    async fn put(&self, key: &str, bytes: &[u8], meta: ObjectMeta) -> Result<()>;

    /// Replace an existing object's metadata, preserving its content bytes.
    async fn replace_meta(&self, key: &str, meta: ObjectMeta) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_builder_and_lookup() {
        let meta = ObjectMeta::new().with("processed", "true");
        assert!(meta.is("processed", "true"));
        assert!(!meta.is("processed", "false"));
        assert!(!meta.is("status", "done"));
        assert_eq!(meta.get("missing"), None);
    }

    #[test]
    fn meta_round_trips_through_json() {
        let meta = ObjectMeta::new().with("status", "done").with("source", "reddit");
        let json = serde_json::to_string(&meta).unwrap();
        let back: ObjectMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }
}
