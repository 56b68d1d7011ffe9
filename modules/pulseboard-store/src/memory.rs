//! In-memory backends, used as test doubles and for local dry runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use pulseboard_common::{KeyPhraseRecord, PostRecord};

use crate::error::{Result, StoreError};
use crate::object::{ObjectMeta, ObjectStore};
use crate::records::{KeyPhraseStore, PostStore};

// ---------------------------------------------------------------------------
// MemoryObjectStore
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<String, (Vec<u8>, ObjectMeta)>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_count(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Raw content bytes for assertions; `None` when the key is absent.
    pub fn content_of(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .expect("lock poisoned")
            .get(key)
            .map(|(bytes, _)| bytes.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let objects = self.objects.read().expect("lock poisoned");
        Ok(objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn get(&self, key: &str) -> Result<(Vec<u8>, ObjectMeta)> {
        let objects = self.objects.read().expect("lock poisoned");
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn head(&self, key: &str) -> Result<ObjectMeta> {
        let objects = self.objects.read().expect("lock poisoned");
        objects
            .get(key)
            .map(|(_, meta)| meta.clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, bytes: &[u8], meta: ObjectMeta) -> Result<()> {
        let mut objects = self.objects.write().expect("lock poisoned");
        objects.insert(key.to_string(), (bytes.to_vec(), meta));
        Ok(())
    }

    async fn replace_meta(&self, key: &str, meta: ObjectMeta) -> Result<()> {
        let mut objects = self.objects.write().expect("lock poisoned");
        let entry = objects
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        entry.1 = meta;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryPostStore / MemoryKeyPhraseStore
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryPostStore {
    // f64 keys stored by bit pattern so the map key is hashable.
    rows: RwLock<HashMap<(String, u64), PostRecord>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, title: &str, created_utc: f64) -> Option<PostRecord> {
        self.rows
            .read()
            .expect("lock poisoned")
            .get(&(title.to_string(), created_utc.to_bits()))
            .cloned()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn upsert(&self, record: &PostRecord) -> Result<()> {
        let key = (record.title.clone(), record.created_utc.to_bits());
        self.rows
            .write()
            .expect("lock poisoned")
            .insert(key, record.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryKeyPhraseStore {
    rows: RwLock<HashMap<(String, i64), KeyPhraseRecord>>,
}

impl MemoryKeyPhraseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, post_id: &str, created_utc: i64) -> Option<KeyPhraseRecord> {
        self.rows
            .read()
            .expect("lock poisoned")
            .get(&(post_id.to_string(), created_utc))
            .cloned()
    }
}

#[async_trait]
impl KeyPhraseStore for MemoryKeyPhraseStore {
    async fn upsert(&self, record: &KeyPhraseRecord) -> Result<()> {
        let key = (record.post_id.clone(), record.created_utc);
        self.rows
            .write()
            .expect("lock poisoned")
            .insert(key, record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, created_utc: f64) -> PostRecord {
        PostRecord {
            title: title.to_string(),
            created_utc,
            score: 1,
            num_comments: 2,
            subreddit: "rust".into(),
            url: "https://example.com".into(),
            positive_sentiment: 0.1,
            neutral_sentiment: 0.8,
            negative_sentiment: 0.1,
            compound_sentiment: 0.0,
        }
    }

    #[tokio::test]
    async fn double_upsert_leaves_one_row() {
        let store = MemoryPostStore::new();
        store.upsert(&record("a", 1.0)).await.unwrap();
        store.upsert(&record("a", 1.0)).await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn upsert_overwrites_fields() {
        let store = MemoryPostStore::new();
        store.upsert(&record("a", 1.0)).await.unwrap();
        let mut updated = record("a", 1.0);
        updated.score = 99;
        store.upsert(&updated).await.unwrap();
        assert_eq!(store.get("a", 1.0).unwrap().score, 99);
    }

    #[tokio::test]
    async fn distinct_timestamps_are_distinct_rows() {
        let store = MemoryPostStore::new();
        store.upsert(&record("a", 1.0)).await.unwrap();
        store.upsert(&record("a", 2.0)).await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn object_store_replace_meta_preserves_content() {
        let store = MemoryObjectStore::new();
        store
            .put("raw_x.json", b"[]", ObjectMeta::new())
            .await
            .unwrap();
        store
            .replace_meta("raw_x.json", ObjectMeta::new().with("processed", "true"))
            .await
            .unwrap();

        let (bytes, meta) = store.get("raw_x.json").await.unwrap();
        assert_eq!(bytes, b"[]");
        assert!(meta.is("processed", "true"));
    }

    #[tokio::test]
    async fn replace_meta_on_missing_key_is_not_found() {
        let store = MemoryObjectStore::new();
        let err = store
            .replace_meta("nope.json", ObjectMeta::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_filters_by_prefix_in_order() {
        let store = MemoryObjectStore::new();
        store.put("b.json", b"1", ObjectMeta::new()).await.unwrap();
        store
            .put("processed/a.json", b"2", ObjectMeta::new())
            .await
            .unwrap();
        store.put("a.json", b"3", ObjectMeta::new()).await.unwrap();

        assert_eq!(
            store.list("").await.unwrap(),
            vec!["a.json", "b.json", "processed/a.json"]
        );
        assert_eq!(store.list("processed/").await.unwrap(), vec!["processed/a.json"]);
    }
}
