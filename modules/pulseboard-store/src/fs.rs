//! Filesystem backends.
//!
//! Object layout mirrors the key namespace: `processed/x.json` lives at
//! `<root>/processed/x.json`, with metadata in a `<path>.meta.json`
//! sidecar so marker writes never touch content bytes. Record stores
//! write one JSON file per primary key; the file name is derived from a
//! content hash of the key, so re-upserting overwrites in place.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::debug;

use pulseboard_common::{KeyPhraseRecord, PostRecord};

use crate::error::{Result, StoreError};
use crate::object::{ObjectMeta, ObjectStore};
use crate::records::{KeyPhraseStore, PostStore};

const META_SUFFIX: &str = ".meta.json";

// ---------------------------------------------------------------------------
// FsObjectStore
// ---------------------------------------------------------------------------

pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || key.starts_with('/')
            || key.split('/').any(|part| part.is_empty() || part == "..")
        {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }

    fn meta_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(META_SUFFIX);
        PathBuf::from(name)
    }

    async fn read_meta(path: &Path) -> Result<ObjectMeta> {
        let meta_path = Self::meta_path(path);
        match tokio::fs::read(&meta_path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ObjectMeta::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_meta(path: &Path, meta: &ObjectMeta) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(meta)?;
        tokio::fs::write(Self::meta_path(path), bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(e) => e,
                // A store nobody has written to yet lists as empty.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Ok(rel) = path.strip_prefix(&self.root) else {
                    continue;
                };
                let key = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                if key.ends_with(META_SUFFIX) {
                    continue;
                }
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<(Vec<u8>, ObjectMeta)> {
        let path = self.path_for(key)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let meta = Self::read_meta(&path).await?;
        Ok((bytes, meta))
    }

    async fn head(&self, key: &str) -> Result<ObjectMeta> {
        let path = self.path_for(key)?;
        if !tokio::fs::try_exists(&path).await? {
            return Err(StoreError::NotFound(key.to_string()));
        }
        Self::read_meta(&path).await
    }

    async fn put(&self, key: &str, bytes: &[u8], meta: ObjectMeta) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Self::write_meta(&path, &meta).await?;
        debug!(key, size = bytes.len(), "object written");
        Ok(())
    }

    async fn replace_meta(&self, key: &str, meta: ObjectMeta) -> Result<()> {
        let path = self.path_for(key)?;
        if !tokio::fs::try_exists(&path).await? {
            return Err(StoreError::NotFound(key.to_string()));
        }
        Self::write_meta(&path, &meta).await?;
        debug!(key, "object metadata replaced");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FsPostStore / FsKeyPhraseStore
// ---------------------------------------------------------------------------

pub struct FsPostStore {
    dir: PathBuf,
}

impl FsPostStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl PostStore for FsPostStore {
    async fn upsert(&self, record: &PostRecord) -> Result<()> {
        let name = row_file_name(&record.title, &record.created_utc.to_bits().to_string());
        write_row(&self.dir, &name, record).await
    }
}

pub struct FsKeyPhraseStore {
    dir: PathBuf,
}

impl FsKeyPhraseStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl KeyPhraseStore for FsKeyPhraseStore {
    async fn upsert(&self, record: &KeyPhraseRecord) -> Result<()> {
        let name = row_file_name(&record.post_id, &record.created_utc.to_string());
        write_row(&self.dir, &name, record).await
    }
}

/// Deterministic file name for a row: hashed id keeps arbitrary titles
/// filesystem-safe, the timestamp component keeps the composite key.
fn row_file_name(id: &str, ts: &str) -> String {
    let digest = Sha256::digest(id.as_bytes());
    let short: String = digest[..8].iter().map(|b| format!("{b:02x}")).collect();
    format!("{short}_{ts}.json")
}

async fn write_row<T: serde::Serialize>(dir: &Path, name: &str, row: &T) -> Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    let bytes = serde_json::to_vec_pretty(row)?;
    tokio::fs::write(dir.join(name), bytes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_round_trip_with_meta() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(tmp.path());

        let meta = ObjectMeta::new().with("processed", "true");
        store.put("processed/a.json", b"[1,2]", meta).await.unwrap();

        let (bytes, meta) = store.get("processed/a.json").await.unwrap();
        assert_eq!(bytes, b"[1,2]");
        assert!(meta.is("processed", "true"));
    }

    #[tokio::test]
    async fn list_skips_meta_sidecars_and_respects_prefix() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(tmp.path());

        store.put("raw_reddit_1.json", b"[]", ObjectMeta::new()).await.unwrap();
        store
            .put("processed/reddit_sentiment_1.json", b"[]", ObjectMeta::new())
            .await
            .unwrap();

        let all = store.list("").await.unwrap();
        assert_eq!(
            all,
            vec!["processed/reddit_sentiment_1.json", "raw_reddit_1.json"]
        );

        let processed = store.list("processed/").await.unwrap();
        assert_eq!(processed, vec!["processed/reddit_sentiment_1.json"]);
    }

    #[tokio::test]
    async fn list_on_empty_root_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(tmp.path().join("never-written"));
        assert!(store.list("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_meta_keeps_content_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(tmp.path());

        store.put("raw.json", b"original", ObjectMeta::new()).await.unwrap();
        store
            .replace_meta("raw.json", ObjectMeta::new().with("processed", "true"))
            .await
            .unwrap();

        let (bytes, meta) = store.get("raw.json").await.unwrap();
        assert_eq!(bytes, b"original");
        assert!(meta.is("processed", "true"));
    }

    #[tokio::test]
    async fn head_reads_meta_without_content() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(tmp.path());

        store
            .put("x.json", b"[]", ObjectMeta::new().with("status", "done"))
            .await
            .unwrap();
        let meta = store.head("x.json").await.unwrap();
        assert!(meta.is("status", "done"));

        assert!(matches!(
            store.head("missing.json").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn traversal_keys_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(tmp.path());
        let err = store.get("../outside.json").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn record_upsert_is_idempotent_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsPostStore::new(tmp.path().join("posts"));

        let record = PostRecord {
            title: "A title / with: odd chars?".into(),
            created_utc: 1700000000.5,
            score: 10,
            num_comments: 4,
            subreddit: "rust".into(),
            url: "https://example.com".into(),
            positive_sentiment: 0.3,
            neutral_sentiment: 0.6,
            negative_sentiment: 0.1,
            compound_sentiment: 0.4,
        };

        store.upsert(&record).await.unwrap();
        store.upsert(&record).await.unwrap();

        let files: Vec<_> = std::fs::read_dir(tmp.path().join("posts"))
            .unwrap()
            .collect();
        assert_eq!(files.len(), 1);
    }
}
