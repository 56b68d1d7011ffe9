//! Work discovery over the object store.
//!
//! Stages poll the store for objects they have not yet consumed. The
//! list-and-filter policy lives here so stage logic stays a pure
//! read-enrich-write-mark loop. Two gates exist because the two pipeline
//! edges check their markers differently: raw batches are pattern-filtered
//! at listing time and marker-checked when their content is read, while
//! enriched batches are marker-checked up front with a metadata read per
//! candidate.

use tracing::warn;

use pulseboard_common::keys;
use pulseboard_store::{ObjectStore, Result};

pub struct Discovery<'a> {
    store: &'a dyn ObjectStore,
}

/// Outcome of a marker-gated listing pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DiscoveredWork {
    /// Keys whose marker is absent or not the done value, in listing order.
    pub eligible: Vec<String>,
    /// Keys already marked done.
    pub already_done: u32,
    /// Keys whose metadata could not be read. Left unmarked, so they stay
    /// eligible for the next invocation.
    pub unreadable: u32,
}

impl<'a> Discovery<'a> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self { store }
    }

    /// Candidate raw batches: every `.json` key outside the processed
    /// namespace. Markers are checked by the caller at content-read time,
    /// so an already-processed batch may still appear here.
    pub async fn raw_candidates(&self) -> Result<Vec<String>> {
        let keys = self.store.list("").await?;
        Ok(keys
            .into_iter()
            .filter(|k| keys::is_raw_batch_key(k))
            .collect())
    }

    /// Keys under `prefix` whose `marker` metadata is not `done_value`,
    /// determined by one metadata read per candidate.
    pub async fn next_unprocessed(
        &self,
        prefix: &str,
        marker: &str,
        done_value: &str,
    ) -> Result<DiscoveredWork> {
        let mut work = DiscoveredWork::default();

        for key in self.store.list(prefix).await? {
            match self.store.head(&key).await {
                Ok(meta) if meta.is(marker, done_value) => work.already_done += 1,
                Ok(_) => work.eligible.push(key),
                Err(e) => {
                    warn!(key, error = %e, "discovery: metadata read failed, skipping");
                    work.unreadable += 1;
                }
            }
        }

        Ok(work)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulseboard_store::{MemoryObjectStore, ObjectMeta};

    #[tokio::test]
    async fn raw_candidates_filter_by_pattern() {
        let store = MemoryObjectStore::new();
        store
            .put("raw_reddit_2025-01-01_00-00-00.json", b"[]", ObjectMeta::new())
            .await
            .unwrap();
        store
            .put(
                "processed/reddit_sentiment_2025-01-01_00-00-01.json",
                b"[]",
                ObjectMeta::new(),
            )
            .await
            .unwrap();
        store.put("readme.txt", b"hi", ObjectMeta::new()).await.unwrap();

        let candidates = Discovery::new(&store).raw_candidates().await.unwrap();
        assert_eq!(candidates, vec!["raw_reddit_2025-01-01_00-00-00.json"]);
    }

    #[tokio::test]
    async fn next_unprocessed_separates_done_from_eligible() {
        let store = MemoryObjectStore::new();
        store
            .put(
                "processed/a.json",
                b"[]",
                ObjectMeta::new().with("status", "done"),
            )
            .await
            .unwrap();
        store
            .put("processed/b.json", b"[]", ObjectMeta::new())
            .await
            .unwrap();

        let work = Discovery::new(&store)
            .next_unprocessed("processed/", "status", "done")
            .await
            .unwrap();

        assert_eq!(work.eligible, vec!["processed/b.json"]);
        assert_eq!(work.already_done, 1);
        assert_eq!(work.unreadable, 0);
    }
}
