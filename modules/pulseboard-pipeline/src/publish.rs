//! Stage 3: publish scored batches to the durable record stores.
//!
//! For each enriched batch not yet marked done: upsert one `PostRecord`
//! per post into the primary store, analyze the title and upsert one
//! `KeyPhraseRecord` into the key-phrase store, then mark the batch
//! `status=done`. Records missing a title or creation timestamp are
//! skipped individually. Per-record failures do not stop the remaining
//! records, and the batch is marked done regardless; a record that failed
//! after its batch is marked is never retried. The report counts those
//! failures so the scheduler can see them.
//!
//! A batch whose metadata or content cannot be read is skipped without
//! marking and stays eligible for the next invocation.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use pulseboard_analysis::PhraseAnalyzer;
use pulseboard_common::{
    keys, KeyPhraseRecord, PostRecord, PulseboardError, RawPost, ScoredPost, SentimentScores,
};
use pulseboard_store::{KeyPhraseStore, ObjectMeta, ObjectStore, PostStore};

use crate::discovery::Discovery;

#[derive(Debug, Default)]
pub struct PublishReport {
    pub objects_published: u32,
    pub objects_skipped: u32,
    pub objects_failed: u32,
    pub records_upserted: u32,
    pub records_skipped: u32,
    pub records_failed: u32,
}

impl std::fmt::Display for PublishReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Publish Stage Complete ===")?;
        writeln!(f, "Batches published: {}", self.objects_published)?;
        writeln!(f, "Batches skipped:   {} (already done)", self.objects_skipped)?;
        writeln!(f, "Batches failed:    {}", self.objects_failed)?;
        writeln!(f, "Records upserted:  {}", self.records_upserted)?;
        writeln!(f, "Records skipped:   {} (malformed)", self.records_skipped)?;
        write!(f, "Records failed:    {}", self.records_failed)
    }
}

#[derive(Debug, Default)]
struct RecordCounts {
    upserted: u32,
    skipped: u32,
    failed: u32,
}

pub struct PublishStage {
    store: Arc<dyn ObjectStore>,
    posts: Arc<dyn PostStore>,
    phrases: Arc<dyn KeyPhraseStore>,
    analyzer: Arc<dyn PhraseAnalyzer>,
}

impl PublishStage {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        posts: Arc<dyn PostStore>,
        phrases: Arc<dyn KeyPhraseStore>,
        analyzer: Arc<dyn PhraseAnalyzer>,
    ) -> Self {
        Self {
            store,
            posts,
            phrases,
            analyzer,
        }
    }

    pub async fn run(&self) -> Result<PublishReport> {
        let work = Discovery::new(self.store.as_ref())
            .next_unprocessed(
                keys::PROCESSED_PREFIX,
                keys::MARKER_STATUS,
                keys::MARKER_STATUS_DONE,
            )
            .await?;

        let mut report = PublishReport {
            objects_skipped: work.already_done,
            objects_failed: work.unreadable,
            ..Default::default()
        };

        if work.eligible.is_empty() {
            info!("publish: no batches to publish");
            return Ok(report);
        }

        for key in work.eligible {
            match self.publish_object(&key).await {
                Ok(counts) => {
                    report.objects_published += 1;
                    report.records_upserted += counts.upserted;
                    report.records_skipped += counts.skipped;
                    report.records_failed += counts.failed;
                }
                Err(e) => {
                    // Batch stays unmarked and is retried next run.
                    warn!(key, error = %e, "publish: batch failed");
                    report.objects_failed += 1;
                }
            }
        }

        info!(
            published = report.objects_published,
            records = report.records_upserted,
            failed_records = report.records_failed,
            "publish: pass complete"
        );
        Ok(report)
    }

    async fn publish_object(&self, key: &str) -> Result<RecordCounts> {
        let (bytes, _meta) = self.store.get(key).await?;
        let records: Vec<serde_json::Value> =
            serde_json::from_slice(&bytes).context("enriched batch is not a JSON array")?;

        info!(key, records = records.len(), "publish: batch read");

        let mut counts = RecordCounts::default();
        for value in &records {
            match parse_record(value) {
                Ok(post) => self.publish_record(key, &post, &mut counts).await,
                Err(e) => {
                    warn!(key, error = %e, "publish: record skipped");
                    counts.skipped += 1;
                }
            }
        }

        // Marked done even when some records failed above. Documented
        // behavior: those records are never retried once the batch is
        // marked, and the report carries the failure count.
        self.store
            .replace_meta(
                key,
                ObjectMeta::new().with(keys::MARKER_STATUS, keys::MARKER_STATUS_DONE),
            )
            .await?;

        info!(key, upserted = counts.upserted, "publish: batch done");
        Ok(counts)
    }

    async fn publish_record(&self, key: &str, post: &ScoredPost, counts: &mut RecordCounts) {
        if let Err(e) = self.posts.upsert(&PostRecord::from(post)).await {
            warn!(key, title = post.post.title, error = %e, "publish: post upsert failed");
            counts.failed += 1;
            return;
        }

        let title = post.post.title.trim().to_string();
        let (key_phrases, sentiment) = match self.analyzer.analyze(&title).await {
            Ok(out) => out,
            Err(e) => {
                warn!(key, title, error = %e, "publish: analysis failed");
                counts.failed += 1;
                return;
            }
        };

        let phrase_record = KeyPhraseRecord {
            post_id: title.clone(),
            created_utc: post.post.created_utc as i64,
            title,
            key_phrases,
            sentiment,
        };
        if let Err(e) = self.phrases.upsert(&phrase_record).await {
            warn!(key, error = %e, "publish: key-phrase upsert failed");
            counts.failed += 1;
            return;
        }

        counts.upserted += 1;
    }
}

/// Lenient per-record parse: title and created_utc are required, every
/// other field falls back to a default. One malformed record must not
/// fail its siblings, so the strict typed parse happens per record, not
/// per batch.
fn parse_record(value: &serde_json::Value) -> std::result::Result<ScoredPost, PulseboardError> {
    let title = value
        .get("title")
        .and_then(|v| v.as_str())
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| PulseboardError::MalformedRecord("missing title".into()))?;
    let created_utc = value
        .get("created_utc")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| PulseboardError::MalformedRecord("missing created_utc".into()))?;

    let get_f64 = |field: &str| value.get(field).and_then(|v| v.as_f64()).unwrap_or(0.0);
    let get_i64 = |field: &str| value.get(field).and_then(|v| v.as_i64()).unwrap_or(0);
    let get_str = |field: &str| {
        value
            .get(field)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    Ok(ScoredPost {
        post: RawPost {
            title: title.to_string(),
            score: get_i64("score"),
            url: get_str("url"),
            num_comments: get_i64("num_comments"),
            created_utc,
            subreddit: get_str("subreddit"),
        },
        scores: SentimentScores {
            pos: get_f64("pos"),
            neu: get_f64("neu"),
            neg: get_f64("neg"),
            compound: get_f64("compound"),
        },
    })
}
