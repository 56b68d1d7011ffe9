//! Stage 2: sentiment enrichment of raw batches.
//!
//! Selects raw batches whose `processed` marker is absent, scores every
//! post title, writes the augmented batch under the processed namespace
//! (marked at creation), then marks the source batch. The source marker is
//! written last: a crash between the two writes leaves the raw batch
//! eligible for retry, which can duplicate an enriched object but never
//! lose one. Two overlapping invocations over the same unmarked batch can
//! both enrich it for the same reason; there is no lock and no conditional
//! write on the marker.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use pulseboard_analysis::SentimentScorer;
use pulseboard_common::{keys, RawPost, ScoredPost};
use pulseboard_store::{ObjectMeta, ObjectStore};

use crate::discovery::Discovery;

#[derive(Debug, Default)]
pub struct ScoreReport {
    pub objects_found: u32,
    pub objects_scored: u32,
    pub objects_skipped: u32,
    pub objects_failed: u32,
    pub posts_scored: u32,
}

impl std::fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.objects_found == 0 {
            return write!(f, "No raw batches found");
        }
        writeln!(f, "=== Sentiment Stage Complete ===")?;
        writeln!(f, "Batches found:   {}", self.objects_found)?;
        writeln!(f, "Batches scored:  {}", self.objects_scored)?;
        writeln!(f, "Batches skipped: {} (already processed)", self.objects_skipped)?;
        writeln!(f, "Batches failed:  {}", self.objects_failed)?;
        write!(f, "Posts scored:    {}", self.posts_scored)
    }
}

enum Outcome {
    Scored(usize),
    AlreadyProcessed,
}

pub struct SentimentStage {
    store: Arc<dyn ObjectStore>,
    scorer: Arc<dyn SentimentScorer>,
    source_tag: String,
}

impl SentimentStage {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        scorer: Arc<dyn SentimentScorer>,
        source_tag: impl Into<String>,
    ) -> Self {
        Self {
            store,
            scorer,
            source_tag: source_tag.into(),
        }
    }

    /// One polling pass over all raw batches. Per-object failures are
    /// logged and the pass continues; re-invocation with no new batches
    /// is a no-op.
    pub async fn run(&self) -> Result<ScoreReport> {
        let candidates = Discovery::new(self.store.as_ref()).raw_candidates().await?;

        let mut report = ScoreReport {
            objects_found: candidates.len() as u32,
            ..Default::default()
        };
        if candidates.is_empty() {
            info!("sentiment: no raw batches found");
            return Ok(report);
        }

        for key in candidates {
            match self.score_object(&key).await {
                Ok(Outcome::Scored(posts)) => {
                    report.objects_scored += 1;
                    report.posts_scored += posts as u32;
                }
                Ok(Outcome::AlreadyProcessed) => {
                    report.objects_skipped += 1;
                }
                Err(e) => {
                    warn!(key, error = %e, "sentiment: batch failed");
                    report.objects_failed += 1;
                }
            }
        }

        info!(
            scored = report.objects_scored,
            skipped = report.objects_skipped,
            failed = report.objects_failed,
            "sentiment: pass complete"
        );
        Ok(report)
    }

    async fn score_object(&self, key: &str) -> Result<Outcome> {
        let (bytes, meta) = self.store.get(key).await?;
        if meta.is(keys::MARKER_PROCESSED, keys::MARKER_PROCESSED_TRUE) {
            info!(key, "sentiment: skipping already processed batch");
            return Ok(Outcome::AlreadyProcessed);
        }

        let posts: Vec<RawPost> =
            serde_json::from_slice(&bytes).context("raw batch is not a post array")?;

        let mut scored = Vec::with_capacity(posts.len());
        for post in posts {
            let scores = self.scorer.score(&post.title).await?;
            scored.push(ScoredPost { post, scores });
        }

        // The enriched key inherits the raw batch's capture timestamp:
        // deriving it from the clock collides when two batches are scored
        // in the same second, and the later write would shadow the earlier
        // batch after both sources were already marked.
        let captured_at = keys::raw_batch_timestamp(key).unwrap_or_else(Utc::now);
        let enriched_key = keys::enriched_batch_key(&self.source_tag, captured_at);
        let body = serde_json::to_vec_pretty(&scored)?;
        self.store
            .put(
                &enriched_key,
                &body,
                ObjectMeta::new().with(keys::MARKER_PROCESSED, keys::MARKER_PROCESSED_TRUE),
            )
            .await?;

        self.store
            .replace_meta(
                key,
                ObjectMeta::new().with(keys::MARKER_PROCESSED, keys::MARKER_PROCESSED_TRUE),
            )
            .await?;

        info!(key, enriched_key, posts = scored.len(), "sentiment: batch scored");
        Ok(Outcome::Scored(scored.len()))
    }
}
