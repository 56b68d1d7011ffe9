use anyhow::Result;
use async_trait::async_trait;

use pulseboard_common::{SentimentLabel, SentimentScores};

// =============================================================================
// Sentiment Scorer Trait
// =============================================================================

/// Text in, four bounded scores out. The sentiment stage depends only on
/// this seam, so the scoring backend is swappable.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    async fn score(&self, text: &str) -> Result<SentimentScores>;
}

// =============================================================================
// Phrase Analyzer Trait
// =============================================================================

/// Text in, ordered key phrases plus one coarse label out. Used by the
/// publish stage on post titles.
#[async_trait]
pub trait PhraseAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<(Vec<String>, SentimentLabel)>;
}
