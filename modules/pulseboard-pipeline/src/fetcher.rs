//! Stage 1: capture a raw batch from the content source.
//!
//! One invocation writes exactly one immutable raw batch object, keyed by
//! the capture time at second resolution. Existing objects are never
//! touched. A source fetch error propagates and fails the invocation;
//! retrying is the scheduler's job.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use pulseboard_common::{keys, RawPost};
use pulseboard_store::{ObjectMeta, ObjectStore};
use reddit_client::RedditClient;

// =============================================================================
// Content Source Trait
// =============================================================================

/// The content-source capability: most-recent items in raw post shape.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_recent(&self, scope: &str, limit: u32) -> Result<Vec<RawPost>>;
}

/// Reddit-backed source: hot listing projected to `RawPost`.
pub struct RedditSource {
    client: RedditClient,
}

impl RedditSource {
    pub fn new(client: RedditClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentSource for RedditSource {
    async fn fetch_recent(&self, scope: &str, limit: u32) -> Result<Vec<RawPost>> {
        let raw = self.client.fetch_hot(scope, limit).await?;

        let posts = raw
            .into_iter()
            .filter_map(|p| {
                let title = p.title.unwrap_or_default();
                if title.trim().is_empty() {
                    return None;
                }
                Some(RawPost {
                    title,
                    score: p.score,
                    url: p.url.unwrap_or_default(),
                    num_comments: p.num_comments,
                    created_utc: p.created_utc,
                    subreddit: p.subreddit.unwrap_or_default(),
                })
            })
            .collect();

        Ok(posts)
    }
}

// =============================================================================
// Fetcher
// =============================================================================

#[derive(Debug)]
pub struct FetchReport {
    pub key: String,
    pub posts: usize,
}

impl std::fmt::Display for FetchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Captured {} posts into {}", self.posts, self.key)
    }
}

pub struct Fetcher {
    source: Box<dyn ContentSource>,
    store: Arc<dyn ObjectStore>,
    source_tag: String,
    scope: String,
    limit: u32,
}

impl Fetcher {
    pub fn new(
        source: Box<dyn ContentSource>,
        store: Arc<dyn ObjectStore>,
        source_tag: impl Into<String>,
        scope: impl Into<String>,
        limit: u32,
    ) -> Self {
        Self {
            source,
            store,
            source_tag: source_tag.into(),
            scope: scope.into(),
            limit,
        }
    }

    pub async fn run(&self) -> Result<FetchReport> {
        let posts = self.source.fetch_recent(&self.scope, self.limit).await?;

        let key = keys::raw_batch_key(&self.source_tag, Utc::now());
        let body = serde_json::to_vec_pretty(&posts)?;
        self.store.put(&key, &body, ObjectMeta::new()).await?;

        info!(key, posts = posts.len(), "fetch: raw batch written");
        Ok(FetchReport {
            key,
            posts: posts.len(),
        })
    }
}
