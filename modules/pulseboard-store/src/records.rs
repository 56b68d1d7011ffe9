//! Durable record stores fed by the publish stage.
//!
//! Both stores expose a single `upsert`: insert-or-overwrite by primary
//! key, idempotent by construction. Re-publishing a batch rewrites the
//! same rows instead of duplicating them.

use async_trait::async_trait;

use pulseboard_common::{KeyPhraseRecord, PostRecord};

use crate::error::Result;

/// Primary post table, keyed by `(title, created_utc)`.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn upsert(&self, record: &PostRecord) -> Result<()>;
}

/// Key-phrase table, keyed by `(post_id, created_utc)`.
#[async_trait]
pub trait KeyPhraseStore: Send + Sync {
    async fn upsert(&self, record: &KeyPhraseRecord) -> Result<()>;
}
