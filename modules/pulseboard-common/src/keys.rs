//! Object-key naming and marker conventions for the pipeline.
//!
//! The key patterns are load-bearing: the sentiment stage selects raw
//! batches by pattern and the publish stage lists under the processed
//! prefix. Changing either breaks discovery over existing artifacts.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Source tag baked into batch keys when no override is configured.
pub const DEFAULT_SOURCE: &str = "reddit";

/// Second-resolution timestamp used in batch keys.
pub const TIMESTAMP_FMT: &str = "%Y-%m-%d_%H-%M-%S";

/// Key namespace for enriched batches.
pub const PROCESSED_PREFIX: &str = "processed/";

// --- Markers ---
// Raw batches carry `processed=true` once the sentiment stage has consumed
// them; enriched batches carry `status=done` once published. Single flag
// per object per pipeline edge, monotonic, never versioned.

pub const MARKER_PROCESSED: &str = "processed";
pub const MARKER_PROCESSED_TRUE: &str = "true";
pub const MARKER_STATUS: &str = "status";
pub const MARKER_STATUS_DONE: &str = "done";

/// Key for a raw batch captured at `at`: `raw_<source>_<timestamp>.json`.
pub fn raw_batch_key(source: &str, at: DateTime<Utc>) -> String {
    format!("raw_{}_{}.json", source, at.format(TIMESTAMP_FMT))
}

/// Key for an enriched batch written at `at`:
/// `processed/<source>_sentiment_<timestamp>.json`.
pub fn enriched_batch_key(source: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}{}_sentiment_{}.json",
        PROCESSED_PREFIX,
        source,
        at.format(TIMESTAMP_FMT)
    )
}

/// Capture time recovered from a raw batch key.
///
/// The enriched batch inherits this timestamp, so every raw batch maps to
/// its own enriched key even when several are scored in the same second.
pub fn raw_batch_timestamp(key: &str) -> Option<DateTime<Utc>> {
    // Rendered length of TIMESTAMP_FMT, e.g. "2025-03-14_09-26-53".
    const TIMESTAMP_LEN: usize = 19;

    let stem = key.strip_suffix(".json")?;
    let ts = stem.get(stem.len().checked_sub(TIMESTAMP_LEN)?..)?;
    NaiveDateTime::parse_from_str(ts, TIMESTAMP_FMT)
        .ok()
        .map(|dt| dt.and_utc())
}

/// Whether a listed key is a raw batch eligible for the sentiment stage:
/// a `.json` object outside the processed namespace.
pub fn is_raw_batch_key(key: &str) -> bool {
    key.ends_with(".json") && !key.contains("processed")
}
