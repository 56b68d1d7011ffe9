use serde::{Deserialize, Serialize};

// --- Post records ---

/// One post as captured from the source, before any enrichment.
///
/// Field names are the wire format of raw batch objects; existing
/// artifacts must keep parsing, so don't rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPost {
    pub title: String,
    pub score: i64,
    pub url: String,
    pub num_comments: i64,
    pub created_utc: f64,
    pub subreddit: String,
}

/// Per-text sentiment scores. `pos`/`neu`/`neg` are proportions in [0,1],
/// `compound` is the normalized aggregate in [-1,1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub pos: f64,
    pub neu: f64,
    pub neg: f64,
    pub compound: f64,
}

impl SentimentScores {
    pub fn neutral() -> Self {
        Self {
            pos: 0.0,
            neu: 1.0,
            neg: 0.0,
            compound: 0.0,
        }
    }

    /// All four fields within their documented ranges.
    pub fn is_bounded(&self) -> bool {
        (0.0..=1.0).contains(&self.pos)
            && (0.0..=1.0).contains(&self.neu)
            && (0.0..=1.0).contains(&self.neg)
            && (-1.0..=1.0).contains(&self.compound)
    }
}

/// A post after the sentiment stage: the raw fields plus the four score
/// fields, flattened into one JSON object (the enriched wire format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPost {
    #[serde(flatten)]
    pub post: RawPost,
    #[serde(flatten)]
    pub scores: SentimentScores,
}

// --- Coarse sentiment label ---

/// Single categorical tag, distinct from the numeric scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

// --- Durable store rows ---

/// Row shape for the primary post table, keyed by `(title, created_utc)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub title: String,
    pub created_utc: f64,
    pub score: i64,
    pub num_comments: i64,
    pub subreddit: String,
    pub url: String,
    pub positive_sentiment: f64,
    pub neutral_sentiment: f64,
    pub negative_sentiment: f64,
    pub compound_sentiment: f64,
}

impl From<&ScoredPost> for PostRecord {
    fn from(sp: &ScoredPost) -> Self {
        Self {
            title: sp.post.title.clone(),
            created_utc: sp.post.created_utc,
            score: sp.post.score,
            num_comments: sp.post.num_comments,
            subreddit: sp.post.subreddit.clone(),
            url: sp.post.url.clone(),
            positive_sentiment: sp.scores.pos,
            neutral_sentiment: sp.scores.neu,
            negative_sentiment: sp.scores.neg,
            compound_sentiment: sp.scores.compound,
        }
    }
}

/// Row shape for the key-phrase table, keyed by `(post_id, created_utc)`.
/// `post_id` is the post title; `created_utc` is truncated to whole seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPhraseRecord {
    pub post_id: String,
    pub created_utc: i64,
    pub title: String,
    pub key_phrases: Vec<String>,
    pub sentiment: SentimentLabel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scored_post_flattens_to_one_object() {
        let sp = ScoredPost {
            post: RawPost {
                title: "hello".into(),
                score: 42,
                url: "https://example.com".into(),
                num_comments: 7,
                created_utc: 1700000000.5,
                subreddit: "rust".into(),
            },
            scores: SentimentScores {
                pos: 0.2,
                neu: 0.7,
                neg: 0.1,
                compound: 0.3,
            },
        };

        let v = serde_json::to_value(&sp).unwrap();
        assert_eq!(v["title"], json!("hello"));
        assert_eq!(v["compound"], json!(0.3));
        assert!(v.get("post").is_none());
        assert!(v.get("scores").is_none());

        let back: ScoredPost = serde_json::from_value(v).unwrap();
        assert_eq!(back, sp);
    }

    #[test]
    fn sentiment_label_serializes_screaming_case() {
        assert_eq!(
            serde_json::to_string(&SentimentLabel::Mixed).unwrap(),
            "\"MIXED\""
        );
        let l: SentimentLabel = serde_json::from_str("\"NEUTRAL\"").unwrap();
        assert_eq!(l, SentimentLabel::Neutral);
    }

    #[test]
    fn bounded_scores_accepted() {
        assert!(SentimentScores::neutral().is_bounded());
        let bad = SentimentScores {
            pos: 1.2,
            neu: 0.0,
            neg: 0.0,
            compound: 0.0,
        };
        assert!(!bad.is_bounded());
    }
}
