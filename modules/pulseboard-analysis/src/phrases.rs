//! Key-phrase chunking and coarse sentiment labeling for post titles.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;

use pulseboard_common::{SentimentLabel, SentimentScores};

use crate::lexicon::LexiconScorer;
use crate::traits::{PhraseAnalyzer, SentimentScorer};

/// Compound cutoff below which a text counts as neutral either way.
const NEUTRAL_BAND: f64 = 0.05;

/// Minimum pos and neg proportion for the Mixed label: the text must carry
/// real evidence in both directions, not a single stray word.
const MIXED_EVIDENCE: f64 = 0.12;

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "than", "so", "of", "in", "on", "at",
    "to", "for", "from", "by", "with", "about", "as", "is", "are", "was", "were", "be", "been",
    "being", "it", "its", "this", "that", "these", "those", "i", "you", "he", "she", "we",
    "they", "my", "your", "his", "her", "our", "their", "me", "him", "them", "us", "what",
    "which", "who", "whom", "how", "when", "where", "why", "will", "would", "can", "could",
    "should", "has", "have", "had", "do", "does", "did", "not", "no", "just", "very", "after",
    "before", "over", "under", "into", "out", "up", "down",
];

/// Splits a title into stopword-delimited phrase chunks and labels it with
/// one coarse sentiment tag derived from the lexicon scorer.
pub struct TitleAnalyzer {
    scorer: LexiconScorer,
    stopwords: HashSet<&'static str>,
}

impl Default for TitleAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleAnalyzer {
    pub fn new() -> Self {
        Self {
            scorer: LexiconScorer::new(),
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    /// Consecutive non-stopword tokens form one phrase, in text order.
    /// Original casing is kept; duplicates are dropped.
    fn extract_phrases(&self, text: &str) -> Vec<String> {
        let mut phrases = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        let mut flush = |current: &mut Vec<&str>, phrases: &mut Vec<String>| {
            if current.is_empty() {
                return;
            }
            let phrase = current.join(" ");
            current.clear();
            if seen.insert(phrase.to_lowercase()) {
                phrases.push(phrase);
            }
        };

        for word in text.split(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-') {
            let word = word.trim_matches('\'');
            if word.is_empty() {
                continue;
            }
            if self.stopwords.contains(word.to_lowercase().as_str()) {
                flush(&mut current, &mut phrases);
            } else {
                current.push(word);
            }
        }
        flush(&mut current, &mut phrases);

        phrases
    }
}

#[async_trait]
impl PhraseAnalyzer for TitleAnalyzer {
    async fn analyze(&self, text: &str) -> Result<(Vec<String>, SentimentLabel)> {
        let phrases = self.extract_phrases(text);
        let scores = self.scorer.score(text).await?;
        Ok((phrases, label_from_scores(&scores)))
    }
}

/// Coarse label from numeric scores. Mixed wins when both polarities carry
/// real evidence; otherwise the compound score decides.
pub fn label_from_scores(scores: &SentimentScores) -> SentimentLabel {
    if scores.pos >= MIXED_EVIDENCE && scores.neg >= MIXED_EVIDENCE {
        SentimentLabel::Mixed
    } else if scores.compound >= NEUTRAL_BAND {
        SentimentLabel::Positive
    } else if scores.compound <= -NEUTRAL_BAND {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
