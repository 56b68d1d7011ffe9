//! Valence-lexicon sentiment scorer.
//!
//! A compact rule-based scorer: each token carries a signed valence,
//! a negator within the preceding window flips the sign, and the
//! aggregate is squashed into [-1,1]. Proportional `pos`/`neu`/`neg`
//! outputs sum to 1 whenever the text contains any words.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use pulseboard_common::SentimentScores;

use crate::traits::SentimentScorer;

/// Squashing constant for the compound score. Larger values flatten the
/// curve, so short texts need stronger words to reach the extremes.
const NORMALIZATION_ALPHA: f64 = 15.0;

/// How many tokens back a negator still flips valence.
const NEGATION_WINDOW: usize = 3;

const NEGATORS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "cannot", "cant", "dont", "doesnt", "didnt", "isnt",
    "wasnt", "wont", "without",
];

pub struct LexiconScorer {
    valences: HashMap<&'static str, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            valences: default_lexicon(),
        }
    }

    fn score_sync(&self, text: &str) -> SentimentScores {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return SentimentScores::neutral();
        }

        let mut pos_sum = 0.0_f64;
        let mut neg_sum = 0.0_f64;
        let mut neu_count = 0.0_f64;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&valence) = self.valences.get(token.as_str()) else {
                if !NEGATORS.contains(&token.as_str()) {
                    neu_count += 1.0;
                }
                continue;
            };

            let negated = tokens[i.saturating_sub(NEGATION_WINDOW)..i]
                .iter()
                .any(|t| NEGATORS.contains(&t.as_str()));
            let valence = if negated { -valence } else { valence };

            if valence > 0.0 {
                pos_sum += valence;
            } else {
                neg_sum += -valence;
            }
        }

        let total = pos_sum + neg_sum + neu_count;
        if total == 0.0 {
            return SentimentScores::neutral();
        }

        let raw = pos_sum - neg_sum;
        let compound = raw / (raw * raw + NORMALIZATION_ALPHA).sqrt();

        SentimentScores {
            pos: pos_sum / total,
            neu: neu_count / total,
            neg: neg_sum / total,
            compound: compound.clamp(-1.0, 1.0),
        }
    }
}

#[async_trait]
impl SentimentScorer for LexiconScorer {
    async fn score(&self, text: &str) -> Result<SentimentScores> {
        Ok(self.score_sync(text))
    }
}

/// Lowercased alphanumeric tokens; apostrophes dropped so "don't"
/// matches the "dont" negator.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase().replace('\'', ""))
        .collect()
}

fn default_lexicon() -> HashMap<&'static str, f64> {
    let entries: &[(&str, f64)] = &[
        // Positive
        ("good", 1.9),
        ("great", 3.1),
        ("excellent", 2.7),
        ("amazing", 2.8),
        ("awesome", 3.1),
        ("love", 3.2),
        ("loved", 2.9),
        ("best", 3.2),
        ("better", 1.9),
        ("happy", 2.7),
        ("glad", 2.0),
        ("win", 2.8),
        ("wins", 2.7),
        ("won", 2.7),
        ("success", 2.7),
        ("successful", 2.7),
        ("beautiful", 2.9),
        ("brilliant", 2.8),
        ("fantastic", 2.6),
        ("wonderful", 2.7),
        ("helpful", 1.8),
        ("impressive", 2.3),
        ("perfect", 2.7),
        ("cool", 1.3),
        ("nice", 1.8),
        ("like", 1.5),
        ("likes", 1.5),
        ("enjoy", 2.0),
        ("fun", 2.3),
        ("thanks", 1.9),
        ("free", 1.2),
        ("improved", 1.8),
        ("breakthrough", 2.2),
        // Negative
        ("bad", -2.5),
        ("worst", -3.1),
        ("worse", -2.1),
        ("terrible", -2.7),
        ("horrible", -2.5),
        ("awful", -2.0),
        ("hate", -2.7),
        ("hated", -2.6),
        ("sad", -2.1),
        ("angry", -2.3),
        ("fail", -2.5),
        ("fails", -2.3),
        ("failed", -2.3),
        ("failure", -2.4),
        ("lose", -1.9),
        ("loses", -1.8),
        ("lost", -1.6),
        ("crisis", -2.4),
        ("death", -2.9),
        ("dead", -2.6),
        ("dies", -2.8),
        ("kill", -3.0),
        ("killed", -2.9),
        ("war", -2.9),
        ("attack", -2.1),
        ("broken", -1.8),
        ("scam", -2.6),
        ("fraud", -2.8),
        ("crash", -2.0),
        ("wrong", -2.1),
        ("problem", -1.7),
        ("problems", -1.7),
        ("ugly", -2.2),
        ("disaster", -3.1),
        ("disappointing", -2.2),
        ("scary", -2.2),
        ("fear", -2.2),
        ("ban", -2.0),
        ("banned", -2.0),
    ];
    entries.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn positive_text_scores_positive() {
        let scorer = LexiconScorer::new();
        let s = scorer.score("What a great and beautiful day").await.unwrap();
        assert!(s.compound > 0.05, "compound was {}", s.compound);
        assert!(s.pos > s.neg);
        assert!(s.is_bounded());
    }

    #[tokio::test]
    async fn negative_text_scores_negative() {
        let scorer = LexiconScorer::new();
        let s = scorer.score("This is a terrible disaster").await.unwrap();
        assert!(s.compound < -0.05, "compound was {}", s.compound);
        assert!(s.neg > s.pos);
        assert!(s.is_bounded());
    }

    #[tokio::test]
    async fn negation_flips_valence() {
        let scorer = LexiconScorer::new();
        let plain = scorer.score("this is good").await.unwrap();
        let negated = scorer.score("this is not good").await.unwrap();
        assert!(plain.compound > 0.0);
        assert!(negated.compound < 0.0);
    }

    #[tokio::test]
    async fn empty_and_neutral_text_are_neutral() {
        let scorer = LexiconScorer::new();
        let empty = scorer.score("").await.unwrap();
        assert_eq!(empty, SentimentScores::neutral());

        let neutral = scorer.score("the chair is next to the table").await.unwrap();
        assert_eq!(neutral.compound, 0.0);
        assert_eq!(neutral.neu, 1.0);
    }

    #[tokio::test]
    async fn proportions_sum_to_one() {
        let scorer = LexiconScorer::new();
        let s = scorer.score("good bad and plain words here").await.unwrap();
        let sum = s.pos + s.neu + s.neg;
        assert!((sum - 1.0).abs() < 1e-9, "sum was {sum}");
    }
}
