//! Lightweight lexicon-based AI-text classifier
//!
//! Counts stock phrases that are over-represented in machine-generated prose
//! and maps their density to an AI probability. Used when no model weights
//! are available (offline demos, benchmarks); it is a heuristic, not a
//! detector.

use crate::classifier::{default_label, ClassificationMetadata, ClassificationResult, Classifier};
use aho_corasick::{AhoCorasick, MatchKind};
use std::time::Instant;
use veritext_core::{Error, Result};

const STOCK_PHRASES: &[&str] = &[
    "delve",
    "tapestry",
    "testament to",
    "in conclusion",
    "furthermore",
    "moreover",
    "additionally",
    "it is important to note",
    "it's important to note",
    "plays a crucial role",
    "crucial",
    "pivotal",
    "multifaceted",
    "navigate the complexities",
    "in today's fast-paced world",
    "ever-evolving",
    "landscape",
    "foster",
    "leverage",
    "seamless",
    "robust",
    "holistic",
    "underscore",
    "meaningful change",
    "most importantly",
];

/// Phrase hits per 100 words at which the probability crosses 0.5
const DENSITY_MIDPOINT: f32 = 1.5;
const DENSITY_SLOPE: f32 = 1.2;

pub struct LexiconClassifier {
    name: String,
    phrases: AhoCorasick,
}

impl LexiconClassifier {
    pub fn new() -> Result<Self> {
        Self::with_name("lexicon")
    }

    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        let phrases = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(STOCK_PHRASES)
            .map_err(|e| {
                Error::classifier(format!("Failed to build stock phrase matcher: {e}"))
            })?;

        Ok(Self {
            name: name.into(),
            phrases,
        })
    }

    /// AI probability for `text` from stock-phrase density
    pub fn ai_probability(&self, text: &str) -> f32 {
        let words = text.split_whitespace().count();
        if words == 0 {
            return 0.0;
        }

        let hits = self.phrases.find_iter(text).count() as f32;
        let density = hits * 100.0 / words as f32;
        1.0 / (1.0 + (-(density - DENSITY_MIDPOINT) * DENSITY_SLOPE).exp())
    }
}

#[async_trait::async_trait]
impl Classifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();

        let ai = self.ai_probability(text);
        let (label, score) = if ai >= 0.5 {
            (default_label(1), ai)
        } else {
            (default_label(0), 1.0 - ai)
        };

        Ok(ClassificationResult {
            label,
            score,
            metadata: ClassificationMetadata {
                model: Some("stock-phrase-lexicon".to_string()),
                all_scores: Some(vec![(default_label(0), 1.0 - ai), (default_label(1), ai)]),
                tokens: None,
            },
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_text_is_human() {
        let classifier = LexiconClassifier::new().unwrap();
        let result = classifier
            .classify("we went to the shop and bought some bread and milk for the week")
            .await
            .unwrap();

        assert_eq!(result.label, "LABEL_0");
        assert!(result.score > 0.5);
    }

    #[tokio::test]
    async fn test_stock_phrases_are_ai() {
        let classifier = LexiconClassifier::new().unwrap();
        let text = "Furthermore, it is important to note that this pivotal and multifaceted \
                    tapestry plays a crucial role. In conclusion, we must delve deeper.";
        let result = classifier.classify(text).await.unwrap();

        assert_eq!(result.label, "LABEL_1");
        assert!(result.score > 0.9);
    }

    #[test]
    fn test_empty_text_has_zero_probability() {
        let classifier = LexiconClassifier::new().unwrap();
        assert_eq!(classifier.ai_probability("   "), 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        let classifier = LexiconClassifier::new().unwrap();
        assert_eq!(
            classifier.ai_probability("DELVE into it"),
            classifier.ai_probability("delve into it")
        );
    }
}
