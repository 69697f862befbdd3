//! Label normalization and segment scoring

use std::sync::Arc;
use tracing::debug;
use veritext_classifiers::Classifier;
use veritext_core::{Error, Result};

pub const DEFAULT_AI_LABEL_SUFFIX: &str = "1";

/// Maps a classifier's (label, confidence) pair onto an AI probability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRule {
    ai_suffix: String,
}

impl LabelRule {
    pub fn new(ai_suffix: impl Into<String>) -> Self {
        Self {
            ai_suffix: ai_suffix.into(),
        }
    }

    pub fn is_ai(&self, label: &str) -> bool {
        label.ends_with(&self.ai_suffix)
    }

    /// AI label: the confidence itself; any other label: its complement
    pub fn normalize(&self, label: &str, confidence: f64) -> f64 {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };

        if self.is_ai(label) {
            confidence
        } else {
            1.0 - confidence
        }
    }
}

impl Default for LabelRule {
    fn default() -> Self {
        Self::new(DEFAULT_AI_LABEL_SUFFIX)
    }
}

/// Scores text through a classifier adapter
#[derive(Clone)]
pub struct SegmentScorer {
    classifier: Arc<dyn Classifier>,
    rule: LabelRule,
}

impl SegmentScorer {
    pub fn new(classifier: Arc<dyn Classifier>, rule: LabelRule) -> Self {
        Self { classifier, rule }
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn rule(&self) -> &LabelRule {
        &self.rule
    }

    /// AI probability of `text` in [0, 1]
    ///
    /// Every adapter error surfaces as [`Error::ClassificationFailure`].
    pub async fn score(&self, text: &str) -> Result<f64> {
        let result = self.classifier.classify(text).await.map_err(|e| match e {
            Error::ClassificationFailure(_) => e,
            other => Error::classifier(other.to_string()),
        })?;

        let score = self.rule.normalize(&result.label, widen(result.score));
        debug!(
            classifier = self.classifier.name(),
            label = %result.label,
            confidence = result.score,
            score,
            latency_us = result.latency_us,
            "Scored text"
        );

        Ok(score)
    }
}

/// Widen an `f32` confidence to the precision it actually carries
///
/// A plain cast turns 0.9 into 0.8999999762, which lands on the wrong side
/// of bucket and estimate boundaries.
fn widen(confidence: f32) -> f64 {
    (f64::from(confidence) * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritext_classifiers::ClassificationResult;

    struct Fixed(&'static str, f32);

    #[async_trait::async_trait]
    impl Classifier for Fixed {
        async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
            Ok(ClassificationResult::new(self.0, self.1))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct Broken;

    #[async_trait::async_trait]
    impl Classifier for Broken {
        async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
            Err(Error::model("weights missing"))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[test]
    fn test_normalize_by_label() {
        let rule = LabelRule::default();
        assert!((rule.normalize("LABEL_1", 0.8) - 0.8).abs() < 1e-12);
        assert!((rule.normalize("LABEL_0", 0.8) - 0.2).abs() < 1e-12);
        assert_eq!(rule.normalize("LABEL_0", 1.0), 0.0);
    }

    #[test]
    fn test_normalize_clamps_confidence() {
        let rule = LabelRule::default();
        assert_eq!(rule.normalize("LABEL_1", 1.3), 1.0);
        assert_eq!(rule.normalize("LABEL_1", -0.2), 0.0);
        assert_eq!(rule.normalize("LABEL_1", f64::NAN), 0.0);
    }

    #[test]
    fn test_custom_suffix() {
        let rule = LabelRule::new("ChatGPT");
        assert!(rule.is_ai("ChatGPT"));
        assert!(!rule.is_ai("Human"));
        assert!((rule.normalize("Human", 0.9) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_widen_keeps_decimal_value() {
        assert_eq!(widen(0.9), 0.9);
        assert_eq!(widen(0.7), 0.7);
        assert_eq!(widen(1.0), 1.0);
    }

    #[tokio::test]
    async fn test_score_through_classifier() {
        let scorer = SegmentScorer::new(Arc::new(Fixed("LABEL_0", 0.75)), LabelRule::default());
        let score = scorer.score("anything").await.unwrap();
        assert!((score - 0.25).abs() < 1e-6);
        assert_eq!(scorer.classifier_name(), "fixed");
    }

    #[tokio::test]
    async fn test_adapter_errors_become_classification_failures() {
        let scorer = SegmentScorer::new(Arc::new(Broken), LabelRule::default());
        let err = scorer.score("anything").await.unwrap_err();

        assert_eq!(err.kind(), "classification_failure");
        assert!(err.to_string().contains("weights missing"));
    }
}
