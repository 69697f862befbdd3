//! End-to-end analysis of one document

use crate::aggregator::Aggregator;
use crate::highlighter::{Highlighter, DEFAULT_HIGHLIGHT_MIN_CHARS, DEFAULT_HIGHLIGHT_THRESHOLD};
use crate::scorer::{LabelRule, SegmentScorer, DEFAULT_AI_LABEL_SUFFIX};
use crate::segmenter::{Segmenter, DEFAULT_MIN_SEGMENT_WORDS, DEFAULT_WINDOW_SIZE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use veritext_classifiers::Classifier;
use veritext_core::{AnalysisReport, Error, Recommendation, Result, ScoredSegment};

/// Tunables for segmentation, label mapping and highlighting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Words per segment window
    pub window_size: usize,

    /// Windows with fewer words are discarded
    pub min_segment_words: usize,

    /// Labels ending in this suffix denote the AI class
    pub ai_label_suffix: String,

    pub highlight_threshold: f64,
    pub highlight_min_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_segment_words: DEFAULT_MIN_SEGMENT_WORDS,
            ai_label_suffix: DEFAULT_AI_LABEL_SUFFIX.to_string(),
            highlight_threshold: DEFAULT_HIGHLIGHT_THRESHOLD,
            highlight_min_chars: DEFAULT_HIGHLIGHT_MIN_CHARS,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(Error::config("analysis.window_size must be at least 1"));
        }
        if self.min_segment_words > self.window_size {
            return Err(Error::config(format!(
                "analysis.min_segment_words ({}) must not exceed analysis.window_size ({})",
                self.min_segment_words, self.window_size
            )));
        }
        if self.ai_label_suffix.is_empty() {
            return Err(Error::config("analysis.ai_label_suffix must not be empty"));
        }
        if !(0.0..=1.0).contains(&self.highlight_threshold) {
            return Err(Error::config(format!(
                "analysis.highlight_threshold must be in [0, 1], got {}",
                self.highlight_threshold
            )));
        }
        Ok(())
    }
}

/// Runs segmentation, scoring, aggregation and highlighting over a document
pub struct Analyzer {
    scorer: SegmentScorer,
    segmenter: Segmenter,
    aggregator: Aggregator,
    highlighter: Highlighter,
}

impl Analyzer {
    pub fn new(classifier: Arc<dyn Classifier>, config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            scorer: SegmentScorer::new(classifier, LabelRule::new(config.ai_label_suffix.clone())),
            segmenter: Segmenter::new(config.window_size, config.min_segment_words)?,
            aggregator: Aggregator::new(),
            highlighter: Highlighter::new(config.highlight_threshold, config.highlight_min_chars),
        })
    }

    /// Replace the aggregator, e.g. to use a different bucket estimator
    pub fn with_aggregator(mut self, aggregator: Aggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn classifier_name(&self) -> &str {
        self.scorer.classifier_name()
    }

    /// Score `text` as a whole and segment by segment
    ///
    /// Fails with [`Error::InputEmpty`] for blank input without calling the
    /// classifier, and with [`Error::ClassificationFailure`] on the first
    /// scoring error; no partial report is produced.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisReport> {
        if text.trim().is_empty() {
            return Err(Error::InputEmpty);
        }

        let id = Uuid::new_v4();
        let start = Instant::now();
        info!(
            analysis_id = %id,
            classifier = self.classifier_name(),
            bytes = text.len(),
            "Starting analysis"
        );

        let overall_score = self.scorer.score(text).await.map_err(|e| {
            error!(analysis_id = %id, error = %e, "Document scoring failed");
            e
        })?;

        let mut segments = Vec::new();
        for (index, segment) in self.segmenter.segments(text).enumerate() {
            let score = self.scorer.score(&segment.text).await.map_err(|e| {
                error!(analysis_id = %id, segment = index, error = %e, "Segment scoring failed");
                e
            })?;
            debug!(
                analysis_id = %id,
                segment = index,
                start_word = segment.start_word,
                words = segment.word_count,
                score,
                "Scored segment"
            );
            segments.push(ScoredSegment::new(segment, score));
        }

        if segments.is_empty() {
            warn!(
                analysis_id = %id,
                estimator = self.aggregator.estimator_name(),
                "Document too short to segment, bucket breakdown is estimated"
            );
        }

        let scores: Vec<f64> = segments.iter().map(|s| s.score).collect();
        let plain: Vec<_> = segments.iter().map(|s| s.segment.clone()).collect();

        let summary = self.aggregator.aggregate(text, overall_score, &scores);
        let highlighted = self.highlighter.highlight(text, &plain, &scores);
        let fragments = self.highlighter.fragments(text, &plain, &scores);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        info!(
            analysis_id = %id,
            overall_score,
            segments = summary.segment_count,
            ai_segments = summary.ai_segment_count,
            verdict = %summary.verdict,
            elapsed_ms,
            "Analysis complete"
        );

        Ok(AnalysisReport {
            id,
            analyzed_at: chrono::Utc::now(),
            model: self.classifier_name().to_string(),
            overall_score,
            ai_percentage: overall_score * 100.0,
            summary,
            segments,
            highlighted,
            fragments,
            recommendation: Recommendation::from_score(overall_score),
            elapsed_ms,
        })
    }
}
