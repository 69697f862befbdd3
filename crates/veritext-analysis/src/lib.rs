//! Veritext Analysis
//!
//! The detection pipeline between a classifier and a report:
//!
//! 1. [`Segmenter`] cuts the document into overlapping word windows
//! 2. [`SegmentScorer`] turns classifier output into AI probabilities
//! 3. [`Aggregator`] summarizes segment scores into counts and buckets
//! 4. [`Highlighter`] marks the flagged spans of the original text
//!
//! [`Analyzer`] runs all four for one document.

pub mod aggregator;
pub mod analyzer;
pub mod highlighter;
pub mod sample;
pub mod scorer;
pub mod segmenter;

pub use aggregator::{measured_buckets, Aggregator, Bucket, BucketEstimator, PiecewiseEstimate};
pub use analyzer::{AnalysisConfig, Analyzer};
pub use highlighter::Highlighter;
pub use sample::SAMPLE_TEXT;
pub use scorer::{LabelRule, SegmentScorer};
pub use segmenter::{count_words, segment, Segmenter, Segments};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analyzer::{AnalysisConfig, Analyzer};
    pub use crate::segmenter::Segmenter;
    pub use veritext_core::{AnalysisReport, BucketBreakdown, Verdict};
}
