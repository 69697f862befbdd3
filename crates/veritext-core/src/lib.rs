//! Veritext Core
//!
//! Types and errors shared across the Veritext components.
//!
//! This crate provides:
//! - The error taxonomy used from the classifier adapter up to the HTTP layer
//! - The analysis data model: segments, scores, bucket breakdowns, verdicts
//!   and the serializable report handed to the presentation layer

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    AnalysisReport, AnalysisSummary, BucketBreakdown, BucketSource, HighlightFragment,
    Recommendation, RecommendationLevel, ScoredSegment, Segment, Verdict, AI_SCORE_THRESHOLD,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        AnalysisReport, AnalysisSummary, BucketBreakdown, BucketSource, ScoredSegment, Segment,
        Verdict,
    };
}
