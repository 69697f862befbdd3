//! Core types for Veritext

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use uuid::Uuid;

/// Scores strictly above this count as AI-generated
pub const AI_SCORE_THRESHOLD: f64 = 0.5;

/// A contiguous run of whitespace-delimited words taken from a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// The words of the run joined with single spaces
    pub text: String,

    /// Index of the first word in the document's word sequence
    pub start_word: usize,

    /// Number of words in the run
    pub word_count: usize,

    /// Byte offset of the first word in the original document
    pub start: usize,

    /// Byte offset one past the last word in the original document
    pub end: usize,
}

impl Segment {
    /// Byte span of this segment in the original document
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length of the joined segment text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Index one past the last word of the run
    pub fn end_word(&self) -> usize {
        self.start_word + self.word_count
    }
}

/// A segment together with its AI probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSegment {
    #[serde(flatten)]
    pub segment: Segment,

    /// Probability in [0, 1] that the segment is AI-generated
    pub score: f64,
}

impl ScoredSegment {
    pub fn new(segment: Segment, score: f64) -> Self {
        Self { segment, score }
    }

    pub fn is_ai(&self) -> bool {
        self.score > AI_SCORE_THRESHOLD
    }
}

/// Where a bucket breakdown came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketSource {
    /// Counted from segment scores
    Measured,
    /// Visual estimate derived from the overall score; not measured data
    Estimated,
}

/// Percentages of the four classification buckets. Always sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketBreakdown {
    /// Scores above 0.8
    pub identical: u32,
    /// Scores in (0.6, 0.8]
    pub minor_changes: u32,
    /// Scores in (0.4, 0.6]
    pub paraphrased: u32,
    /// Scores at or below 0.4
    pub unique: u32,
    pub source: BucketSource,
}

impl BucketBreakdown {
    pub fn total(&self) -> u32 {
        self.identical + self.minor_changes + self.paraphrased + self.unique
    }

    /// Percentages in display order: identical, minor, paraphrased, unique
    pub fn as_array(&self) -> [u32; 4] {
        [
            self.identical,
            self.minor_changes,
            self.paraphrased,
            self.unique,
        ]
    }
}

/// Overall document classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "AI Generated")]
    AiGenerated,
    #[serde(rename = "Human Written")]
    HumanWritten,
}

impl Verdict {
    /// "AI Generated" when the overall percentage is above 50
    pub fn from_score(overall_score: f64) -> Self {
        if overall_score * 100.0 > 50.0 {
            Self::AiGenerated
        } else {
            Self::HumanWritten
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, Self::AiGenerated)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AiGenerated => write!(f, "AI Generated"),
            Self::HumanWritten => write!(f, "Human Written"),
        }
    }
}

/// Severity of the advice shown under a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationLevel {
    Warning,
    Info,
    Success,
}

/// Advice derived from the overall AI percentage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub level: RecommendationLevel,
    pub message: String,
}

impl Recommendation {
    pub fn from_score(overall_score: f64) -> Self {
        let percentage = overall_score * 100.0;
        let (level, message) = if percentage > 70.0 {
            (
                RecommendationLevel::Warning,
                "High AI content detected. Consider rewriting for authenticity.",
            )
        } else if percentage > 40.0 {
            (
                RecommendationLevel::Info,
                "Moderate AI content. Some sections may need revision.",
            )
        } else {
            (
                RecommendationLevel::Success,
                "Content appears to be primarily human-written.",
            )
        };

        Self {
            level,
            message: message.to_string(),
        }
    }
}

/// Aggregate statistics over the segment scores of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_words: usize,
    pub segment_count: usize,
    pub ai_segment_count: usize,
    pub human_segment_count: usize,

    /// Mean segment score; absent when there are no segments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_score: Option<f64>,

    pub buckets: BucketBreakdown,
    pub verdict: Verdict,
}

/// A run of document text, either flagged as AI-generated or left plain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightFragment {
    pub text: String,
    pub flagged: bool,
}

/// Everything the presentation layer needs to render one analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub analyzed_at: DateTime<Utc>,

    /// Name of the classifier that produced the scores
    pub model: String,

    /// AI probability of the whole document (capped at the model's input length)
    pub overall_score: f64,
    pub ai_percentage: f64,

    pub summary: AnalysisSummary,
    pub segments: Vec<ScoredSegment>,

    /// Document text with flagged spans wrapped in highlight markers
    pub highlighted: String,
    pub fragments: Vec<HighlightFragment>,

    pub recommendation: Recommendation,
    pub elapsed_ms: u64,
}

impl AnalysisReport {
    pub fn verdict(&self) -> Verdict {
        self.summary.verdict
    }
}
