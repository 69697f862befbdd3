//! Document-level statistics over segment scores
//!
//! Segment scores are sorted into four display buckets by how strongly they
//! read as AI-generated. When a document is too short to segment, the
//! buckets come from a [`BucketEstimator`] instead and are marked
//! [`BucketSource::Estimated`].

use crate::segmenter::count_words;
use veritext_core::{AnalysisSummary, BucketBreakdown, BucketSource, Verdict, AI_SCORE_THRESHOLD};

/// Score bands used for the bucket breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Identical,
    MinorChanges,
    Paraphrased,
    Unique,
}

impl Bucket {
    pub fn of(score: f64) -> Self {
        if score > 0.8 {
            Self::Identical
        } else if score > 0.6 {
            Self::MinorChanges
        } else if score > 0.4 {
            Self::Paraphrased
        } else {
            Self::Unique
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Identical => 0,
            Self::MinorChanges => 1,
            Self::Paraphrased => 2,
            Self::Unique => 3,
        }
    }
}

/// Produces a bucket breakdown when there are no segment scores to count
pub trait BucketEstimator: Send + Sync {
    fn estimate(&self, overall_score: f64) -> BucketBreakdown;

    fn name(&self) -> &str;
}

/// Fixed piecewise split keyed on the overall AI percentage
///
/// These numbers are a presentation aid, not a measurement.
#[derive(Debug, Clone, Copy, Default)]
pub struct PiecewiseEstimate;

impl BucketEstimator for PiecewiseEstimate {
    fn estimate(&self, overall_score: f64) -> BucketBreakdown {
        let p = overall_score.clamp(0.0, 1.0) * 100.0;

        // Band is chosen on the exact percentage; only the derived bucket is truncated
        let (mut fixed, derived) = if p > 80.0 {
            ([(p - 20.0).trunc(), 20.0, 10.0], 0)
        } else if p > 60.0 {
            ([10.0, (p - 30.0).trunc(), 20.0], 1)
        } else if p > 40.0 {
            ([5.0, 15.0, (p - 10.0).trunc()], 2)
        } else {
            ([0.0, 5.0, p.trunc()], 2)
        };

        for value in fixed.iter_mut() {
            *value = value.max(0.0);
        }
        let overflow = fixed.iter().sum::<f64>() - 100.0;
        if overflow > 0.0 {
            fixed[derived] = (fixed[derived] - overflow).max(0.0);
        }

        let [identical, minor_changes, paraphrased] = fixed.map(|v| v as u32);
        BucketBreakdown {
            identical,
            minor_changes,
            paraphrased,
            unique: 100 - (identical + minor_changes + paraphrased),
            source: BucketSource::Estimated,
        }
    }

    fn name(&self) -> &str {
        "piecewise"
    }
}

/// Bucket percentages counted from segment scores, summing to 100
///
/// Returns `None` for an empty slice.
pub fn measured_buckets(scores: &[f64]) -> Option<BucketBreakdown> {
    if scores.is_empty() {
        return None;
    }

    let mut counts = [0usize; 4];
    for &score in scores {
        counts[Bucket::of(score).index()] += 1;
    }

    let total = scores.len() as f64;
    let mut pct = counts.map(|c| (c as f64 * 100.0 / total).round_ties_even() as i64);

    // Unique absorbs rounding drift
    pct[3] += 100 - pct.iter().sum::<i64>();
    if pct[3] < 0 {
        let excess = -pct[3];
        pct[3] = 0;
        let largest = (0..3).max_by_key(|&i| pct[i]).unwrap_or(0);
        pct[largest] -= excess;
    }

    let [identical, minor_changes, paraphrased, unique] = pct.map(|v| v.max(0) as u32);
    Some(BucketBreakdown {
        identical,
        minor_changes,
        paraphrased,
        unique,
        source: BucketSource::Measured,
    })
}

/// Combines the whole-document score and segment scores into a summary
pub struct Aggregator {
    estimator: Box<dyn BucketEstimator>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::with_estimator(PiecewiseEstimate)
    }

    pub fn with_estimator(estimator: impl BucketEstimator + 'static) -> Self {
        Self {
            estimator: Box::new(estimator),
        }
    }

    pub fn estimator_name(&self) -> &str {
        self.estimator.name()
    }

    pub fn aggregate(&self, document: &str, overall_score: f64, scores: &[f64]) -> AnalysisSummary {
        let ai_segment_count = scores.iter().filter(|&&s| s > AI_SCORE_THRESHOLD).count();
        let avg_score = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };
        let buckets =
            measured_buckets(scores).unwrap_or_else(|| self.estimator.estimate(overall_score));

        AnalysisSummary {
            total_words: count_words(document),
            segment_count: scores.len(),
            ai_segment_count,
            human_segment_count: scores.len() - ai_segment_count,
            avg_score,
            buckets,
            verdict: Verdict::from_score(overall_score),
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
