//! Classifier trait and common types

use async_trait::async_trait;
use veritext_core::Result;

/// Trait for all classifier adapters
///
/// An adapter takes raw text and returns the predicted label together with
/// the confidence of that label. Implementations truncate input to whatever
/// their model supports.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text
    async fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Result of classification
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Predicted label, e.g. `LABEL_1`
    pub label: String,

    /// Confidence of the predicted label (0.0-1.0)
    pub score: f32,

    /// Additional metadata
    pub metadata: ClassificationMetadata,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    /// Create a new classification result
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
            metadata: ClassificationMetadata::default(),
            latency_us: 0,
        }
    }
}

/// Metadata about classification
#[derive(Debug, Clone, Default)]
pub struct ClassificationMetadata {
    /// Model name or version
    pub model: Option<String>,

    /// All class scores, in label index order
    pub all_scores: Option<Vec<(String, f32)>>,

    /// Number of tokens fed to the model after truncation
    pub tokens: Option<usize>,
}

/// Default label for class `index` when a model ships no label names
pub fn default_label(index: usize) -> String {
    format!("LABEL_{}", index)
}
