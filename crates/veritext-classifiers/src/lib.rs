//! Veritext Classifiers
//!
//! Classifier adapters that turn text into a (label, confidence) pair.
//!
//! - [`SequenceClassifier`]: BERT / RoBERTa sequence-classification models run
//!   with Candle, downloaded from the Hugging Face Hub or read from disk
//!   (requires the `ml-models` feature, on by default)
//! - [`LexiconClassifier`]: offline stock-phrase heuristic used when no model
//!   weights are available
//!
//! [`ModelLoader`] builds either from a [`ModelConfig`].

pub mod classifier;
pub mod lexicon;
pub mod model_config;
pub mod model_loader;

pub use classifier::{ClassificationMetadata, ClassificationResult, Classifier};
pub use lexicon::LexiconClassifier;
pub use model_config::{ArchitectureConfig, InferenceConfig, ModelConfig, ModelSource};
pub use model_loader::ModelLoader;

#[cfg(feature = "ml-models")]
pub use model_loader::SequenceClassifier;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{ClassificationResult, Classifier};
    pub use crate::lexicon::LexiconClassifier;
    pub use crate::model_config::{ModelConfig, ModelSource};
    pub use crate::model_loader::ModelLoader;
}
