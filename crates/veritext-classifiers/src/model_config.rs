//! Model configuration structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::classifier::default_label;

/// Hub repository of the default detector
pub const DEFAULT_MODEL_REPO: &str = "Hello-SimpleAI/chatgpt-detector-roberta";

/// Configuration for the detector model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name
    #[serde(default = "default_name")]
    pub name: String,

    /// Model source (where to load from)
    #[serde(default)]
    pub source: ModelSource,

    /// Model architecture configuration
    #[serde(default)]
    pub architecture: ArchitectureConfig,

    /// Inference settings
    #[serde(default)]
    pub inference: InferenceConfig,
}

/// Model source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelSource {
    /// Load from a local directory holding config.json, tokenizer.json and weights
    Local { path: PathBuf },

    /// Download from HuggingFace Hub
    HuggingFace {
        repo: String,
        #[serde(default = "default_revision")]
        revision: String,
    },

    /// Use a built-in implementation that needs no model files
    Builtin { implementation: String },
}

impl Default for ModelSource {
    fn default() -> Self {
        Self::HuggingFace {
            repo: DEFAULT_MODEL_REPO.to_string(),
            revision: default_revision(),
        }
    }
}

/// Model architecture configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ArchitectureConfig {
    /// BERT for sequence classification
    BertSequenceClassification {
        #[serde(default = "default_num_labels")]
        num_labels: usize,
        #[serde(default)]
        labels: Vec<String>,
    },

    /// RoBERTa for sequence classification
    RobertaSequenceClassification {
        #[serde(default = "default_num_labels")]
        num_labels: usize,
        #[serde(default)]
        labels: Vec<String>,
    },

    /// XLM-RoBERTa for sequence classification
    XlmRobertaSequenceClassification {
        #[serde(default = "default_num_labels")]
        num_labels: usize,
        #[serde(default)]
        labels: Vec<String>,
    },
}

impl Default for ArchitectureConfig {
    fn default() -> Self {
        Self::RobertaSequenceClassification {
            num_labels: default_num_labels(),
            labels: Vec::new(),
        }
    }
}

impl ArchitectureConfig {
    pub fn num_labels(&self) -> usize {
        match self {
            Self::BertSequenceClassification { num_labels, .. }
            | Self::RobertaSequenceClassification { num_labels, .. }
            | Self::XlmRobertaSequenceClassification { num_labels, .. } => *num_labels,
        }
    }

    /// Label names in class index order, padded with `LABEL_<i>` defaults
    ///
    /// The model's own id2label is not consulted; the scorer identifies the
    /// AI class by label suffix.
    pub fn labels(&self) -> Vec<String> {
        let (num_labels, labels) = match self {
            Self::BertSequenceClassification { num_labels, labels }
            | Self::RobertaSequenceClassification { num_labels, labels }
            | Self::XlmRobertaSequenceClassification { num_labels, labels } => {
                (*num_labels, labels)
            }
        };

        let mut resolved: Vec<String> = labels.iter().take(num_labels).cloned().collect();
        for idx in resolved.len()..num_labels {
            resolved.push(default_label(idx));
        }
        resolved
    }
}

/// Inference configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Device to run on ("cpu", "cuda", "metal")
    #[serde(default = "default_device")]
    pub device: String,

    /// Maximum number of tokens fed to the model; longer input is truncated
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            max_length: default_max_length(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            source: ModelSource::default(),
            architecture: ArchitectureConfig::default(),
            inference: InferenceConfig::default(),
        }
    }
}

impl ModelConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Configuration for the built-in lexicon classifier
    pub fn builtin_lexicon() -> Self {
        Self {
            name: "lexicon".to_string(),
            source: ModelSource::Builtin {
                implementation: "lexicon".to_string(),
            },
            ..Default::default()
        }
    }

    /// Whether loading this model needs downloads or model files
    pub fn requires_weights(&self) -> bool {
        !matches!(self.source, ModelSource::Builtin { .. })
    }
}

fn default_name() -> String {
    "ai-detector".to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_num_labels() -> usize {
    2
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_max_length() -> usize {
    512
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_hub_detector() {
        let config = ModelConfig::default();
        assert_eq!(
            config.source,
            ModelSource::HuggingFace {
                repo: DEFAULT_MODEL_REPO.to_string(),
                revision: "main".to_string(),
            }
        );
        assert_eq!(config.inference.max_length, 512);
        assert_eq!(config.architecture.labels(), vec!["LABEL_0", "LABEL_1"]);
        assert!(config.requires_weights());
    }

    #[test]
    fn test_parse_local_bert() {
        let yaml = r#"
name: "local-detector"
source:
  type: local
  path: "./models/detector"
architecture:
  type: bert-sequence-classification
  num_labels: 2
inference:
  device: "cpu"
  max_length: 256
"#;
        let config = ModelConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.name, "local-detector");
        assert!(matches!(config.source, ModelSource::Local { .. }));
        assert!(matches!(
            config.architecture,
            ArchitectureConfig::BertSequenceClassification { num_labels: 2, .. }
        ));
        assert_eq!(config.inference.max_length, 256);
    }

    #[test]
    fn test_parse_builtin_without_architecture() {
        let yaml = r#"
source:
  type: builtin
  implementation: lexicon
"#;
        let config = ModelConfig::from_yaml(yaml).unwrap();
        assert!(!config.requires_weights());
        assert_eq!(config.architecture, ArchitectureConfig::default());
    }

    #[test]
    fn test_labels_padded_and_truncated() {
        let arch = ArchitectureConfig::XlmRobertaSequenceClassification {
            num_labels: 3,
            labels: vec!["human".to_string()],
        };
        assert_eq!(arch.labels(), vec!["human", "LABEL_1", "LABEL_2"]);

        let arch = ArchitectureConfig::BertSequenceClassification {
            num_labels: 1,
            labels: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(arch.labels(), vec!["a"]);
    }
}
