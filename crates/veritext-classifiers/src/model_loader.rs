//! Model loading for Candle-based sequence classifiers
//!
//! Resolves a [`ModelConfig`] to a ready [`Classifier`]: downloads the model
//! from the Hugging Face Hub (or reads a local directory), builds the
//! tokenizer and loads the weights onto the configured device.

use crate::classifier::Classifier;
use crate::lexicon::LexiconClassifier;
use crate::model_config::{ModelConfig, ModelSource};
use std::path::PathBuf;
use std::sync::Arc;
use veritext_core::{Error, Result};

#[cfg(feature = "ml-models")]
pub use ml::SequenceClassifier;

/// Loads the detector described by a [`ModelConfig`]
pub struct ModelLoader {
    cache_dir: PathBuf,
}

impl ModelLoader {
    /// Create a loader caching hub downloads under the user cache directory
    pub fn new() -> Self {
        let cache_dir = dirs::cache_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("veritext/models");

        Self { cache_dir }
    }

    /// Create a loader with an explicit hub cache directory
    pub fn with_cache_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    /// Load the classifier for `config`
    ///
    /// This blocks on downloads and weight loading; call it from a blocking
    /// context when running inside an async runtime.
    pub fn load(&self, config: &ModelConfig) -> Result<Arc<dyn Classifier>> {
        tracing::info!("Loading classifier '{}'", config.name);

        match &config.source {
            ModelSource::Builtin { implementation } => match implementation.as_str() {
                "lexicon" => Ok(Arc::new(LexiconClassifier::with_name(&config.name)?)),
                other => Err(Error::config(format!(
                    "Unknown builtin classifier '{}'",
                    other
                ))),
            },
            _ => self.load_sequence_classifier(config),
        }
    }

    #[cfg(feature = "ml-models")]
    fn load_sequence_classifier(&self, config: &ModelConfig) -> Result<Arc<dyn Classifier>> {
        let model_path = self.resolve_model_path(config)?;
        let classifier = SequenceClassifier::load(config, &model_path)?;
        Ok(Arc::new(classifier))
    }

    #[cfg(not(feature = "ml-models"))]
    fn load_sequence_classifier(&self, config: &ModelConfig) -> Result<Arc<dyn Classifier>> {
        Err(Error::model(format!(
            "Model '{}' requires the 'ml-models' feature",
            config.name
        )))
    }

    /// Resolve model directory (download if needed)
    #[cfg(feature = "ml-models")]
    fn resolve_model_path(&self, config: &ModelConfig) -> Result<PathBuf> {
        match &config.source {
            ModelSource::Local { path } => {
                if !path.is_dir() {
                    return Err(Error::config(format!(
                        "Model directory does not exist: {}",
                        path.display()
                    )));
                }
                Ok(path.clone())
            }
            ModelSource::HuggingFace { repo, revision } => {
                self.download_from_huggingface(repo, revision)
            }
            ModelSource::Builtin { implementation } => Err(Error::config(format!(
                "Builtin implementation '{}' has no model files",
                implementation
            ))),
        }
    }

    /// Download model files from HuggingFace Hub, returning the snapshot directory
    #[cfg(feature = "ml-models")]
    fn download_from_huggingface(&self, repo: &str, revision: &str) -> Result<PathBuf> {
        use hf_hub::{api::sync::ApiBuilder, Repo, RepoType};

        tracing::info!("Downloading model from HuggingFace: {} @ {}", repo, revision);

        let api = ApiBuilder::new()
            .with_cache_dir(self.cache_dir.clone())
            .build()
            .map_err(|e| Error::model(format!("Failed to initialize HuggingFace API: {}", e)))?;

        let repo_obj = api.repo(Repo::with_revision(
            repo.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        let config_path = repo_obj
            .get("config.json")
            .map_err(|e| Error::model(format!("Failed to download config.json: {}", e)))?;

        let has_weights = ["model.safetensors", "pytorch_model.bin"]
            .iter()
            .any(|file| match repo_obj.get(file) {
                Ok(_) => {
                    tracing::debug!("Found weight file: {}", file);
                    true
                }
                Err(_) => false,
            });
        if !has_weights {
            return Err(Error::model(
                "No model weights found (tried model.safetensors, pytorch_model.bin)",
            ));
        }

        let mut found_tokenizer = false;
        for file in ["tokenizer.json", "vocab.json", "merges.txt", "vocab.txt"] {
            match repo_obj.get(file) {
                Ok(_) => {
                    tracing::debug!("Found tokenizer file: {}", file);
                    found_tokenizer = true;
                }
                Err(_) => tracing::debug!("File not found: {}", file),
            }
        }
        if !found_tokenizer {
            return Err(Error::model(
                "No tokenizer found (tried tokenizer.json, vocab.json + merges.txt, vocab.txt)",
            ));
        }

        let model_dir = config_path
            .parent()
            .ok_or_else(|| Error::model("Invalid cache path"))?;

        tracing::info!("Model available at: {}", model_dir.display());
        Ok(model_dir.to_path_buf())
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "ml-models")]
mod ml {
    use crate::classifier::{ClassificationMetadata, ClassificationResult, Classifier};
    use crate::model_config::{ArchitectureConfig, ModelConfig};
    use async_trait::async_trait;
    use candle_core::{DType, Device, IndexOp, Tensor, D};
    use candle_nn::{Linear, Module, VarBuilder};
    use candle_transformers::models::bert::{BertModel, Config as BertConfig};
    use candle_transformers::models::xlm_roberta::{
        Config as XlmRobertaConfig, XLMRobertaForSequenceClassification,
    };
    use serde::de::DeserializeOwned;
    use std::path::Path;
    use std::time::Instant;
    use tokenizers::{Tokenizer, TruncationParams};
    use tokio::runtime::{Handle, RuntimeFlavor};
    use veritext_core::{Error, Result};

    enum Backbone {
        Bert {
            model: BertModel,
            pooler: Option<Linear>,
            classifier: Linear,
        },
        XlmRoberta(XLMRobertaForSequenceClassification),
    }

    /// Transformer sequence classifier running on Candle
    pub struct SequenceClassifier {
        name: String,
        tokenizer: Tokenizer,
        backbone: Backbone,
        device: Device,
        labels: Vec<String>,
    }

    impl SequenceClassifier {
        /// Load tokenizer and weights from a model directory
        pub fn load(config: &ModelConfig, model_path: &Path) -> Result<Self> {
            let num_labels = config.architecture.num_labels();
            if num_labels == 0 {
                return Err(Error::config("num_labels must be at least 1"));
            }

            let tokenizer = load_tokenizer(model_path, config.inference.max_length)?;
            let device = get_device(&config.inference.device)?;
            let vb = load_var_builder(model_path, &device)?;

            let backbone = match &config.architecture {
                ArchitectureConfig::BertSequenceClassification { .. } => {
                    let bert_config: BertConfig =
                        parse_json_config(&model_path.join("config.json"))?;
                    load_bert(&vb, &bert_config, num_labels)?
                }
                ArchitectureConfig::RobertaSequenceClassification { .. }
                | ArchitectureConfig::XlmRobertaSequenceClassification { .. } => {
                    let xlm_config: XlmRobertaConfig =
                        parse_json_config(&model_path.join("config.json"))?;
                    let model =
                        XLMRobertaForSequenceClassification::new(num_labels, &xlm_config, vb)
                            .map_err(|e| {
                                Error::model(format!(
                                    "Failed to load RoBERTa sequence model: {}",
                                    e
                                ))
                            })?;
                    Backbone::XlmRoberta(model)
                }
            };

            let labels = config.architecture.labels();
            tracing::info!(
                "Successfully loaded classifier '{}' with {} labels: {:?}",
                config.name,
                num_labels,
                labels
            );

            Ok(Self {
                name: config.name.clone(),
                tokenizer,
                backbone,
                device,
                labels,
            })
        }

        /// Class probabilities for `text`, plus the number of tokens used
        fn probabilities(&self, text: &str) -> Result<(Vec<f32>, usize)> {
            let encoding = self
                .tokenizer
                .encode(text, true)
                .map_err(|e| Error::classifier(format!("Tokenization failed: {}", e)))?;

            let token_count = encoding.get_ids().len();
            if token_count == 0 {
                return Err(Error::classifier("Tokenizer produced no tokens"));
            }

            let input_ids = row_tensor(encoding.get_ids(), &self.device, "input ids")?;
            let token_type_ids =
                row_tensor(encoding.get_type_ids(), &self.device, "token type ids")?;
            let attention_mask =
                row_tensor(encoding.get_attention_mask(), &self.device, "attention mask")?;

            let logits = match &self.backbone {
                Backbone::Bert {
                    model,
                    pooler,
                    classifier,
                } => {
                    let hidden_states = model
                        .forward(&input_ids, &token_type_ids, Some(&attention_mask))
                        .map_err(forward_err)?;

                    let mut cls = hidden_states
                        .i((0, 0, ..))
                        .and_then(|t| t.unsqueeze(0))
                        .map_err(|e| {
                            Error::classifier(format!("Failed to get CLS token: {}", e))
                        })?;

                    if let Some(pooler) = pooler {
                        cls = pooler
                            .forward(&cls)
                            .and_then(|t| t.tanh())
                            .map_err(|e| Error::classifier(format!("Pooler failed: {}", e)))?;
                    }

                    classifier.forward(&cls).map_err(|e| {
                        Error::classifier(format!("Classification head failed: {}", e))
                    })?
                }
                Backbone::XlmRoberta(model) => model
                    .forward(&input_ids, &attention_mask, &token_type_ids)
                    .map_err(forward_err)?,
            };

            let probs = candle_nn::ops::softmax(&logits, D::Minus1)
                .and_then(|t| t.squeeze(0))
                .and_then(|t| t.to_dtype(DType::F32))
                .and_then(|t| t.to_vec1::<f32>())
                .map_err(|e| Error::classifier(format!("Softmax failed: {}", e)))?;

            Ok((probs, token_count))
        }
    }

    #[async_trait]
    impl Classifier for SequenceClassifier {
        async fn classify(&self, text: &str) -> Result<ClassificationResult> {
            let start = Instant::now();
            let (probs, tokens) = run_blocking(|| self.probabilities(text))?;

            let (best_idx, best_prob) = probs
                .iter()
                .copied()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                .ok_or_else(|| Error::classifier("Model returned no class scores"))?;

            let label = self
                .labels
                .get(best_idx)
                .cloned()
                .unwrap_or_else(|| crate::classifier::default_label(best_idx));

            let all_scores = self
                .labels
                .iter()
                .zip(probs.iter().copied())
                .map(|(label, prob)| (label.clone(), prob))
                .collect();

            Ok(ClassificationResult {
                label,
                score: best_prob,
                metadata: ClassificationMetadata {
                    model: Some(self.name.clone()),
                    all_scores: Some(all_scores),
                    tokens: Some(tokens),
                },
                latency_us: start.elapsed().as_micros() as u64,
            })
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    /// Run CPU-bound inference without stalling the async worker
    ///
    /// On a multi-threaded runtime the worker hands its other tasks off
    /// first; elsewhere the closure runs inline.
    pub(crate) fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(f)
            }
            _ => f(),
        }
    }

    fn forward_err(e: candle_core::Error) -> Error {
        Error::classifier(format!("Model forward pass failed: {}", e))
    }

    fn row_tensor(values: &[u32], device: &Device, what: &str) -> Result<Tensor> {
        Tensor::new(values, device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::classifier(format!("Failed to create {} tensor: {}", what, e)))
    }

    fn get_device(device_str: &str) -> Result<Device> {
        match device_str.to_lowercase().as_str() {
            "cuda" | "cuda:0" => Device::new_cuda(0)
                .map_err(|e| Error::model(format!("Failed to initialize CUDA: {}", e))),
            "mps" | "metal" => Device::new_metal(0)
                .map_err(|e| Error::model(format!("Failed to initialize Metal: {}", e))),
            _ => Ok(Device::Cpu),
        }
    }

    fn parse_json_config<T: DeserializeOwned>(config_path: &Path) -> Result<T> {
        let config_str = std::fs::read_to_string(config_path).map_err(|e| {
            Error::model(format!(
                "Failed to read config {}: {}",
                config_path.display(),
                e
            ))
        })?;

        serde_json::from_str(&config_str).map_err(|e| {
            Error::model(format!(
                "Failed to parse config {}: {}",
                config_path.display(),
                e
            ))
        })
    }

    fn load_var_builder(model_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
        let safetensors = model_path.join("model.safetensors");
        if safetensors.exists() {
            // SAFETY: the weights file is not modified while the model is alive
            return unsafe {
                VarBuilder::from_mmaped_safetensors(&[safetensors], DType::F32, device)
            }
            .map_err(|e| Error::model(format!("Failed to load SafeTensors: {}", e)));
        }

        let pytorch = model_path.join("pytorch_model.bin");
        if pytorch.exists() {
            return VarBuilder::from_pth(&pytorch, DType::F32, device)
                .map_err(|e| Error::model(format!("Failed to load PyTorch weights: {}", e)));
        }

        Err(Error::model(format!(
            "No weights found in {} (tried model.safetensors, pytorch_model.bin)",
            model_path.display()
        )))
    }

    fn load_bert(vb: &VarBuilder, config: &BertConfig, num_labels: usize) -> Result<Backbone> {
        let mut errors = Vec::new();

        for prefix in ["bert", ""] {
            let vb_prefix = if prefix.is_empty() {
                vb.clone()
            } else {
                vb.pp(prefix)
            };

            match BertModel::load(vb_prefix.clone(), config) {
                Ok(model) => {
                    let pooler = candle_nn::linear(
                        config.hidden_size,
                        config.hidden_size,
                        vb_prefix.pp("pooler").pp("dense"),
                    )
                    .ok();
                    if pooler.is_none() {
                        tracing::warn!("No pooler weights found, classifying raw CLS embedding");
                    }

                    let classifier =
                        candle_nn::linear(config.hidden_size, num_labels, vb.pp("classifier"))
                            .map_err(|e| {
                                Error::model(format!(
                                    "Failed to load classification head: {}",
                                    e
                                ))
                            })?;

                    tracing::info!(
                        "Loaded BERT backbone from '{}'",
                        if prefix.is_empty() { "<root>" } else { prefix }
                    );
                    return Ok(Backbone::Bert {
                        model,
                        pooler,
                        classifier,
                    });
                }
                Err(e) => errors.push(format!(
                    "{}: {}",
                    if prefix.is_empty() { "<root>" } else { prefix },
                    e
                )),
            }
        }

        Err(Error::model(format!(
            "Failed to load BERT backbone with tried prefixes [{}]",
            errors.join(" | ")
        )))
    }

    fn load_tokenizer(model_path: &Path, max_length: usize) -> Result<Tokenizer> {
        let mut tokenizer = build_tokenizer(model_path)?;

        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| Error::model(format!("Failed to configure truncation: {}", e)))?;

        Ok(tokenizer)
    }

    fn build_tokenizer(model_path: &Path) -> Result<Tokenizer> {
        let tokenizer_json_path = model_path.join("tokenizer.json");
        if tokenizer_json_path.exists() {
            tracing::debug!("Loading tokenizer from tokenizer.json");
            return Tokenizer::from_file(&tokenizer_json_path)
                .map_err(|e| Error::model(format!("Failed to load tokenizer.json: {}", e)));
        }

        let vocab_json = model_path.join("vocab.json");
        let merges = model_path.join("merges.txt");
        if vocab_json.exists() && merges.exists() {
            tracing::debug!("Building byte-level BPE tokenizer from vocab.json + merges.txt");

            use tokenizers::models::bpe::BPE;
            use tokenizers::pre_tokenizers::byte_level::ByteLevel;
            use tokenizers::processors::roberta::RobertaProcessing;

            let bpe = BPE::from_file(
                vocab_json.to_string_lossy().as_ref(),
                merges.to_string_lossy().as_ref(),
            )
            .build()
            .map_err(|e| Error::model(format!("Failed to build BPE model: {}", e)))?;

            let mut tokenizer = Tokenizer::new(bpe);
            let sep = tokenizer.token_to_id("</s>").unwrap_or(2);
            let cls = tokenizer.token_to_id("<s>").unwrap_or(0);
            tokenizer.with_pre_tokenizer(Some(ByteLevel::default()));
            tokenizer.with_post_processor(Some(RobertaProcessing::new(
                ("</s>".to_string(), sep),
                ("<s>".to_string(), cls),
            )));
            return Ok(tokenizer);
        }

        let vocab_txt = model_path.join("vocab.txt");
        if vocab_txt.exists() {
            tracing::debug!("Building WordPiece tokenizer from vocab.txt");

            use tokenizers::models::wordpiece::WordPiece;
            use tokenizers::normalizers::BertNormalizer;
            use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
            use tokenizers::processors::bert::BertProcessing;

            let wordpiece = WordPiece::from_file(vocab_txt.to_string_lossy().as_ref())
                .unk_token("[UNK]".to_string())
                .build()
                .map_err(|e| Error::model(format!("Failed to build WordPiece model: {}", e)))?;

            let mut tokenizer = Tokenizer::new(wordpiece);
            let sep = tokenizer.token_to_id("[SEP]").unwrap_or(102);
            let cls = tokenizer.token_to_id("[CLS]").unwrap_or(101);
            tokenizer.with_normalizer(Some(BertNormalizer::default()));
            tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));
            tokenizer.with_post_processor(Some(BertProcessing::new(
                ("[SEP]".to_string(), sep),
                ("[CLS]".to_string(), cls),
            )));
            return Ok(tokenizer);
        }

        Err(Error::model(format!(
            "No tokenizer found in {} (tried tokenizer.json, vocab.json + merges.txt, vocab.txt)",
            model_path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_builtin_lexicon() {
        let loader = ModelLoader::with_cache_dir(std::env::temp_dir());
        let classifier = loader.load(&ModelConfig::builtin_lexicon()).unwrap();

        assert_eq!(classifier.name(), "lexicon");
        let result = classifier.classify("plain words here").await.unwrap();
        assert!(result.label.starts_with("LABEL_"));
    }

    #[test]
    fn test_unknown_builtin_is_config_error() {
        let config = ModelConfig {
            source: ModelSource::Builtin {
                implementation: "oracle".to_string(),
            },
            ..Default::default()
        };
        let err = ModelLoader::new().load(&config).err().unwrap();
        assert_eq!(err.kind(), "config");
    }

    #[cfg(feature = "ml-models")]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_inference_runs_on_multi_thread_runtime() {
        let value = ml::run_blocking(|| (0..1_000u64).sum::<u64>());
        assert_eq!(value, 499_500);
    }

    #[cfg(feature = "ml-models")]
    #[tokio::test]
    async fn test_inference_runs_inline_on_current_thread_runtime() {
        assert_eq!(ml::run_blocking(|| "done"), "done");
    }

    #[cfg(feature = "ml-models")]
    #[test]
    fn test_inference_runs_outside_a_runtime() {
        assert_eq!(ml::run_blocking(|| 7), 7);
    }

    #[cfg(feature = "ml-models")]
    #[test]
    fn test_missing_local_directory() {
        let config = ModelConfig {
            source: ModelSource::Local {
                path: PathBuf::from("/nonexistent/veritext-model"),
            },
            ..Default::default()
        };
        let err = ModelLoader::new().load(&config).err().unwrap();
        assert_eq!(err.kind(), "config");
    }
}
