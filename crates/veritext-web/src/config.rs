//! Application configuration
//!
//! Read from a YAML file (every field optional) and then overridden by CLI
//! flags and their environment fallbacks.

use crate::cli::ModelArgs;
use serde::{Deserialize, Serialize};
use std::path::Path;
use veritext_analysis::AnalysisConfig;
use veritext_classifiers::{ModelConfig, ModelSource};
use veritext_core::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub analysis: AnalysisConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow cross-origin requests from anywhere instead of localhost only
    #[serde(default)]
    pub allow_any_origin: bool,

    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            allow_any_origin: false,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content).map_err(|e| {
            Error::config(format!("Invalid config file {}: {}", path.display(), e))
        })?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        if self.model.inference.max_length == 0 {
            return Err(Error::config("model.inference.max_length must be at least 1"));
        }
        Ok(())
    }

    /// Apply model selection flags; later sources win over the file
    pub fn apply_model_args(&mut self, args: &ModelArgs) {
        if args.builtin {
            self.model = ModelConfig::builtin_lexicon();
        } else if let Some(dir) = &args.model_dir {
            self.model.source = ModelSource::Local { path: dir.clone() };
        } else if let Some(repo) = &args.model_repo {
            self.model.source = ModelSource::HuggingFace {
                repo: repo.clone(),
                revision: "main".to_string(),
            };
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.address, self.server.port)
    }
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.listen_addr(), "127.0.0.1:8501");
        assert_eq!(config.analysis.window_size, 50);
        assert_eq!(config.model.inference.max_length, 512);
        assert!(config.model.requires_weights());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
server:
  port: 9100
model:
  name: local-detector
  source:
    type: builtin
    implementation: lexicon
analysis:
  window_size: 40
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.address, "127.0.0.1");
        assert_eq!(config.model.name, "local-detector");
        assert!(!config.model.requires_weights());
        assert_eq!(config.analysis.window_size, 40);
        assert_eq!(config.analysis.min_segment_words, 10);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.server.port, 8501);
    }

    #[test]
    fn test_invalid_analysis_rejected() {
        let err = AppConfig::from_yaml("analysis:\n  window_size: 0\n").unwrap_err();
        assert_eq!(err.kind(), "config");
    }

    #[test]
    fn test_model_args_override_file() {
        let mut config = AppConfig::default();
        config.apply_model_args(&ModelArgs {
            model_dir: Some(PathBuf::from("/models/detector")),
            ..Default::default()
        });
        assert_eq!(
            config.model.source,
            ModelSource::Local {
                path: PathBuf::from("/models/detector")
            }
        );

        config.apply_model_args(&ModelArgs {
            builtin: true,
            ..Default::default()
        });
        assert!(!config.model.requires_weights());
    }
}
