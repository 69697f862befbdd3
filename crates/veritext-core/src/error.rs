//! Error types for Veritext

/// Result type alias using Veritext's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Veritext operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No text was submitted for analysis
    #[error("no text submitted for analysis")]
    InputEmpty,

    /// The classifier adapter failed on the document or one of its segments
    #[error("classification failed: {0}")]
    ClassificationFailure(String),

    /// Model download or load errors
    #[error("model error: {0}")]
    Model(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML configuration parse errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new classification failure
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::ClassificationFailure(msg.into())
    }

    /// Create a new model load error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputEmpty => "input_empty",
            Self::ClassificationFailure(_) => "classification_failure",
            Self::Model(_) => "model",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Yaml(_) => "yaml",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the error was caused by the submitted input rather than the service
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InputEmpty)
    }
}
