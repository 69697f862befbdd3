use crate::config::AppConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::info;
use veritext_analysis::Analyzer;
use veritext_classifiers::{Classifier, ModelLoader};
use veritext_core::{AnalysisReport, Error, Result};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Effective configuration
    pub config: Arc<AppConfig>,

    /// Classifier, loaded once on first use or at startup and never replaced
    classifier: Arc<OnceCell<Arc<dyn Classifier>>>,

    /// Serializes analyses; one runs to completion before the next starts
    analysis_lock: Arc<Mutex<()>>,

    loader: Arc<ModelLoader>,

    /// Prometheus exporter handle, absent when metrics are disabled
    metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: AppConfig, loader: ModelLoader, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            config: Arc::new(config),
            classifier: Arc::new(OnceCell::new()),
            analysis_lock: Arc::new(Mutex::new(())),
            loader: Arc::new(loader),
            metrics,
        }
    }

    /// State around an already constructed classifier
    pub fn with_classifier(
        config: AppConfig,
        classifier: Arc<dyn Classifier>,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self> {
        config.analysis.validate()?;
        Ok(Self {
            config: Arc::new(config),
            classifier: Arc::new(OnceCell::new_with(Some(classifier))),
            analysis_lock: Arc::new(Mutex::new(())),
            loader: Arc::new(ModelLoader::new()),
            metrics,
        })
    }

    /// The shared classifier, loading the model on first call
    pub async fn classifier(&self) -> Result<Arc<dyn Classifier>> {
        self.classifier
            .get_or_try_init(|| async {
                let loader = Arc::clone(&self.loader);
                let model = self.config.model.clone();
                info!("Loading model '{}'", model.name);

                let classifier = tokio::task::spawn_blocking(move || loader.load(&model))
                    .await
                    .map_err(|e| Error::internal(format!("Model loading task failed: {}", e)))??;

                info!("Model '{}' ready", classifier.name());
                Ok::<_, Error>(classifier)
            })
            .await
            .map(Arc::clone)
    }

    /// Load the model now instead of on the first request
    pub async fn preload(&self) -> Result<()> {
        self.classifier().await.map(|_| ())
    }

    pub fn is_model_loaded(&self) -> bool {
        self.classifier.initialized()
    }

    /// Name of the loaded classifier, or the configured model name before loading
    pub fn model_name(&self) -> String {
        match self.classifier.get() {
            Some(classifier) => classifier.name().to_string(),
            None => self.config.model.name.clone(),
        }
    }

    /// Run one analysis, waiting for any analysis already in progress
    pub async fn analyze(&self, text: &str) -> Result<AnalysisReport> {
        // Blank input never triggers a model load
        if text.trim().is_empty() {
            return Err(Error::InputEmpty);
        }

        let _guard = self.analysis_lock.lock().await;
        let classifier = self.classifier().await?;
        Analyzer::new(classifier, &self.config.analysis)?
            .analyze(text)
            .await
    }

    /// Prometheus exposition of the recorded metrics
    pub fn render_metrics(&self) -> Option<String> {
        self.metrics.as_ref().map(PrometheusHandle::render)
    }
}
