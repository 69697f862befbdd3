//! Veritext
//!
//! Web service and CLI for detecting AI-generated text.

use anyhow::Context;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::io::Read;
use std::net::SocketAddr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use veritext_analysis::Analyzer;
use veritext_classifiers::ModelLoader;
use veritext_core::AnalysisReport;
use veritext_web::cli::{Cli, Commands, LogFormat, ModelArgs, OutputFormat};
use veritext_web::config::AppConfig;
use veritext_web::server::run_server;
use veritext_web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    match cli.command {
        Commands::Serve {
            address,
            port,
            preload,
            allow_any_origin,
            model,
        } => {
            let mut config = load_config(&cli.config, &model)?;
            if let Some(address) = address {
                config.server.address = address;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.server.allow_any_origin |= allow_any_origin;

            let addr: SocketAddr = config
                .listen_addr()
                .parse()
                .with_context(|| format!("Invalid listen address {}", config.listen_addr()))?;

            let metrics_handle = init_metrics()?;
            let state = AppState::new(config, loader(&model), Some(metrics_handle));

            if preload {
                info!("Preloading model...");
                state.preload().await?;
            }

            println!();
            println!("  Veritext - AI text detector");
            println!("  Model:   {}", state.model_name());
            println!("  Open http://{} in your browser", addr);
            println!();

            run_server(state, addr).await?;
        }

        Commands::Analyze {
            input,
            format,
            model,
        } => {
            let config = load_config(&cli.config, &model)?;
            let text = read_input(input.as_deref())?;

            let model_loader = loader(&model);
            let model_config = config.model.clone();
            let classifier = tokio::task::spawn_blocking(move || model_loader.load(&model_config))
                .await
                .context("Model loading task failed")??;

            let analyzer = Analyzer::new(classifier, &config.analysis)?;
            let report = analyzer.analyze(&text).await?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Summary => print_summary(&report),
            }
        }
    }

    Ok(())
}

fn load_config(path: &Path, model: &ModelArgs) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load(path)?;
    config.apply_model_args(model);
    info!("Model: {} ({:?})", config.model.name, config.model.source);
    Ok(config)
}

fn loader(model: &ModelArgs) -> ModelLoader {
    match &model.cache_dir {
        Some(dir) => ModelLoader::with_cache_dir(dir.clone()),
        None => ModelLoader::new(),
    }
}

fn read_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn print_summary(report: &AnalysisReport) {
    let summary = &report.summary;
    let buckets = &summary.buckets;

    println!("Verdict:         {}", summary.verdict);
    println!("AI content:      {:.1}%", report.ai_percentage);
    println!("Words:           {}", summary.total_words);
    println!(
        "Segments:        {} ({} AI, {} human)",
        summary.segment_count, summary.ai_segment_count, summary.human_segment_count
    );
    if let Some(avg) = summary.avg_score {
        println!("Average score:   {:.3}", avg);
    }
    println!(
        "Buckets ({:?}): identical {}%, minor changes {}%, paraphrased {}%, unique {}%",
        buckets.source, buckets.identical, buckets.minor_changes, buckets.paraphrased, buckets.unique
    );
    println!("Recommendation:  {}", report.recommendation.message);
}

fn init_logging(verbose: bool, format: LogFormat) {
    let filter = if verbose {
        EnvFilter::new("veritext=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("veritext=info,tower_http=warn"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

/// Install the Prometheus recorder and describe the exported metrics
fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!("veritext_analyses_total", "Analyses handled, by outcome");
    metrics::describe_counter!(
        "veritext_segments_scored_total",
        "Segments scored across all analyses"
    );
    metrics::describe_histogram!(
        "veritext_analysis_latency_ms",
        metrics::Unit::Milliseconds,
        "End-to-end analysis latency in milliseconds"
    );
    metrics::describe_counter!("veritext_errors_total", "Failed analyses, by error kind");

    info!("Metrics exporter initialized");
    Ok(handle)
}

