use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "veritext")]
#[command(author, version, about = "Detect AI-generated text, segment by segment")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "VERITEXT_CONFIG", default_value = "veritext.yaml")]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text, env = "VERITEXT_LOG_FORMAT")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server and UI
    Serve {
        /// Listen address
        #[arg(short, long, env = "VERITEXT_ADDRESS")]
        address: Option<String>,

        /// Listen port
        #[arg(short, long, env = "VERITEXT_PORT")]
        port: Option<u16>,

        /// Load the model before accepting requests instead of on first use
        #[arg(long)]
        preload: bool,

        /// Accept cross-origin requests from any origin
        #[arg(long)]
        allow_any_origin: bool,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Analyze a file (or stdin) and print the report
    Analyze {
        /// Input file; reads stdin when omitted or "-"
        input: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,

        #[command(flatten)]
        model: ModelArgs,
    },
}

/// Model selection overrides shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// Hugging Face repository of the detector model
    #[arg(long, env = "VERITEXT_MODEL_REPO", conflicts_with_all = ["model_dir", "builtin"])]
    pub model_repo: Option<String>,

    /// Local directory with config.json, tokenizer files and weights
    #[arg(long, env = "VERITEXT_MODEL_DIR", conflicts_with = "builtin")]
    pub model_dir: Option<PathBuf>,

    /// Use the offline lexicon classifier (no model download)
    #[arg(long)]
    pub builtin: bool,

    /// Directory for downloaded models
    #[arg(long, env = "VERITEXT_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Verdict, percentages and bucket breakdown
    Summary,
    /// Full report as JSON
    Json,
}
