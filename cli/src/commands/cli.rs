use std::path::PathBuf;

use clap::Parser;
use sheet_analyst_core::api::DEFAULT_QUESTION;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sheet-analyst",
    version,
    about = "Analyze an Excel workbook using a hosted agent with Code Interpreter"
)]
pub struct Args {
    /// Path to the Excel workbook
    pub workbook: PathBuf,

    /// User question guiding the analysis
    #[arg(long, default_value = DEFAULT_QUESTION)]
    pub question: String,

    /// API key (optional if OPENAI_API_KEY env var is set)
    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub base_url: Option<String>,

    /// Where downloaded artifacts go (default: current directory)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Replace the built-in agent instructions with the contents of a file.
    #[arg(long)]
    pub instructions_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disable the polling spinner.
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}
