mod analyze;
mod digest;
mod extract;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rivalscope-cli")]
#[command(about = "Competitive analysis of a company website from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape a website and ask the model for a competitive analysis.
    Analyze(AnalyzeArgs),
    /// Print the page transcript that would be sent to the model.
    Extract(ExtractArgs),
}

#[derive(Debug, Args)]
pub(crate) struct AnalyzeArgs {
    /// Website to analyze, with or without scheme.
    pub(crate) url: String,

    /// Ask for the short legacy report (summary, competitors, launches).
    #[arg(long)]
    pub(crate) minimal: bool,

    /// Overall deadline in seconds; defaults to RIVALSCOPE_ANALYSIS_TIMEOUT_SECS.
    #[arg(long)]
    pub(crate) timeout_secs: Option<u64>,

    /// Pretty-print the JSON report.
    #[arg(long, conflicts_with = "summary")]
    pub(crate) pretty: bool,

    /// Print a human-readable digest instead of JSON.
    #[arg(long)]
    pub(crate) summary: bool,
}

#[derive(Debug, Args)]
pub(crate) struct ExtractArgs {
    /// Website to fetch, with or without scheme.
    pub(crate) url: String,

    /// Print the extracted page as JSON instead of the transcript.
    #[arg(long)]
    pub(crate) json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = rivalscope_core::load_app_config()?;

    // Logs go to stderr so stdout stays machine-readable.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => analyze::run(&config, &args).await,
        Commands::Extract(args) => extract::run(&config, &args).await,
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
