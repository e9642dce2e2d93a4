use std::time::Duration;

use anyhow::bail;
use rivalscope_analyzer::{AnalysisSchema, Analyzer};
use rivalscope_core::{AppConfig, CompetitorAnalysis};
use rivalscope_scraper::normalize_url;

use crate::{digest, AnalyzeArgs};

pub(crate) async fn run(config: &AppConfig, args: &AnalyzeArgs) -> anyhow::Result<()> {
    if !config.has_model_api_key() {
        bail!("RIVALSCOPE_MODEL_API_KEY (or PERPLEXITY_API_KEY) must be set to run an analysis");
    }
    let url = normalize_url(&args.url)?;
    let schema = if args.minimal {
        AnalysisSchema::Minimal
    } else {
        AnalysisSchema::Full
    };
    let analyzer = Analyzer::from_config(config)?.with_schema(schema);
    let deadline = args
        .timeout_secs
        .map_or_else(|| config.analysis_timeout(), Duration::from_secs);

    tracing::info!(url = %url, ?schema, deadline_secs = deadline.as_secs(), "cli: analyzing");
    let started = std::time::Instant::now();

    let doc = match tokio::time::timeout(deadline, analyzer.analyze(&url)).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::warn!(url = %url, "cli: deadline reached before the model answered");
            CompetitorAnalysis::partial(&url, None)
        }
    };

    tracing::info!(
        url = %url,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "cli: analysis finished"
    );

    let rendered = if args.summary {
        digest::render(&doc)
    } else if args.pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    println!("{rendered}");
    Ok(())
}
