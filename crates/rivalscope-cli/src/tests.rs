use clap::Parser;
use rivalscope_core::CompetitorAnalysis;
use serde_json::{json, Value};

use super::{Cli, Commands};
use crate::digest;

fn report(value: Value) -> CompetitorAnalysis {
    serde_json::from_value(value).unwrap()
}

#[test]
fn analyze_flags_parse() {
    let cli = Cli::try_parse_from([
        "rivalscope-cli",
        "analyze",
        "acme.io",
        "--minimal",
        "--timeout-secs",
        "20",
        "--summary",
    ])
    .unwrap();
    let Commands::Analyze(args) = cli.command else {
        panic!("expected analyze");
    };
    assert_eq!(args.url, "acme.io");
    assert!(args.minimal);
    assert_eq!(args.timeout_secs, Some(20));
    assert!(args.summary);
    assert!(!args.pretty);
}

#[test]
fn pretty_and_summary_conflict() {
    let result = Cli::try_parse_from(["rivalscope-cli", "analyze", "acme.io", "--pretty", "--summary"]);
    assert!(result.is_err());
}

#[test]
fn extract_requires_url() {
    assert!(Cli::try_parse_from(["rivalscope-cli", "extract"]).is_err());
    let cli = Cli::try_parse_from(["rivalscope-cli", "extract", "acme.io", "--json"]).unwrap();
    assert!(matches!(cli.command, Commands::Extract(ref a) if a.json));
}

#[test]
fn digest_orders_launches_newest_first() {
    let doc = report(json!({
        "websiteUrl": "https://acme.io",
        "summary": "Acme sells rockets.",
        "recentLaunches": [
            {"name": "Old", "date": "January 2023"},
            {"name": "Undated", "date": "soon"},
            {"name": "New", "date": "2024-03-01"}
        ]
    }));

    let text = digest::render(&doc);
    let new = text.find("[2024-03-01] New").unwrap();
    let old = text.find("[2023-01-01] Old").unwrap();
    let undated = text.find("[soon] Undated").unwrap();
    assert!(new < old && old < undated, "{text}");
}

#[test]
fn digest_marks_missing_sections() {
    let doc = report(json!({
        "websiteUrl": "https://acme.io",
        "competitors": [{"name": "Globex", "url": "https://globex.com"}]
    }));

    let text = digest::render(&doc);
    assert!(text.contains("Competitors (1)"));
    assert!(text.contains("- Globex <https://globex.com>"));
    assert!(text.contains("Pricing\n  Not available"));
    assert!(text.contains("Summary\n  Not available"));
}

#[test]
fn digest_flags_partial_results() {
    let doc = CompetitorAnalysis::partial("https://acme.io", Some("page title \"Acme\""));
    let text = digest::render(&doc);
    assert!(text.contains("(partial result)"));
    assert!(text.contains("error: "));
}
