//! Plain-text rendering of a report for terminal use.

use std::fmt::Write as _;

use rivalscope_core::{parse_launch_date, CompetitorAnalysis, Launch};

pub(crate) fn render(doc: &CompetitorAnalysis) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", doc.website_url());
    if doc.is_partial() {
        let _ = writeln!(out, "(partial result)");
    }
    if let Some(error) = doc.error() {
        let _ = writeln!(out, "error: {error}");
    }

    section(&mut out, "Summary");
    let _ = writeln!(out, "  {}", text_or_unavailable(doc.summary()));

    let competitors = doc.competitors();
    section(&mut out, &format!("Competitors ({})", competitors.len()));
    for competitor in &competitors {
        let _ = write!(out, "  - {}", text_or_unavailable(&competitor.name));
        if !competitor.url.trim().is_empty() {
            let _ = write!(out, " <{}>", competitor.url.trim());
        }
        if !competitor.description.trim().is_empty() {
            let _ = write!(out, ": {}", competitor.description.trim());
        }
        out.push('\n');
    }

    for (title, summary) in [
        ("Pricing", doc.pricing_summary()),
        ("Social media", doc.social_media_summary()),
        ("Partnerships", doc.partnerships_summary()),
        ("Offerings", doc.offerings_summary()),
    ] {
        section(&mut out, title);
        let _ = writeln!(out, "  {summary}");
    }

    let launches = doc.launches_newest_first();
    section(&mut out, &format!("Recent launches ({})", launches.len()));
    for launch in launches {
        let _ = writeln!(out, "  - {}", launch_line(&launch));
    }

    out.trim_end().to_string()
}

fn section(out: &mut String, title: &str) {
    let _ = write!(out, "\n{title}\n");
}

fn text_or_unavailable(text: &str) -> &str {
    let text = text.trim();
    if text.is_empty() {
        rivalscope_core::NOT_AVAILABLE
    } else {
        text
    }
}

fn launch_line(launch: &Launch) -> String {
    let date = parse_launch_date(&launch.date).map_or_else(
        || launch.date.trim().to_string(),
        |d| d.format("%Y-%m-%d").to_string(),
    );
    let mut line = String::new();
    if !date.is_empty() {
        let _ = write!(line, "[{date}] ");
    }
    if !launch.company.trim().is_empty() {
        let _ = write!(line, "{}: ", launch.company.trim());
    }
    line.push_str(text_or_unavailable(&launch.name));
    if !launch.description.trim().is_empty() {
        let _ = write!(line, " - {}", launch.description.trim());
    }
    line
}
