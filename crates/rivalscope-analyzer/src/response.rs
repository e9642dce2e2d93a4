//! Recovers a [`CompetitorAnalysis`] from free-text model output.
//!
//! Candidates are tried in order:
//!
//! 1. the body of a fenced code block (```` ```json ... ``` ````),
//! 2. the span from the first `{` to the last `}`,
//! 3. every balanced top-level object, last one first,
//! 4. a repaired version of a reply that was cut off mid-object.
//!
//! The first candidate that is a JSON object carrying at least one report
//! field wins and is returned as written. If none does, the deterministic
//! fallback document is returned. Parsed documents are not backfilled beyond
//! `websiteUrl`.

use std::sync::LazyLock;

use regex::Regex;
use rivalscope_core::CompetitorAnalysis;
use serde_json::{Map, Value};

static FENCED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z]*\s*(\{.*?\})\s*```").expect("valid fenced block regex")
});

const REPORT_KEYS: [&str; 8] = [
    "websiteUrl",
    "summary",
    "competitors",
    "pricing",
    "socialMedia",
    "partnerships",
    "offerings",
    "recentLaunches",
];

/// Cut-off replies are repaired at most at this many earlier commas.
const MAX_REPAIR_ATTEMPTS: usize = 16;

/// Parses the model reply for `url`. Total: any input yields a document.
#[must_use]
pub fn parse_analysis(raw: &str, url: &str) -> CompetitorAnalysis {
    match find_report(raw) {
        Ok(mut doc) => {
            if doc.website_url().trim().is_empty() {
                doc.set_website_url(url);
            }
            doc
        }
        Err(reason) => {
            tracing::warn!(url, reason = %reason, "parser: using fallback document");
            CompetitorAnalysis::fallback(url, &reason)
        }
    }
}

fn find_report(raw: &str) -> Result<CompetitorAnalysis, String> {
    if raw.trim().is_empty() {
        return Err("empty response from model".to_string());
    }
    if !raw.contains('{') {
        return Err("no JSON object found in model response".to_string());
    }

    let mut last_error = None;
    let mut saw_object = false;

    let mut try_candidate = |candidate: &str| -> Option<CompetitorAnalysis> {
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(map)) => {
                saw_object = true;
                interpret(map)
            }
            Ok(_) => None,
            Err(e) => {
                last_error = Some(e.to_string());
                None
            }
        }
    };

    for cap in FENCED_RE.captures_iter(raw) {
        if let Some(doc) = cap.get(1).and_then(|m| try_candidate(m.as_str())) {
            return Ok(doc);
        }
    }

    if let Some(doc) = greedy_span(raw).and_then(&mut try_candidate) {
        return Ok(doc);
    }

    for candidate in balanced_objects(raw).into_iter().rev() {
        if let Some(doc) = try_candidate(candidate) {
            return Ok(doc);
        }
    }

    for candidate in repaired_candidates(raw) {
        if let Some(doc) = try_candidate(&candidate) {
            tracing::debug!("parser: recovered truncated model response");
            return Ok(doc);
        }
    }

    Err(match (saw_object, last_error) {
        (true, _) => "JSON in model response has no analysis fields".to_string(),
        (false, Some(e)) => format!("model response was not valid JSON: {e}"),
        (false, None) => "no JSON object found in model response".to_string(),
    })
}

fn interpret(map: Map<String, Value>) -> Option<CompetitorAnalysis> {
    if !REPORT_KEYS.iter().any(|key| map.contains_key(*key)) {
        return None;
    }
    Some(CompetitorAnalysis::from(map))
}

fn greedy_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Top-level balanced `{...}` spans in document order. Braces inside JSON
/// strings are ignored.
fn balanced_objects(raw: &str) -> Vec<&str> {
    let bytes = raw.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if let Some(end) = matching_brace(bytes, i) {
                found.push(&raw[i..=end]);
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }
    found
}

fn matching_brace(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            match (escaped, b) {
                (true, _) => escaped = false,
                (false, b'\\') => escaped = true,
                (false, b'"') => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Closes a reply that stops mid-object. The first candidate closes the text
/// as-is; later ones cut back to successively earlier commas so a dangling
/// key or half-written value is dropped.
fn repaired_candidates(raw: &str) -> Vec<String> {
    let Some(start) = raw.find('{') else {
        return Vec::new();
    };
    let text = &raw[start..];

    let mut stack: Vec<u8> = Vec::new();
    let mut cuts: Vec<(usize, Vec<u8>)> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in text.as_bytes().iter().enumerate() {
        if in_string {
            match (escaped, b) {
                (true, _) => escaped = false,
                (false, b'\\') => escaped = true,
                (false, b'"') => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => stack.push(b),
            b'}' | b']' => {
                if stack.pop().is_none() {
                    // Closed more than it opened: not a truncation.
                    return Vec::new();
                }
                if stack.is_empty() {
                    // A complete object; strategies above already covered it.
                    return Vec::new();
                }
            }
            b',' => cuts.push((i, stack.clone())),
            _ => {}
        }
    }

    if stack.is_empty() {
        return Vec::new();
    }

    let mut candidates = Vec::new();

    let mut whole = text.to_string();
    if in_string {
        if escaped {
            whole.pop();
        }
        whole.push('"');
    }
    let trimmed_len = whole.trim_end().trim_end_matches(',').trim_end().len();
    whole.truncate(trimmed_len);
    if whole.ends_with(':') {
        whole.push_str(" null");
    }
    candidates.push(close(whole, &stack));

    for (cut, open) in cuts.into_iter().rev().take(MAX_REPAIR_ATTEMPTS) {
        candidates.push(close(text[..cut].to_string(), &open));
    }
    candidates
}

fn close(mut text: String, open: &[u8]) -> String {
    for &b in open.iter().rev() {
        text.push(if b == b'{' { '}' } else { ']' });
    }
    text
}

#[cfg(test)]
#[path = "response_test.rs"]
mod tests;
