use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));

/// One pattern per non-textual element; the regex engine has no
/// backreferences to match the closing tag generically.
static NON_TEXT_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["script", "style", "noscript", "svg", "iframe", "template"]
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"))
                .expect("valid non-text element regex")
        })
        .collect()
});

/// Removes comments and elements whose content is never visible prose.
pub(super) fn strip_non_text(html: &str) -> String {
    let mut out = COMMENT_RE.replace_all(html, " ").into_owned();
    for re in NON_TEXT_RES.iter() {
        out = re.replace_all(&out, " ").into_owned();
    }
    out
}

/// Collapses runs of whitespace into single spaces and trims.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    WHITESPACE_RE.replace_all(raw, " ").trim().to_string()
}

/// Decodes the handful of entities that matter for prose.
pub(super) fn decode_entities(raw: &str) -> String {
    raw.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// First `max` characters of `s`. Never splits a multi-byte character.
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
