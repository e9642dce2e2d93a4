//! Regex-only extraction, used when the DOM pass is unavailable.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use rivalscope_core::{PageLink, ScrapedPage};

use super::text::{clean_text, decode_entities, truncate_chars};
use super::{is_useful_meta, push_link, resolve_href, ExtractLimits};

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static BODY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*)").expect("valid body regex"));
static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid meta regex"));
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\b(name|property|content)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute regex")
});
static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')[^>]*>(.*?)</a\s*>"#)
        .expect("valid anchor regex")
});

pub(super) fn strip_tags(html: &str) -> String {
    clean_text(&decode_entities(&TAG_RE.replace_all(html, " ")))
}

pub(super) fn extract(
    html: &str,
    url: &str,
    base: Option<&reqwest::Url>,
    limits: &ExtractLimits,
) -> ScrapedPage {
    let body = BODY_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map_or(html, |m| m.as_str());

    ScrapedPage {
        url: url.to_string(),
        title: TITLE_RE
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| strip_tags(m.as_str()))
            .unwrap_or_default(),
        meta_tags: meta_tags(html),
        text_content: truncate_chars(&strip_tags(body), limits.max_text_chars),
        links: links(html, base, limits),
    }
}

fn meta_tags(html: &str) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    for tag in META_TAG_RE.find_iter(html) {
        let mut key = None;
        let mut content = None;
        for cap in ATTR_RE.captures_iter(tag.as_str()) {
            let value = cap
                .get(2)
                .or_else(|| cap.get(3))
                .map_or("", |m| m.as_str());
            match cap[1].to_ascii_lowercase().as_str() {
                "content" => content = Some(value),
                _ if key.is_none() => key = Some(value.trim().to_ascii_lowercase()),
                _ => {}
            }
        }
        let (Some(key), Some(content)) = (key, content) else {
            continue;
        };
        let content = clean_text(&decode_entities(content));
        if is_useful_meta(&key) && !content.is_empty() {
            tags.entry(key).or_insert(content);
        }
    }
    tags
}

fn links(html: &str, base: Option<&reqwest::Url>, limits: &ExtractLimits) -> Vec<PageLink> {
    let mut out = Vec::new();
    for cap in ANCHOR_RE.captures_iter(html) {
        if out.len() >= limits.max_links {
            break;
        }
        let href = cap.get(1).or_else(|| cap.get(2)).map_or("", |m| m.as_str());
        let Some(resolved) = resolve_href(base, &decode_entities(href)) else {
            continue;
        };
        let text = cap.get(3).map_or_else(String::new, |m| strip_tags(m.as_str()));
        push_link(&mut out, resolved, &text, limits);
    }
    out
}
