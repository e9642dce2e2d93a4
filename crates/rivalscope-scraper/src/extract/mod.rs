//! HTML to [`ScrapedPage`] conversion.
//!
//! The structured pass walks the parsed DOM and assembles labelled sections in
//! priority order (main content, pricing links, about, header, footer). When
//! that pass cannot run, or finds nothing in markup that plainly has text, a
//! regex pass strips tags from the whole document instead. Either way the
//! result is clamped to [`ExtractLimits`].

mod fallback;
mod structured;
mod text;

use rivalscope_core::{AppConfig, PageLink, ScrapedPage};
use thiserror::Error;

pub use text::{clean_text, truncate_chars};

/// Meta tags worth sending to the model. Everything else is noise.
const META_ALLOWLIST: [&str; 6] = [
    "description",
    "keywords",
    "og:title",
    "og:description",
    "twitter:title",
    "twitter:description",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractLimits {
    /// Budget for `ScrapedPage::text_content`.
    pub max_text_chars: usize,
    /// Below this many characters of section text, the whole body is used.
    pub min_primary_chars: usize,
    pub max_section_chars: usize,
    pub max_links: usize,
    pub max_pricing_links: usize,
    /// Anchors with less visible text than this are dropped.
    pub min_link_text_chars: usize,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self {
            max_text_chars: 15_000,
            min_primary_chars: 1_000,
            max_section_chars: 4_000,
            max_links: 50,
            max_pricing_links: 10,
            min_link_text_chars: 2,
        }
    }
}

impl ExtractLimits {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_text_chars: config.extract_max_text_chars,
            max_links: config.extract_max_links,
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
enum ExtractError {
    #[error("selector failed to compile: {0}")]
    Selector(String),

    #[error("parsed document has no text although the markup does")]
    EmptyDocument,
}

/// Converts raw HTML fetched from `url` into a bounded transcript.
///
/// Never fails. `text_content` is at most `limits.max_text_chars` characters
/// and `links` at most `limits.max_links` entries for any input.
#[must_use]
pub fn extract_page(html: &str, url: &str, limits: &ExtractLimits) -> ScrapedPage {
    let base = reqwest::Url::parse(url).ok();
    let cleaned = text::strip_non_text(html);

    let mut page = match structured::extract(&cleaned, url, base.as_ref(), limits) {
        Ok(page) => page,
        Err(e) => {
            tracing::debug!(url, error = %e, "extractor: structured pass failed, using regex pass");
            fallback::extract(&cleaned, url, base.as_ref(), limits)
        }
    };

    page.text_content = truncate_chars(&page.text_content, limits.max_text_chars);
    page.links.truncate(limits.max_links);
    page
}

fn is_useful_meta(key: &str) -> bool {
    META_ALLOWLIST.contains(&key)
}

/// Resolves an anchor target against the page URL. Fragment-only and
/// `javascript:` targets yield `None`.
fn resolve_href(base: Option<&reqwest::Url>, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href
            .get(..11)
            .is_some_and(|p| p.eq_ignore_ascii_case("javascript:"))
    {
        return None;
    }

    match base {
        Some(base) => base.join(href).ok().map(|u| u.to_string()),
        None => reqwest::Url::parse(href).ok().map(|u| u.to_string()),
    }
}

/// Appends a link unless its text is too short, its URL was already seen, or
/// the budget is spent.
fn push_link(links: &mut Vec<PageLink>, url: String, text: &str, limits: &ExtractLimits) {
    if links.len() >= limits.max_links
        || text.chars().count() < limits.min_link_text_chars
        || links.iter().any(|l| l.url == url)
    {
        return;
    }
    links.push(PageLink {
        url,
        text: text.to_string(),
    });
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
