use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use rivalscope_core::{PageLink, ScrapedPage};
use scraper::{ElementRef, Html, Selector};

use super::text::{clean_text, truncate_chars};
use super::{is_useful_meta, push_link, resolve_href, ExtractError, ExtractLimits};

const MAIN_CONTENT: &str = "## Main Content";
const PRICING_LINKS: &str = "## Pricing Links";
const ABOUT: &str = "## About";
const HEADER: &str = "## Header";
const FOOTER: &str = "## Footer";

struct Selectors {
    main: Selector,
    about: Selector,
    heading: Selector,
    header: Selector,
    footer: Selector,
    anchor: Selector,
    meta: Selector,
    title: Selector,
    body: Selector,
}

fn compile(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("{css}: {e:?}"))
}

static SELECTORS: LazyLock<Result<Selectors, String>> = LazyLock::new(|| {
    Ok(Selectors {
        main: compile(
            r#"main, article, [role="main"], #content, #main-content, .content, .main-content"#,
        )?,
        about: compile(r#"[id*="about"], [class*="about"]"#)?,
        heading: compile("h1, h2, h3")?,
        header: compile(r#"header, [role="banner"]"#)?,
        footer: compile(r#"footer, [role="contentinfo"]"#)?,
        anchor: compile("a[href]")?,
        meta: compile("meta")?,
        title: compile("title")?,
        body: compile("body")?,
    })
});

pub(super) fn extract(
    html: &str,
    url: &str,
    base: Option<&reqwest::Url>,
    limits: &ExtractLimits,
) -> Result<ScrapedPage, ExtractError> {
    let selectors = SELECTORS
        .as_ref()
        .map_err(|e| ExtractError::Selector(e.clone()))?;
    let document = Html::parse_document(html);

    let mut sections: Vec<(&str, String)> = Vec::new();
    sections.push((
        MAIN_CONTENT,
        section_text(document.select(&selectors.main), limits),
    ));
    sections.push((
        PRICING_LINKS,
        pricing_links(&document, selectors, base, limits),
    ));
    sections.push((ABOUT, about_text(&document, selectors, limits)));
    sections.push((
        HEADER,
        section_text(document.select(&selectors.header), limits),
    ));
    sections.push((
        FOOTER,
        section_text(document.select(&selectors.footer), limits),
    ));

    let important = sections
        .into_iter()
        .filter(|(_, body)| !body.is_empty())
        .map(|(label, body)| format!("{label}\n{body}"))
        .collect::<Vec<_>>()
        .join("\n\n");

    let text_content = if important.chars().count() >= limits.min_primary_chars {
        important
    } else {
        let body = document
            .select(&selectors.body)
            .next()
            .map_or_else(|| element_text(document.root_element()), element_text);
        if body.is_empty() {
            if has_visible_text(html) {
                return Err(ExtractError::EmptyDocument);
            }
            important
        } else {
            body
        }
    };

    Ok(ScrapedPage {
        url: url.to_string(),
        title: document
            .select(&selectors.title)
            .next()
            .map(element_text)
            .unwrap_or_default(),
        meta_tags: meta_tags(&document, selectors),
        text_content: truncate_chars(&text_content, limits.max_text_chars),
        links: links(&document, selectors, base, limits),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for chunk in element.text() {
        raw.push_str(chunk);
        raw.push(' ');
    }
    clean_text(&raw)
}

/// Joins the text of matched elements, skipping any element nested inside an
/// earlier match so shared content is counted once.
fn section_text<'a>(
    elements: impl IntoIterator<Item = ElementRef<'a>>,
    limits: &ExtractLimits,
) -> String {
    let mut taken = HashSet::new();
    let mut parts = Vec::new();
    for element in elements {
        if element.ancestors().any(|a| taken.contains(&a.id())) || !taken.insert(element.id()) {
            continue;
        }
        let text = element_text(element);
        if !text.is_empty() {
            parts.push(text);
        }
    }
    truncate_chars(&parts.join("\n"), limits.max_section_chars)
}

/// Elements whose id or class mentions "about", plus the block introduced by
/// any heading that mentions it. Page-level containers never count.
fn about_text(document: &Html, selectors: &Selectors, limits: &ExtractLimits) -> String {
    let matched: HashSet<_> = document
        .select(&selectors.about)
        .filter(|e| !is_page_container(*e))
        .map(|e| e.id())
        .collect();
    let inside_match = |e: ElementRef<'_>| e.ancestors().any(|a| matched.contains(&a.id()));

    let mut blocks = Vec::new();
    for element in document.select(&selectors.about) {
        if matched.contains(&element.id()) && !inside_match(element) {
            blocks.push((element.id(), element_text(element)));
        }
    }
    for heading in document.select(&selectors.heading) {
        if inside_match(heading) || !element_text(heading).to_lowercase().contains("about") {
            continue;
        }
        blocks.push((heading.id(), heading_block(heading)));
    }

    blocks.sort_by_key(|(id, _)| *id);
    let parts: Vec<String> = blocks
        .into_iter()
        .map(|(_, text)| text)
        .filter(|text| !text.is_empty())
        .collect();
    truncate_chars(&parts.join("\n"), limits.max_section_chars)
}

fn is_page_container(element: ElementRef<'_>) -> bool {
    matches!(element.value().name(), "html" | "body" | "main")
}

fn heading_level(element: ElementRef<'_>) -> Option<u8> {
    match element.value().name() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// The heading and the siblings after it, up to the next heading of the same
/// or a higher level or the next landmark element.
fn heading_block(heading: ElementRef<'_>) -> String {
    let level = heading_level(heading).unwrap_or(6);
    let mut parts = vec![element_text(heading)];
    for sibling in heading.next_siblings() {
        let text = if let Some(element) = ElementRef::wrap(sibling) {
            let ends_block = heading_level(element).is_some_and(|l| l <= level)
                || matches!(
                    element.value().name(),
                    "header" | "footer" | "nav" | "main" | "section" | "article" | "aside"
                );
            if ends_block {
                break;
            }
            element_text(element)
        } else if let Some(text) = sibling.value().as_text() {
            clean_text(text)
        } else {
            continue;
        };
        parts.push(text);
    }
    parts.retain(|part| !part.is_empty());
    parts.join(" ")
}

fn pricing_links(
    document: &Html,
    selectors: &Selectors,
    base: Option<&reqwest::Url>,
    limits: &ExtractLimits,
) -> String {
    let mut seen = HashSet::new();
    let mut lines = Vec::new();
    for anchor in document.select(&selectors.anchor) {
        if lines.len() >= limits.max_pricing_links {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let text = element_text(anchor);
        let href_lower = href.to_lowercase();
        let text_lower = text.to_lowercase();
        let looks_like_pricing = ["pricing", "plans"]
            .iter()
            .any(|kw| href_lower.contains(kw) || text_lower.contains(kw));
        if !looks_like_pricing {
            continue;
        }
        let Some(resolved) = resolve_href(base, href) else {
            continue;
        };
        if seen.insert(resolved.clone()) {
            let label = if text.is_empty() { "Pricing" } else { text.as_str() };
            lines.push(format!("- {label}: {resolved}"));
        }
    }
    lines.join("\n")
}

fn meta_tags(document: &Html, selectors: &Selectors) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    for meta in document.select(&selectors.meta) {
        let element = meta.value();
        let Some(key) = element.attr("name").or_else(|| element.attr("property")) else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        if !is_useful_meta(&key) {
            continue;
        }
        let content = clean_text(element.attr("content").unwrap_or_default());
        if !content.is_empty() {
            tags.entry(key).or_insert(content);
        }
    }
    tags
}

fn links(
    document: &Html,
    selectors: &Selectors,
    base: Option<&reqwest::Url>,
    limits: &ExtractLimits,
) -> Vec<PageLink> {
    let mut out = Vec::new();
    for anchor in document.select(&selectors.anchor) {
        if out.len() >= limits.max_links {
            break;
        }
        let Some(resolved) = anchor
            .value()
            .attr("href")
            .and_then(|href| resolve_href(base, href))
        else {
            continue;
        };
        push_link(&mut out, resolved, &element_text(anchor), limits);
    }
    out
}

fn has_visible_text(html: &str) -> bool {
    super::fallback::strip_tags(html).chars().any(|c| !c.is_whitespace())
}
