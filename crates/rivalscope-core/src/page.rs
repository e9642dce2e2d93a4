use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Bounded plain-text view of one fetched page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedPage {
    pub url: String,
    pub title: String,
    pub meta_tags: BTreeMap<String, String>,
    pub text_content: String,
    pub links: Vec<PageLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub url: String,
    pub text: String,
}

impl ScrapedPage {
    /// Synthetic page used when the site could not be retrieved, so the
    /// model still receives an honest transcript naming the failure.
    #[must_use]
    pub fn placeholder(url: &str, reason: &str) -> Self {
        Self {
            url: url.to_string(),
            title: String::new(),
            meta_tags: BTreeMap::new(),
            text_content: format!(
                "The website at {url} could not be retrieved ({reason}). \
                 Base the analysis on what is publicly known about this domain."
            ),
            links: Vec::new(),
        }
    }

    /// The `description` meta tag, falling back to its Open Graph variant.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        ["description", "og:description", "twitter:description"]
            .iter()
            .find_map(|key| self.meta_tags.get(*key))
            .map(String::as_str)
            .filter(|d| !d.trim().is_empty())
    }

    /// Renders the page in the layout embedded into the analysis prompt.
    #[must_use]
    pub fn transcript(&self) -> String {
        let mut out = String::with_capacity(self.text_content.len() + 512);
        let _ = writeln!(out, "Website URL: {}", self.url);
        let _ = writeln!(out, "Website Title: {}", self.title);

        out.push_str("\nMeta Tags:\n");
        for (key, value) in &self.meta_tags {
            let _ = writeln!(out, "- {key}: {value}");
        }

        out.push_str("\nWebsite Content:\n");
        out.push_str(&self.text_content);
        out.push('\n');

        out.push_str("\nWebsite Links:\n");
        for link in &self.links {
            let _ = writeln!(out, "- {}: {}", link.text, link.url);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_lists_every_part_in_order() {
        let mut meta_tags = BTreeMap::new();
        meta_tags.insert("description".to_string(), "Rockets".to_string());
        let page = ScrapedPage {
            url: "https://acme.io".to_string(),
            title: "Acme".to_string(),
            meta_tags,
            text_content: "We build rockets.".to_string(),
            links: vec![PageLink {
                url: "https://acme.io/pricing".to_string(),
                text: "Pricing".to_string(),
            }],
        };

        let transcript = page.transcript();
        let url = transcript.find("Website URL: https://acme.io").expect("url");
        let meta = transcript.find("- description: Rockets").expect("meta");
        let content = transcript.find("We build rockets.").expect("content");
        let link = transcript
            .find("- Pricing: https://acme.io/pricing")
            .expect("link");
        assert!(url < meta && meta < content && content < link);
    }

    #[test]
    fn placeholder_names_the_failure() {
        let page = ScrapedPage::placeholder("https://acme.io", "request timed out");
        assert!(page.text_content.contains("request timed out"));
        assert!(page.links.is_empty());
        assert!(page.description().is_none());
    }

    #[test]
    fn description_prefers_plain_meta_tag() {
        let mut page = ScrapedPage::default();
        page.meta_tags
            .insert("og:description".to_string(), "og".to_string());
        assert_eq!(page.description(), Some("og"));
        page.meta_tags
            .insert("description".to_string(), "plain".to_string());
        assert_eq!(page.description(), Some("plain"));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(ScrapedPage::default()).expect("serialize");
        assert!(value.get("metaTags").is_some());
        assert!(value.get("textContent").is_some());
    }
}
