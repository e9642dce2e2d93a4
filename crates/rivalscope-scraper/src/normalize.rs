use std::sync::LazyLock;

use regex::Regex;

use crate::ScraperError;

/// Minimal `scheme://host.tld` shape with optional port and path.
static URL_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://[a-z0-9-]+(?:\.[a-z0-9-]+)+(?::\d{1,5})?(?:[/?#]\S*)?$")
        .expect("valid url shape regex")
});

/// Normalizes user input into an absolute `http(s)` URL.
///
/// Prepends `https://` when no scheme is given, lower-cases the scheme and
/// strips trailing slashes. Applying it to its own output is a no-op.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] when the input is empty, uses a scheme
/// other than `http`/`https`, or does not look like `scheme://host.tld`.
pub fn normalize_url(raw: &str) -> Result<String, ScraperError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid(raw, "URL is required"));
    }

    let with_scheme = match trimmed.split_once("://") {
        Some((scheme, rest)) => {
            let scheme = scheme.to_ascii_lowercase();
            if scheme != "http" && scheme != "https" {
                return Err(invalid(raw, "only http and https URLs are supported"));
            }
            format!("{scheme}://{rest}")
        }
        None => format!("https://{trimmed}"),
    };

    let normalized = with_scheme.trim_end_matches('/').to_string();
    if !URL_SHAPE_RE.is_match(&normalized) {
        return Err(invalid(raw, "expected a URL like https://example.com"));
    }
    Ok(normalized)
}

/// Host portion of `url`, without port. Falls back to the text between the
/// scheme and the first path separator when the URL does not parse.
#[must_use]
pub fn host_of(url: &str) -> String {
    if let Some(host) = reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    {
        return host;
    }

    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    without_scheme
        .split(['/', '?', '#', ':'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn invalid(url: &str, reason: &str) -> ScraperError {
    ScraperError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
