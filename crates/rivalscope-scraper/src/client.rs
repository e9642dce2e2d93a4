//! HTTP client for downloading a target site's landing page.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;

/// Upper bound on TCP/TLS connect time, independent of the overall deadline.
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches raw HTML with a browser-like identity and a hard deadline.
///
/// The deadline is enforced by reqwest at the client level, so an expired
/// request is aborted on the socket rather than left running.
pub struct PageFetcher {
    client: Client,
    timeout: Duration,
}

impl PageFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, timeout })
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Downloads the body of `url` as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Timeout`]: the deadline elapsed before the body arrived.
    /// - [`ScraperError::UnexpectedStatus`]: any non-2xx response.
    /// - [`ScraperError::Http`]: network or TLS failure.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(url, e))?;
        tracing::debug!(url, bytes = body.len(), "fetcher: downloaded page");
        Ok(body)
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> ScraperError {
        if err.is_timeout() {
            ScraperError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            ScraperError::Http(err)
        }
    }
}
