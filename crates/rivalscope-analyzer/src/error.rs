use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("completion API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("completion response could not be decoded: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("completion response contained no message content")]
    EmptyResponse,

    #[error("page fetcher could not be built: {0}")]
    Fetcher(#[from] rivalscope_scraper::ScraperError),
}

impl AnalyzerError {
    /// Returns `true` for failures worth retrying after a backoff: transport
    /// errors, HTTP 429 and 5xx responses.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            AnalyzerError::Http(e) => !e.is_builder(),
            AnalyzerError::Api { status, .. } => *status == 429 || *status >= 500,
            AnalyzerError::MissingApiKey
            | AnalyzerError::Deserialize(_)
            | AnalyzerError::EmptyResponse
            | AnalyzerError::Fetcher(_) => false,
        }
    }
}
