use std::sync::Arc;

use rivalscope_core::{AppConfig, CompetitorAnalysis, ScrapedPage};
use rivalscope_scraper::{extract_page, ExtractLimits, PageFetcher};

use crate::error::AnalyzerError;
use crate::model::{ChatCompletionsClient, CompletionClient};
use crate::prompt::{build_prompt_with_schema, AnalysisSchema, PromptPair};
use crate::response::parse_analysis;

/// Fetch, extract, prompt, complete, parse.
///
/// Every stage is callable on its own. Only [`Analyzer::request`] can fail:
/// scraping degrades to a placeholder page and parsing to a fallback report.
pub struct Analyzer {
    fetcher: PageFetcher,
    client: Arc<dyn CompletionClient>,
    limits: ExtractLimits,
    schema: AnalysisSchema,
}

impl Analyzer {
    #[must_use]
    pub fn new(
        fetcher: PageFetcher,
        client: Arc<dyn CompletionClient>,
        limits: ExtractLimits,
    ) -> Self {
        Self {
            fetcher,
            client,
            limits,
            schema: AnalysisSchema::Full,
        }
    }

    /// Wires the fetcher, extractor budgets and chat-completion client from
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Fetcher`] or [`AnalyzerError::Http`] if either
    /// HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, AnalyzerError> {
        let fetcher = PageFetcher::new(config.fetch_timeout(), &config.user_agent)?;
        let client = ChatCompletionsClient::from_config(config)?;
        Ok(Self::new(
            fetcher,
            Arc::new(client),
            ExtractLimits::from_config(config),
        ))
    }

    #[must_use]
    pub fn with_schema(mut self, schema: AnalysisSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Fetches and extracts `url`. A failed fetch yields a placeholder page
    /// naming the failure.
    pub async fn scrape(&self, url: &str) -> ScrapedPage {
        match self.fetcher.fetch_html(url).await {
            Ok(html) => {
                let page = extract_page(&html, url, &self.limits);
                tracing::info!(
                    url,
                    title = %page.title,
                    chars = page.text_content.len(),
                    links = page.links.len(),
                    "analyzer: scraped page"
                );
                page
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "analyzer: fetch failed, using placeholder page");
                ScrapedPage::placeholder(url, &e.to_string())
            }
        }
    }

    #[must_use]
    pub fn synthesize(&self, page: &ScrapedPage, url: &str) -> PromptPair {
        build_prompt_with_schema(page, url, self.schema)
    }

    /// One model call, no retry.
    ///
    /// # Errors
    ///
    /// Propagates the [`CompletionClient`] error.
    pub async fn request(&self, prompt: &PromptPair) -> Result<String, AnalyzerError> {
        self.client.complete(&prompt.system, &prompt.user).await
    }

    #[must_use]
    pub fn interpret(&self, raw: &str, url: &str) -> CompetitorAnalysis {
        parse_analysis(raw, url)
    }

    /// Runs every stage once.
    ///
    /// # Errors
    ///
    /// Returns the model client's error; no other stage fails.
    pub async fn analyze(&self, url: &str) -> Result<CompetitorAnalysis, AnalyzerError> {
        let page = self.scrape(url).await;
        let prompt = self.synthesize(&page, url);
        let raw = self.request(&prompt).await?;
        Ok(self.interpret(&raw, url))
    }
}
