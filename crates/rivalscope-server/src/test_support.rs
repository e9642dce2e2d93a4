//! Fixtures shared by the orchestrator and API tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rivalscope_analyzer::{Analyzer, AnalyzerError, CompletionClient};
use rivalscope_core::{AppConfig, Environment};
use rivalscope_scraper::{ExtractLimits, PageFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::jobs::{MemoryJobStore, Orchestrator, OrchestratorSettings};

pub(crate) const SITE_HTML: &str = r#"<!doctype html>
<html>
  <head>
    <title>Acme Rockets</title>
    <meta name="description" content="Reusable rockets for small teams">
  </head>
  <body>
    <main>
      <h1>Launch with Acme</h1>
      <p>Acme builds reusable rockets and sells rides to orbit for small satellite teams.</p>
      <a href="/pricing">Pricing</a>
    </main>
  </body>
</html>"#;

pub(crate) const REPORT_JSON: &str = r#"```json
{
  "summary": "Acme sells rides to orbit for small satellite teams.",
  "competitors": [{"name": "Rocket Lab", "url": "https://rocketlabusa.com"}],
  "recentLaunches": [{"name": "Acme One", "date": "2024-03-01", "description": "First flight"}]
}
```"#;

/// Scripted model: sleeps `delay`, fails the first `failures` calls with
/// HTTP `failure_status`, then returns `reply`.
pub(crate) struct StubClient {
    pub(crate) reply: String,
    pub(crate) delay: Duration,
    pub(crate) failures: u32,
    pub(crate) failure_status: u16,
    pub(crate) panic: bool,
    pub(crate) calls: AtomicU32,
}

impl StubClient {
    pub(crate) fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            delay: Duration::ZERO,
            failures: 0,
            failure_status: 503,
            panic: false,
            calls: AtomicU32::new(0),
        }
    }

    pub(crate) fn report() -> Self {
        Self::replying(REPORT_JSON)
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn failing(mut self, failures: u32, status: u16) -> Self {
        self.failures = failures;
        self.failure_status = status;
        self
    }

    pub(crate) fn panicking(mut self) -> Self {
        self.panic = true;
        self
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for StubClient {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, AnalyzerError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        assert!(!self.panic, "stub model client panicked");
        if call < self.failures {
            return Err(AnalyzerError::Api {
                status: self.failure_status,
                body: "stub failure".to_string(),
            });
        }
        Ok(self.reply.clone())
    }
}

pub(crate) fn settings(deadline: Duration) -> OrchestratorSettings {
    OrchestratorSettings {
        deadline,
        inline_max_url_len: 100,
        max_retries: 3,
        backoff_base_secs: 0,
    }
}

pub(crate) fn orchestrator(
    client: Arc<StubClient>,
    settings: OrchestratorSettings,
) -> Arc<Orchestrator> {
    let fetcher = PageFetcher::new(Duration::from_secs(5), "rivalscope-test").unwrap();
    let analyzer = Analyzer::new(fetcher, client, ExtractLimits::default());
    Arc::new(Orchestrator::new(
        Arc::new(analyzer),
        Arc::new(MemoryJobStore::new()),
        settings,
    ))
}

pub(crate) async fn site() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(SITE_HTML),
        )
        .mount(&server)
        .await;
    server
}

pub(crate) fn test_config(debug_endpoints: bool) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "info".to_string(),
        fetch_timeout_secs: 5,
        user_agent: "rivalscope-test".to_string(),
        analysis_timeout_secs: 10,
        inline_max_url_len: 100,
        job_ttl_secs: 3600,
        debug_endpoints,
        model_api_key: None,
        model_base_url: "http://127.0.0.1:9".to_string(),
        model_name: "sonar".to_string(),
        model_timeout_secs: 5,
        model_max_retries: 3,
        model_retry_backoff_base_secs: 0,
        extract_max_text_chars: 15_000,
        extract_max_links: 50,
    }
}
