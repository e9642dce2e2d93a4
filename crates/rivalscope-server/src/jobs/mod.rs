//! Analysis job orchestration.
//!
//! [`Orchestrator::submit`] validates the url, registers a `processing` job,
//! and runs scrape, prompt, model call (with retry) and parse under one
//! deadline. Short single-url inputs are awaited inline; anything else runs in
//! the background and is polled through the job store.
//!
//! Every job reaches exactly one terminal state. The pipeline runs inside a
//! spawned task supervised by a second task, so a panic or a dropped HTTP
//! request still ends with a terminal write.

mod id;
mod retry;
pub mod store;

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use chrono::Utc;
use rivalscope_analyzer::{Analyzer, AnalyzerError};
use rivalscope_core::{
    AnalysisJob, AppConfig, CompetitorAnalysis, JobFailure, JobOutcome, JobState, ScrapedPage,
};
use rivalscope_scraper::{normalize_url, ScraperError};
use serde::Serialize;
use tokio::task::JoinHandle;

use self::id::JobIdGenerator;
use self::retry::retry_with_backoff;
pub use self::store::{JobStore, MemoryJobStore};

pub(crate) const FAILURE_MESSAGE: &str = "Failed to analyze website";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMethod {
    Synchronous,
    Background,
}

impl ProcessingMethod {
    /// Inline processing is reserved for one short url. Longer inputs, or
    /// anything that looks like a list, go to the background.
    #[must_use]
    pub fn select(raw: &str, inline_max_len: usize) -> Self {
        let raw = raw.trim();
        if raw.chars().count() <= inline_max_len && !raw.contains([',', ';']) {
            ProcessingMethod::Synchronous
        } else {
            ProcessingMethod::Background
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorSettings {
    pub deadline: Duration,
    pub inline_max_url_len: usize,
    pub max_retries: u32,
    pub backoff_base_secs: u64,
}

impl OrchestratorSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            deadline: config.analysis_timeout(),
            inline_max_url_len: config.inline_max_url_len,
            max_retries: config.model_max_retries,
            backoff_base_secs: config.model_retry_backoff_base_secs,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Ran inline; the job is already terminal.
    Finished {
        job_id: String,
        state: JobState,
        outcome: JobOutcome,
    },
    /// Running in the background; poll by `job_id`.
    Accepted { job_id: String, website_url: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    InvalidUrl(#[from] ScraperError),

    #[error("analysis task for job {job_id} failed: {reason}")]
    Internal { job_id: String, reason: String },
}

pub struct Orchestrator {
    analyzer: Arc<Analyzer>,
    store: Arc<dyn JobStore>,
    settings: OrchestratorSettings,
    ids: JobIdGenerator,
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        analyzer: Arc<Analyzer>,
        store: Arc<dyn JobStore>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            analyzer,
            store,
            settings,
            ids: JobIdGenerator::default(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    /// Current record for `job_id`, or `None` if it never existed or was
    /// evicted.
    pub async fn status(&self, job_id: &str) -> Option<AnalysisJob> {
        self.store.get(job_id).await
    }

    /// Validates `raw`, registers a job and starts it.
    ///
    /// # Errors
    ///
    /// [`SubmitError::InvalidUrl`] if `raw` is not an http(s) url; no job is
    /// created. [`SubmitError::Internal`] if the supervising task of an inline
    /// job dies; the job itself may still be `processing`.
    pub async fn submit(self: &Arc<Self>, raw: &str) -> Result<Submission, SubmitError> {
        let website_url = normalize_url(raw)?;
        let method = ProcessingMethod::select(raw, self.settings.inline_max_url_len);

        let job_id = self.register(&website_url).await;
        tracing::info!(job_id = %job_id, url = %website_url, ?method, "orchestrator: job accepted");

        let handle = self.spawn_job(job_id.clone(), website_url.clone());
        match method {
            ProcessingMethod::Synchronous => {
                let (state, outcome) = handle.await.map_err(|e| SubmitError::Internal {
                    job_id: job_id.clone(),
                    reason: e.to_string(),
                })?;
                Ok(Submission::Finished {
                    job_id,
                    state,
                    outcome,
                })
            }
            ProcessingMethod::Background => Ok(Submission::Accepted {
                job_id,
                website_url,
            }),
        }
    }

    async fn register(&self, website_url: &str) -> String {
        loop {
            let now = Utc::now();
            let job_id = self.ids.next(website_url, now);
            let job = AnalysisJob::processing(job_id.clone(), website_url.to_string(), now);
            if self.store.insert_if_absent(job).await {
                return job_id;
            }
            tracing::debug!(job_id = %job_id, "orchestrator: job id taken, regenerating");
        }
    }

    /// Runs the pipeline in one task and records its result from another.
    /// The returned handle resolves to whatever was recorded.
    fn spawn_job(
        self: &Arc<Self>,
        job_id: String,
        website_url: String,
    ) -> JoinHandle<(JobState, JobOutcome)> {
        let worker = {
            let this = Arc::clone(self);
            let url = website_url.clone();
            tokio::spawn(async move { this.execute(&url).await })
        };

        let this = Arc::clone(self);
        tokio::spawn(async move {
            let (state, outcome) = match worker.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(job_id = %job_id, error = %e, "orchestrator: analysis task aborted");
                    (
                        JobState::Error,
                        JobOutcome::Failure(JobFailure {
                            error: FAILURE_MESSAGE.to_string(),
                            details: format!("analysis task aborted: {e}"),
                        }),
                    )
                }
            };
            this.record(&job_id, state, outcome.clone()).await;
            (state, outcome)
        })
    }

    /// Scrape, prompt, model call and parse for one url, bounded by the
    /// deadline. Never fails; failures become an `error` outcome.
    pub async fn execute(&self, website_url: &str) -> (JobState, JobOutcome) {
        let findings = OnceLock::new();
        let run = self.run_pipeline(website_url, &findings);
        let result = tokio::time::timeout(self.settings.deadline, run).await;

        match result {
            Ok(Ok(doc)) => (JobState::Completed, JobOutcome::Report(Box::new(doc))),
            Ok(Err(e)) => {
                tracing::error!(url = website_url, error = %e, "orchestrator: analysis failed");
                (
                    JobState::Error,
                    JobOutcome::Failure(JobFailure {
                        error: FAILURE_MESSAGE.to_string(),
                        details: e.to_string(),
                    }),
                )
            }
            Err(_) => {
                tracing::warn!(
                    url = website_url,
                    deadline_secs = self.settings.deadline.as_secs_f64(),
                    "orchestrator: deadline reached, recording partial result"
                );
                let doc = CompetitorAnalysis::partial(
                    website_url,
                    findings.get().map(String::as_str),
                );
                (JobState::Timeout, JobOutcome::Report(Box::new(doc)))
            }
        }
    }

    async fn run_pipeline(
        &self,
        website_url: &str,
        findings: &OnceLock<String>,
    ) -> Result<CompetitorAnalysis, AnalyzerError> {
        let page = self.analyzer.scrape(website_url).await;
        if let Some(seen) = page_findings(&page) {
            let _ = findings.set(seen);
        }

        let prompt = self.analyzer.synthesize(&page, website_url);
        let raw = retry_with_backoff(
            self.settings.max_retries,
            self.settings.backoff_base_secs,
            || self.analyzer.request(&prompt),
        )
        .await?;
        Ok(self.analyzer.interpret(&raw, website_url))
    }

    async fn record(&self, job_id: &str, state: JobState, outcome: JobOutcome) {
        if self.store.complete(job_id, state, outcome, Utc::now()).await {
            tracing::info!(job_id, %state, "orchestrator: job finished");
        } else {
            tracing::warn!(job_id, %state, "orchestrator: job already terminal or evicted, result dropped");
        }
    }
}

/// Title and description of a successfully fetched page, for the partial
/// report written on timeout.
fn page_findings(page: &ScrapedPage) -> Option<String> {
    let title = page.title.trim();
    let description = page.description().map_or("", str::trim);
    match (title.is_empty(), description.is_empty()) {
        (true, true) => None,
        (false, true) => Some(format!("page title \"{title}\"")),
        (true, false) => Some(format!("page description \"{description}\"")),
        (false, false) => Some(format!(
            "page title \"{title}\", page description \"{description}\""
        )),
    }
}

#[cfg(test)]
#[path = "jobs_test.rs"]
mod tests;
