use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::CompetitorAnalysis;

/// Lifecycle of an analysis job. `Processing` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Processing,
    Completed,
    Timeout,
    Error,
}

impl JobState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobState::Processing)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Processing => "processing",
            JobState::Completed => "completed",
            JobState::Timeout => "timeout",
            JobState::Error => "error",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error recorded for a job that ended in [`JobState::Error`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobFailure {
    pub error: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Report(Box<CompetitorAnalysis>),
    Failure(JobFailure),
}

#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub id: String,
    pub website_url: String,
    pub state: JobState,
    pub result: Option<JobOutcome>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl AnalysisJob {
    #[must_use]
    pub fn processing(id: String, website_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            website_url,
            state: JobState::Processing,
            result: None,
            created_at,
            completed_at: None,
        }
    }

    /// Moves the job into a terminal state. Returns `false`, leaving the job
    /// untouched, if it is already terminal or `state` is not terminal.
    pub fn finish(&mut self, state: JobState, outcome: JobOutcome, now: DateTime<Utc>) -> bool {
        if self.state.is_terminal() || !state.is_terminal() {
            return false;
        }
        self.state = state;
        self.result = Some(outcome);
        self.completed_at = Some(now);
        true
    }
}
