//! Keyed storage for analysis jobs.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rivalscope_core::{AnalysisJob, JobOutcome, JobState};
use serde::Serialize;
use tokio::sync::RwLock;

/// Listing row for the diagnostic dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub id: String,
    pub status: JobState,
    pub timestamp: DateTime<Utc>,
}

/// Job storage shared by the request handlers and background tasks.
///
/// The in-process [`MemoryJobStore`] serves single-instance deployments; a
/// multi-instance deployment needs an implementation over a shared store with
/// atomic compare-and-set for [`JobStore::complete`].
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get(&self, id: &str) -> Option<AnalysisJob>;

    /// Inserts or replaces a job.
    async fn set(&self, job: AnalysisJob);

    async fn has(&self, id: &str) -> bool;

    /// Inserts `job` only if its id is free, as one atomic step. Returns
    /// `false` and leaves the store untouched when the id is taken.
    async fn insert_if_absent(&self, job: AnalysisJob) -> bool;

    /// Moves a `processing` job to a terminal state. Returns `false` when the
    /// job is unknown or already terminal; the stored job is then untouched.
    async fn complete(
        &self,
        id: &str,
        state: JobState,
        outcome: JobOutcome,
        at: DateTime<Utc>,
    ) -> bool;

    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Every job, oldest first.
    async fn snapshot(&self) -> Vec<JobSummary>;

    /// Drops jobs created before `cutoff` and returns how many were removed.
    async fn evict_older_than(&self, cutoff: DateTime<Utc>) -> usize;
}

#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<String, AnalysisJob>>,
}

impl MemoryJobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn get(&self, id: &str) -> Option<AnalysisJob> {
        self.jobs.read().await.get(id).cloned()
    }

    async fn set(&self, job: AnalysisJob) {
        self.jobs.write().await.insert(job.id.clone(), job);
    }

    async fn has(&self, id: &str) -> bool {
        self.jobs.read().await.contains_key(id)
    }

    async fn insert_if_absent(&self, job: AnalysisJob) -> bool {
        match self.jobs.write().await.entry(job.id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(job);
                true
            }
        }
    }

    async fn complete(
        &self,
        id: &str,
        state: JobState,
        outcome: JobOutcome,
        at: DateTime<Utc>,
    ) -> bool {
        let mut jobs = self.jobs.write().await;
        jobs.get_mut(id)
            .is_some_and(|job| job.finish(state, outcome, at))
    }

    async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    async fn snapshot(&self) -> Vec<JobSummary> {
        let jobs = self.jobs.read().await;
        let mut rows: Vec<JobSummary> = jobs
            .values()
            .map(|job| JobSummary {
                id: job.id.clone(),
                status: job.state,
                timestamp: job.created_at,
            })
            .collect();
        rows.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        rows
    }

    async fn evict_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, job| job.created_at >= cutoff);
        before - jobs.len()
    }
}
