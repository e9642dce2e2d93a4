//! Background job scheduler.
//!
//! Evicts analysis jobs once they outlive the configured TTL.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::jobs::JobStore;

/// Every minute, on the minute.
const EVICTION_SCHEDULE: &str = "0 * * * * *";

/// Builds and starts the scheduler.
///
/// The returned handle must be kept alive for the lifetime of the process;
/// dropping it shuts down all scheduled jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised, the
/// eviction job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    store: Arc<dyn JobStore>,
    ttl: Duration,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    register_eviction_job(&scheduler, store, ttl).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_eviction_job(
    scheduler: &JobScheduler,
    store: Arc<dyn JobStore>,
    ttl: Duration,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(EVICTION_SCHEDULE, move |_uuid, _lock| {
        let store = Arc::clone(&store);
        Box::pin(async move {
            evict_expired(store.as_ref(), ttl).await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

pub(crate) async fn evict_expired(store: &dyn JobStore, ttl: Duration) -> usize {
    let Some(cutoff) = chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| Utc::now().checked_sub_signed(ttl))
    else {
        tracing::warn!(?ttl, "scheduler: job TTL out of range; skipping eviction");
        return 0;
    };
    let removed = store.evict_older_than(cutoff).await;
    if removed > 0 {
        tracing::info!(removed, "scheduler: evicted expired analysis jobs");
    }
    removed
}
