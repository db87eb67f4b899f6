//! Background sweep scheduler.
//!
//! Registers the cache TTL sweep (every 30 minutes) and the quota-record
//! sweep (hourly) on a [`JobScheduler`]. Sweeps hold their component's
//! lock only for the duration of the pass and never block request
//! handling.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::cache::ResultCache;
use crate::rate_limit::DailyQuota;

/// Builds and starts the background sweep scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down the sweeps.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised or
/// started.
pub async fn build_scheduler(
    cache: Arc<ResultCache>,
    quota: Arc<DailyQuota>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let cache_sweep = Job::new_async("0 0,30 * * * *", move |_id, _scheduler| {
        let cache = Arc::clone(&cache);
        Box::pin(async move {
            let removed = cache.sweep();
            if removed > 0 {
                tracing::debug!(removed, "cache sweep evicted expired entries");
            }
        })
    })?;
    scheduler.add(cache_sweep).await?;

    let quota_sweep = Job::new_async("0 0 * * * *", move |_id, _scheduler| {
        let quota = Arc::clone(&quota);
        Box::pin(async move {
            let removed = quota.sweep();
            if removed > 0 {
                tracing::debug!(removed, "quota sweep dropped stale day records");
            }
        })
    })?;
    scheduler.add(quota_sweep).await?;

    scheduler.start().await?;
    Ok(scheduler)
}
