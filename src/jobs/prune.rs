// src/jobs/prune.rs
use chrono::{DateTime, Duration, Utc};
use metrics::counter;

use super::{JobContext, JobResponse};
use crate::error::JobError;
use crate::store::{delete_older_than, PromoStore};

/// `now − threshold_days`, in epoch millis. Out-of-range thresholds clamp to
/// `i64::MIN`, which matches nothing.
pub fn time_limit(now: DateTime<Utc>, threshold_days: i64) -> i64 {
    Duration::try_days(threshold_days.max(0))
        .and_then(|d| now.checked_sub_signed(d))
        .map_or(i64::MIN, |t| t.timestamp_millis())
}

pub async fn prune_older_than(store: &dyn PromoStore, limit_ms: i64) -> Result<usize, JobError> {
    Ok(delete_older_than(store, limit_ms).await?)
}

pub async fn run_prune_job(ctx: &JobContext) -> JobResponse {
    let limit = time_limit(Utc::now(), ctx.config.threshold_days);
    match prune_older_than(ctx.store.as_ref(), limit).await {
        Ok(removed) => {
            tracing::info!(target: "prune", removed, limit, "prune job finished");
            JobResponse::ok(format!("Number of promos removed: {removed}"))
        }
        Err(e) => {
            tracing::error!(target: "prune", error = %e, "prune job failed");
            counter!("promobot_job_failures_total", "job" => "prune").increment(1);
            JobResponse::failed(format!("Operation error - {e}"))
        }
    }
}
