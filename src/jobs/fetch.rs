// src/jobs/fetch.rs
//! Fetch-and-broadcast: scrape → dedupe → diff against store → write → notify.

use chrono::{DateTime, Utc};
use metrics::{counter, gauge};

use super::{JobContext, JobResponse};
use crate::crawl::crawl_sites;
use crate::dedupe::{filter_new, remove_repeated};
use crate::error::JobError;
use crate::notify::broadcast;
use crate::store::{read_all, write_new};

/// Per-stage counts of one run, for logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub scraped: usize,
    pub unique: usize,
    pub existing: usize,
    pub new: usize,
    pub written: usize,
    pub notified: usize,
}

pub async fn fetch_and_broadcast(ctx: &JobContext, now: DateTime<Utc>) -> Result<FetchReport, JobError> {
    let scraped = crawl_sites(ctx.pages.as_ref(), &ctx.catalog, ctx.config.page_depth, now).await?;
    let scraped_n = scraped.len();

    let (unique, dropped) = remove_repeated(scraped);
    let unique_n = unique.len();
    tracing::debug!(target: "fetch", dropped, "intra-batch duplicates removed");

    let existing = read_all(ctx.store.as_ref()).await?;
    let fresh = filter_new(unique, &existing);

    let written = write_new(ctx.store.as_ref(), &fresh).await?;
    let notified = broadcast(ctx.notifier.as_ref(), &fresh)
        .await
        .map_err(JobError::Notify)?;

    gauge!("promobot_last_fetch_ts").set(now.timestamp() as f64);

    Ok(FetchReport {
        scraped: scraped_n,
        unique: unique_n,
        existing: existing.len(),
        new: fresh.len(),
        written,
        notified,
    })
}

/// Job boundary: run once at the current time and fold the outcome into a response.
pub async fn run_fetch_job(ctx: &JobContext) -> JobResponse {
    match fetch_and_broadcast(ctx, Utc::now()).await {
        Ok(report) => {
            tracing::info!(
                target: "fetch",
                scraped = report.scraped,
                unique = report.unique,
                existing = report.existing,
                new = report.new,
                written = report.written,
                notified = report.notified,
                "fetch job finished"
            );
            JobResponse::ok("Elements saved successfully")
        }
        Err(e) => {
            tracing::error!(target: "fetch", stage = e.stage(), error = %e, "fetch job failed");
            counter!("promobot_job_failures_total", "job" => "fetch").increment(1);
            JobResponse::failed(format!("There was an error on the request: {e}"))
        }
    }
}
