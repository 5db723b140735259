use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and describe the job series.
    /// Call once per process.
    pub fn init() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!("promobot_scraped_total", "Promos parsed from listing pages.");
        describe_counter!("promobot_written_total", "New promos written to the store.");
        describe_counter!("promobot_notified_total", "Chat messages sent.");
        describe_counter!("promobot_pruned_total", "Stale promos deleted.");
        describe_counter!("promobot_job_failures_total", "Failed job runs, by job.");
        describe_gauge!(
            "promobot_last_fetch_ts",
            "Unix ts of the last successful fetch run."
        );

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
