// src/scheduler.rs
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::jobs::{run_fetch_job, run_prune_job, JobContext};

#[derive(Clone, Copy, Debug)]
pub struct SchedulerCfg {
    pub fetch_every: Duration,
    pub prune_every: Duration,
}

impl SchedulerCfg {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            fetch_every: cfg.fetch_interval,
            prune_every: cfg.prune_interval,
        }
    }
}

/// Handles of the two job loops; dropping them leaves the loops running.
pub struct SchedulerHandles {
    pub fetch: JoinHandle<()>,
    pub prune: JoinHandle<()>,
}

impl SchedulerHandles {
    pub fn abort(&self) {
        self.fetch.abort();
        self.prune.abort();
    }
}

/// Spawn the fetch and prune loops. Both fire immediately, then on their period.
/// A tick that overruns its period delays the next one instead of bursting.
pub fn spawn_job_scheduler(ctx: JobContext, cfg: SchedulerCfg) -> SchedulerHandles {
    let fetch_ctx = ctx.clone();
    let fetch = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(cfg.fetch_every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let resp = run_fetch_job(&fetch_ctx).await;
            tracing::info!(target: "scheduler", job = "fetch", status = resp.status_code, body = %resp.body, "scheduled run");
        }
    });

    let prune = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(cfg.prune_every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let resp = run_prune_job(&ctx).await;
            tracing::info!(target: "scheduler", job = "prune", status = resp.status_code, body = %resp.body, "scheduled run");
        }
    });

    SchedulerHandles { fetch, prune }
}
