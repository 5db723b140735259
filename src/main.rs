//! promobot-mx service entrypoint.
//! Serves the job trigger routes and `/metrics`, and optionally runs both jobs
//! on an in-process schedule.

use promobot::metrics::Metrics;
use promobot::scheduler::{spawn_job_scheduler, SchedulerCfg};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    let ctx = promobot::bootstrap()?;
    let metrics = Metrics::init()?;

    if ctx.config.scheduler_enabled {
        let cfg = SchedulerCfg::from_config(&ctx.config);
        tracing::info!(
            fetch_every_secs = cfg.fetch_every.as_secs(),
            prune_every_secs = cfg.prune_every.as_secs(),
            "in-process scheduler enabled"
        );
        // Loops live for the whole process.
        let _handles = spawn_job_scheduler(ctx.clone(), cfg);
    }

    let router = promobot::router(ctx).merge(metrics.router());
    Ok(router.into())
}
