//! HTTP trigger surface: schedulers (or an operator) start a job with a POST.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::jobs::{run_fetch_job, run_prune_job, JobContext, JobResponse};

pub fn router(ctx: JobContext) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/jobs/fetch", post(trigger_fetch))
        .route("/jobs/prune", post(trigger_prune))
        .layer(CorsLayer::very_permissive())
        .with_state(ctx)
}

async fn trigger_fetch(State(ctx): State<JobContext>) -> (StatusCode, String) {
    into_reply(run_fetch_job(&ctx).await)
}

async fn trigger_prune(State(ctx): State<JobContext>) -> (StatusCode, String) {
    into_reply(run_prune_job(&ctx).await)
}

fn into_reply(resp: JobResponse) -> (StatusCode, String) {
    let status = StatusCode::from_u16(resp.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, resp.body)
}
