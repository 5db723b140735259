// src/lib.rs
// Public library surface for the service, the one-shot bins, and integration tests.

pub mod api;
pub mod batch;
pub mod config;
pub mod crawl;
pub mod dedupe;
pub mod error;
pub mod html;
pub mod logging;
pub mod metrics;
pub mod promo;
pub mod scrape;
pub mod store;

// Jobs, notifications & background scheduling
pub mod jobs;
pub mod notify;
pub mod scheduler;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::config::{AppConfig, SiteCatalog};
pub use crate::error::{JobError, StoreError};
pub use crate::jobs::{JobContext, JobResponse};
pub use crate::promo::{Promo, StoredPromo};

use anyhow::Context;

/// Shared bootstrap for every entry point: `.env`, logging, config, catalog, context.
pub fn bootstrap() -> anyhow::Result<JobContext> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env().context("loading configuration")?;
    logging::init(config.is_prod());

    let catalog = SiteCatalog::load_default().context("loading site catalog")?;
    JobContext::from_config(config, catalog)
}
