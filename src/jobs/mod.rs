// src/jobs/mod.rs
//! The two triggerable jobs and the context they run against.

pub mod fetch;
pub mod prune;

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::config::{AppConfig, SiteCatalog};
use crate::notify::{Notifier, TelegramNotifier};
use crate::scrape::{HttpPageSource, PageSource};
use crate::store::{self, PromoStore};

pub use fetch::{fetch_and_broadcast, run_fetch_job, FetchReport};
pub use prune::{prune_older_than, run_prune_job, time_limit};

pub const STATUS_OK: u16 = 200;
/// Failure status kept from the deployment the callers were built against.
pub const STATUS_FAILED: u16 = 403;

/// What a job run reports to its trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl JobResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: STATUS_OK,
            body: body.into(),
        }
    }

    pub fn failed(body: impl Into<String>) -> Self {
        Self {
            status_code: STATUS_FAILED,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

/// Everything a job needs, built once per process.
#[derive(Clone)]
pub struct JobContext {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<SiteCatalog>,
    pub store: Arc<dyn PromoStore>,
    pub pages: Arc<dyn PageSource>,
    pub notifier: Arc<dyn Notifier>,
}

impl JobContext {
    /// Wire the real collaborators: HTTP pages, configured store, Telegram.
    pub fn from_config(config: AppConfig, catalog: SiteCatalog) -> Result<Self> {
        let store = store::open(&config)?;
        let pages = Arc::new(HttpPageSource::new(config.http_timeout)?);
        let notifier = Arc::new(TelegramNotifier::from_config(&config));
        tracing::info!(
            env = %config.environment,
            sites = catalog.sites.len(),
            routes = catalog.route_count(),
            store = store.name(),
            telegram = notifier.is_enabled(),
            "job context ready"
        );
        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            store,
            pages,
            notifier,
        })
    }
}
