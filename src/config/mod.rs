// src/config/mod.rs
//! Process configuration, read once at start and passed down explicitly.

pub mod sites;

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

pub use sites::{Route, Site, SiteCatalog};

pub const DEFAULT_TABLE_NAME: &str = "PromoBotMXTable";
pub const DEFAULT_ENDPOINT: &str = "sqlite://data/promobot.sqlite";
pub const DEFAULT_THRESHOLD_DAYS: i64 = 5;
pub const DEFAULT_PAGE_DEPTH: u32 = 3;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_FETCH_INTERVAL_SECS: u64 = 20 * 60;
pub const DEFAULT_PRUNE_INTERVAL_SECS: u64 = 24 * 3600;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub table_name: String,
    /// `memory://`, `sqlite://<path>` or a bare sqlite path.
    pub endpoint: String,
    /// Telegram `sendMessage` URL; `None` disables broadcasting.
    pub telegram_url: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub threshold_days: i64,
    pub environment: String,
    pub page_depth: u32,
    pub http_timeout: Duration,
    pub scheduler_enabled: bool,
    pub fetch_interval: Duration,
    pub prune_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.into(),
            endpoint: DEFAULT_ENDPOINT.into(),
            telegram_url: None,
            telegram_chat_id: None,
            threshold_days: DEFAULT_THRESHOLD_DAYS,
            environment: "dev".into(),
            page_depth: DEFAULT_PAGE_DEPTH,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            scheduler_enabled: false,
            fetch_interval: Duration::from_secs(DEFAULT_FETCH_INTERVAL_SECS),
            prune_interval: Duration::from_secs(DEFAULT_PRUNE_INTERVAL_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Build from an explicit variable map (what `from_env` does with the process env).
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let get = |k: &str| {
            vars.get(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let d = Self::default();

        let mut cfg = Self {
            table_name: get("TABLE_NAME").unwrap_or(d.table_name),
            endpoint: get("ENDPOINT").unwrap_or(d.endpoint),
            telegram_url: get("TELEGRAM_URL"),
            telegram_chat_id: get("TELEGRAM_CHAT_ID"),
            threshold_days: parse_or(get("THRESHOLD_DAYS"), "THRESHOLD_DAYS", d.threshold_days)?,
            environment: get("ENVIRONMENT").unwrap_or(d.environment).to_ascii_lowercase(),
            page_depth: parse_or(get("PAGE_DEPTH"), "PAGE_DEPTH", d.page_depth)?,
            http_timeout: Duration::from_secs(parse_or(
                get("HTTP_TIMEOUT_SECS"),
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            scheduler_enabled: get("SCHEDULER_ENABLED").is_some_and(|v| v == "1" || v == "true"),
            fetch_interval: Duration::from_secs(parse_or(
                get("FETCH_INTERVAL_SECS"),
                "FETCH_INTERVAL_SECS",
                DEFAULT_FETCH_INTERVAL_SECS,
            )?),
            prune_interval: Duration::from_secs(parse_or(
                get("PRUNE_INTERVAL_SECS"),
                "PRUNE_INTERVAL_SECS",
                DEFAULT_PRUNE_INTERVAL_SECS,
            )?),
        };

        // Sanitize
        cfg.threshold_days = cfg.threshold_days.max(0);
        cfg.page_depth = cfg.page_depth.max(1);
        if cfg.fetch_interval.is_zero() {
            cfg.fetch_interval = d.fetch_interval;
        }
        if cfg.prune_interval.is_zero() {
            cfg.prune_interval = d.prune_interval;
        }
        if cfg.telegram_url.is_some() && cfg.telegram_chat_id.is_none() {
            tracing::warn!("TELEGRAM_URL set without TELEGRAM_CHAT_ID");
        }

        Ok(cfg)
    }

    pub fn is_prod(&self) -> bool {
        self.environment == "prod"
    }
}

fn parse_or<T>(raw: Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) => v.parse::<T>().with_context(|| format!("invalid {name}: {v:?}")),
        None => Ok(default),
    }
}
