// src/error.rs
use thiserror::Error;

/// Failures of the promo store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("invalid table name {0:?}")]
    InvalidTable(String),

    #[error("{0}")]
    Backend(String),
}

/// Anything that aborts a job run. Callers only ever see the message text.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("fetch failed: {0:#}")]
    Fetch(anyhow::Error),

    #[error("store failed: {0}")]
    Store(#[from] StoreError),

    #[error("notification failed: {0:#}")]
    Notify(anyhow::Error),
}

impl JobError {
    /// Short stage label for logs and metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            JobError::Fetch(_) => "fetch",
            JobError::Store(_) => "store",
            JobError::Notify(_) => "notify",
        }
    }
}
