// src/store/mod.rs
//! Persistence gateway over an external key-value store of promos,
//! keyed by `(id, created_at)`.
//!
//! Reads and writes are not transactional: two overlapping fetch runs can
//! both see a promo as new and both insert it under different `created_at`
//! keys. That race is accepted; the next prune run clears either copy.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use metrics::counter;

use crate::batch::settle_all;
use crate::config::AppConfig;
use crate::error::StoreError;
use crate::promo::{Promo, PromoKey, StoredPromo};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Server-side scan filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFilter {
    /// `created_at < limit` (epoch millis)
    CreatedBefore(i64),
}

impl ScanFilter {
    pub fn matches(&self, item: &StoredPromo) -> bool {
        match self {
            ScanFilter::CreatedBefore(limit) => item.created_at < *limit,
        }
    }
}

#[async_trait]
pub trait PromoStore: Send + Sync {
    /// Full scan, optionally filtered by the backend.
    async fn scan(&self, filter: Option<ScanFilter>) -> Result<Vec<StoredPromo>, StoreError>;
    /// Point write; an existing item with the same key is replaced.
    async fn put(&self, item: StoredPromo) -> Result<(), StoreError>;
    /// Point delete by full key; deleting a missing key is not an error.
    async fn delete(&self, key: &PromoKey) -> Result<(), StoreError>;
    fn name(&self) -> &'static str;
}

/// Open the backend named by `cfg.endpoint`.
pub fn open(cfg: &AppConfig) -> anyhow::Result<Arc<dyn PromoStore>> {
    let endpoint = cfg.endpoint.trim();
    if endpoint.starts_with("memory://") {
        tracing::info!(target: "store", table = %cfg.table_name, "using in-memory promo store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let path = endpoint.strip_prefix("sqlite://").unwrap_or(endpoint);
    let store = SqliteStore::open(path, &cfg.table_name)
        .with_context(|| format!("opening sqlite store at {path}"))?;
    tracing::info!(target: "store", %path, table = %cfg.table_name, "using sqlite promo store");
    Ok(Arc::new(store))
}

/// Every stored promo, as entities.
pub async fn read_all(store: &dyn PromoStore) -> Result<Vec<Promo>, StoreError> {
    let raw = store.scan(None).await?;
    Ok(Promo::batch_from_stored(raw))
}

/// Write each promo that has a link, all at once. One failed write fails the
/// batch; writes that already landed stay in place.
pub async fn write_new(store: &dyn PromoStore, promos: &[Promo]) -> Result<usize, StoreError> {
    tracing::info!(target: "store", "writing elements on database");
    let writable: Vec<&Promo> = promos.iter().filter(|p| p.has_link()).collect();
    for p in &writable {
        tracing::info!(
            target: "store",
            id = %p.id,
            title = p.title.as_deref().unwrap_or_default(),
            link = p.link.as_deref().unwrap_or_default(),
            "writing promo"
        );
    }

    let outcome = settle_all(writable.iter().map(|p| store.put(p.to_stored()))).await;
    if outcome.failed() > 0 {
        tracing::warn!(target: "store", failed = outcome.failed(), total = outcome.len(), "promo writes failed");
    }
    let written = outcome.into_all_or_nothing()?.len();
    counter!("promobot_written_total").increment(written as u64);
    Ok(written)
}

/// Delete every promo created before `limit_ms`. Returns how many were removed.
pub async fn delete_older_than(store: &dyn PromoStore, limit_ms: i64) -> Result<usize, StoreError> {
    let stale = store.scan(Some(ScanFilter::CreatedBefore(limit_ms))).await?;
    tracing::info!(target: "store", items = stale.len(), "stale promos found");

    let keys: Vec<PromoKey> = stale.iter().map(StoredPromo::key).collect();
    let outcome = settle_all(keys.iter().map(|k| store.delete(k))).await;
    if outcome.failed() > 0 {
        tracing::warn!(target: "store", failed = outcome.failed(), total = outcome.len(), "promo deletes failed");
    }
    let removed = outcome.into_all_or_nothing()?.len();
    counter!("promobot_pruned_total").increment(removed as u64);
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promo(id: &str, link: Option<&str>) -> Promo {
        Promo {
            id: id.into(),
            title: Some(format!("title {id}")),
            link: link.map(Into::into),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn linkless_promos_are_never_written() {
        let store = MemoryStore::new();
        let promos = vec![
            promo("a", Some("http://x/a")),
            promo("b", None),
            promo("c", Some("")),
        ];
        let n = write_new(&store, &promos).await.unwrap();
        assert_eq!(n, 1);

        let all = read_all(&store).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "a");
    }

    #[tokio::test]
    async fn delete_older_than_is_strict() {
        let store = MemoryStore::new();
        for (id, ts) in [("old", 999), ("edge", 1000), ("new", 1001)] {
            store
                .put(StoredPromo {
                    id: id.into(),
                    created_at: ts,
                    title: None,
                    temp: None,
                    link: Some("http://x".into()),
                    price: None,
                })
                .await
                .unwrap();
        }
        let removed = delete_older_than(&store, 1000).await.unwrap();
        assert_eq!(removed, 1);
        let left: Vec<String> = store.scan(None).await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(left, vec!["edge".to_string(), "new".to_string()]);
    }

    #[test]
    fn open_picks_backend_from_endpoint() {
        let cfg = AppConfig {
            endpoint: "memory://".into(),
            ..Default::default()
        };
        assert_eq!(open(&cfg).unwrap().name(), "memory");

        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig {
            endpoint: format!("sqlite://{}", dir.path().join("p.sqlite").display()),
            ..Default::default()
        };
        assert_eq!(open(&cfg).unwrap().name(), "sqlite");
    }
}
