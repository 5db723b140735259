//! In-process promo store for tests and `ENDPOINT=memory://` runs.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{PromoStore, ScanFilter};
use crate::error::StoreError;
use crate::promo::{PromoKey, StoredPromo};

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<BTreeMap<PromoKey, StoredPromo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = StoredPromo>) -> Self {
        let map = items.into_iter().map(|it| (it.key(), it)).collect();
        Self {
            inner: Mutex::new(map),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<PromoKey, StoredPromo>>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("memory store mutex poisoned".into()))
    }
}

#[async_trait]
impl PromoStore for MemoryStore {
    async fn scan(&self, filter: Option<ScanFilter>) -> Result<Vec<StoredPromo>, StoreError> {
        let map = self.lock()?;
        Ok(map
            .values()
            .filter(|it| filter.map_or(true, |f| f.matches(it)))
            .cloned()
            .collect())
    }

    async fn put(&self, item: StoredPromo) -> Result<(), StoreError> {
        self.lock()?.insert(item.key(), item);
        Ok(())
    }

    async fn delete(&self, key: &PromoKey) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
