//! SQLite-backed promo store (rusqlite). Blocking calls run on tokio's
//! blocking pool so the job task keeps issuing the rest of its batch.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, Connection, Row};

use super::{PromoStore, ScanFilter};
use crate::error::StoreError;
use crate::promo::{PromoKey, StoredPromo};

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    table: String,
}

fn valid_table_name(name: &str) -> bool {
    static RE_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());
    RE_IDENT.is_match(name)
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<StoredPromo> {
    Ok(StoredPromo {
        id: row.get("id")?,
        created_at: row.get("created_at")?,
        title: row.get("title")?,
        temp: row.get("temp")?,
        link: row.get("link")?,
        price: row.get("price")?,
    })
}

impl SqliteStore {
    /// Open (creating if needed) the database file and the promo table.
    pub fn open(path: impl AsRef<Path>, table: &str) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Backend(format!("creating {}: {e}", parent.display())))?;
        }
        Self::from_connection(Connection::open(path)?, table)
    }

    pub fn open_in_memory(table: &str) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, table)
    }

    fn from_connection(conn: Connection, table: &str) -> Result<Self, StoreError> {
        if !valid_table_name(table) {
            return Err(StoreError::InvalidTable(table.to_string()));
        }
        conn.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                title TEXT,
                temp INTEGER,
                link TEXT,
                price TEXT,
                PRIMARY KEY (id, created_at)
            );
            CREATE INDEX IF NOT EXISTS idx_{table}_created_at ON {table}(created_at);
            "#
        ))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            table: table.to_string(),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &str) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let table = self.table.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Backend("sqlite connection mutex poisoned".into()))?;
            f(&guard, &table)
        })
        .await?
    }
}

#[async_trait]
impl PromoStore for SqliteStore {
    async fn scan(&self, filter: Option<ScanFilter>) -> Result<Vec<StoredPromo>, StoreError> {
        self.with_conn(move |conn, table| {
            let items = match filter {
                None => {
                    let mut stmt = conn.prepare(&format!("SELECT * FROM {table}"))?;
                    let rows = stmt.query_map([], row_to_item)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()?
                }
                Some(ScanFilter::CreatedBefore(limit)) => {
                    let mut stmt =
                        conn.prepare(&format!("SELECT * FROM {table} WHERE created_at < ?1"))?;
                    let rows = stmt.query_map(params![limit], row_to_item)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()?
                }
            };
            Ok(items)
        })
        .await
    }

    async fn put(&self, item: StoredPromo) -> Result<(), StoreError> {
        self.with_conn(move |conn, table| {
            conn.execute(
                &format!(
                    r#"
                    INSERT INTO {table} (id, created_at, title, temp, link, price)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(id, created_at) DO UPDATE SET
                        title = excluded.title,
                        temp = excluded.temp,
                        link = excluded.link,
                        price = excluded.price
                    "#
                ),
                params![
                    item.id,
                    item.created_at,
                    item.title,
                    item.temp,
                    item.link,
                    item.price
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &PromoKey) -> Result<(), StoreError> {
        let key = key.clone();
        self.with_conn(move |conn, table| {
            conn.execute(
                &format!("DELETE FROM {table} WHERE id = ?1 AND created_at = ?2"),
                params![key.id, key.created_at],
            )?;
            Ok(())
        })
        .await
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_are_checked() {
        assert!(valid_table_name("PromoBotMXTable"));
        assert!(valid_table_name("promo_bot_mx_promos"));
        assert!(!valid_table_name("promos; DROP TABLE x"));
        assert!(matches!(
            SqliteStore::open_in_memory("bad-name"),
            Err(StoreError::InvalidTable(_))
        ));
    }
}
