//! SQLite storage sink
//!
//! One table per installed store and one TEXT column per schema key. Rows are
//! only ever inserted; missing values are stored as NULL.

use async_trait::async_trait;
use parking_lot::RwLock;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::{StorageSink, StoreRecord, StoreSchema};
use crate::error::{PageSpeedError, PageSpeedResult};

/// Storage sink writing into a SQLite database
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
    schemas: Arc<RwLock<HashMap<String, StoreSchema>>>,
}

impl SqliteStorage {
    /// Open the database at `path`, creating it if missing
    ///
    /// # Errors
    /// Fails when the file cannot be created or opened.
    pub async fn open(path: &Path) -> PageSpeedResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PageSpeedError::Storage(format!("create {}: {e}", parent.display())))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        Ok(Self::with_pool(pool))
    }

    /// Open a private in-memory database
    ///
    /// # Errors
    /// Fails when SQLite cannot be initialized.
    pub async fn in_memory() -> PageSpeedResult<Self> {
        // Every connection to ":memory:" is its own database, so keep one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self::with_pool(pool))
    }

    #[must_use]
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            schemas: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// All rows of store `name` in insertion order
    ///
    /// # Errors
    /// `UnknownStore` if the store was not installed through this sink.
    pub async fn rows(&self, name: &str) -> PageSpeedResult<Vec<StoreRecord>> {
        let schema = self.schema(name)?;
        let keys: Vec<String> = schema.keys().map(str::to_string).collect();
        let columns: Vec<String> = keys.iter().map(|k| quote_ident(k)).collect();
        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            columns.join(", "),
            quote_ident(name)
        );

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let mut record = StoreRecord::new();
            for (idx, key) in keys.iter().enumerate() {
                let value: Option<String> = row.try_get(idx)?;
                if let Some(value) = value {
                    record.set(key.as_str(), value);
                }
            }
            records.push(record);
        }
        Ok(records)
    }

    fn schema(&self, name: &str) -> PageSpeedResult<StoreSchema> {
        self.schemas
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| PageSpeedError::UnknownStore(name.to_string()))
    }
}

#[async_trait]
impl StorageSink for SqliteStorage {
    async fn install_store(&self, name: &str, schema: &StoreSchema) -> PageSpeedResult<()> {
        if schema.is_empty() {
            return Err(PageSpeedError::Storage(format!(
                "store '{name}' needs at least one column"
            )));
        }

        let columns: Vec<String> = schema
            .keys()
            .map(|k| format!("{} TEXT", quote_ident(k)))
            .collect();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_ident(name),
            columns.join(", ")
        );
        sqlx::query(&sql).execute(&self.pool).await?;

        self.schemas.write().insert(name.to_string(), schema.clone());
        debug!(target: "pagespeed::storage", "Installed SQLite store '{name}'");
        Ok(())
    }

    async fn add(&self, name: &str, record: &StoreRecord) -> PageSpeedResult<()> {
        let schema = self.schema(name)?;
        let keys: Vec<&str> = schema.keys().collect();
        let columns: Vec<String> = keys.iter().map(|k| quote_ident(k)).collect();
        let placeholders: Vec<&str> = keys.iter().map(|_| "?").collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(name),
            columns.join(", "),
            placeholders.join(", ")
        );

        let mut query = sqlx::query(&sql);
        for key in &keys {
            query = query.bind(record.get(key).map(str::to_string));
        }
        query.execute(&self.pool).await?;
        Ok(())
    }
}

/// Quote an SQL identifier, doubling embedded quotes
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::quote_ident;

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("speed-index"), "\"speed-index\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
