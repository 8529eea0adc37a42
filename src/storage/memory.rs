//! In-memory storage sink

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::{StorageSink, StoreRecord, StoreSchema};
use crate::error::{PageSpeedError, PageSpeedResult};

#[derive(Debug, Default)]
struct Store {
    schema: StoreSchema,
    rows: Vec<StoreRecord>,
}

/// Storage sink keeping every store in process memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    stores: Mutex<HashMap<String, Store>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows of store `name` in append order, empty if the store is unknown
    #[must_use]
    pub fn rows(&self, name: &str) -> Vec<StoreRecord> {
        self.stores
            .lock()
            .get(name)
            .map(|store| store.rows.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn schema(&self, name: &str) -> Option<StoreSchema> {
        self.stores.lock().get(name).map(|store| store.schema.clone())
    }

    #[must_use]
    pub fn is_installed(&self, name: &str) -> bool {
        self.stores.lock().contains_key(name)
    }
}

#[async_trait]
impl StorageSink for MemoryStorage {
    async fn install_store(&self, name: &str, schema: &StoreSchema) -> PageSpeedResult<()> {
        let mut stores = self.stores.lock();
        let store = stores.entry(name.to_string()).or_default();
        store.schema = schema.clone();
        Ok(())
    }

    async fn add(&self, name: &str, record: &StoreRecord) -> PageSpeedResult<()> {
        let mut stores = self.stores.lock();
        let store = stores
            .get_mut(name)
            .ok_or_else(|| PageSpeedError::UnknownStore(name.to_string()))?;
        store.rows.push(record.clone());
        Ok(())
    }
}
