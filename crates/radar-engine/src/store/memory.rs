//! In-memory store.
//!
//! One `RwLock`-guarded map per record type. Writers are serialized per table,
//! so a compare-and-swap observes and replaces the stored revision atomically.

use std::collections::BTreeMap;

use radar_core::entities::{ApiVersion, DeprecationNotice, RadarSnapshot, TechnologyEntry};
use radar_core::errors::RadarError;
use tokio::sync::RwLock;

use super::{Record, Store};

struct Table<T> {
    rows: RwLock<BTreeMap<String, T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<T: Record> Table<T> {
    async fn get(&self, id: &str) -> Option<T> {
        self.rows.read().await.get(id).cloned()
    }

    async fn insert(&self, record: T) -> Result<(), RadarError> {
        let mut rows = self.rows.write().await;
        if let Some(existing) = rows.get(record.id()) {
            return Err(RadarError::Conflict {
                entity: T::KIND,
                id: record.id().to_string(),
                expected: 0,
                actual: existing.revision(),
            });
        }
        rows.insert(record.id().to_string(), record);
        Ok(())
    }

    async fn compare_and_swap(&self, expected: u64, record: T) -> Result<(), RadarError> {
        let mut rows = self.rows.write().await;
        let current = rows
            .get(record.id())
            .ok_or_else(|| RadarError::not_found(T::KIND, record.id()))?;
        if current.revision() != expected {
            return Err(RadarError::Conflict {
                entity: T::KIND,
                id: record.id().to_string(),
                expected,
                actual: current.revision(),
            });
        }
        rows.insert(record.id().to_string(), record);
        Ok(())
    }

    async fn list(&self) -> Vec<T> {
        self.rows.read().await.values().cloned().collect()
    }
}

/// Process-local store for tests and single-process deployments.
#[derive(Default)]
pub struct MemoryStore {
    technologies: Table<TechnologyEntry>,
    api_versions: Table<ApiVersion>,
    notices: Table<DeprecationNotice>,
    snapshots: Table<RadarSnapshot>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

macro_rules! table_store {
    ($ty:ty, $field:ident) => {
        impl Store<$ty> for MemoryStore {
            async fn get(&self, id: &str) -> Result<Option<$ty>, RadarError> {
                Ok(self.$field.get(id).await)
            }

            async fn insert(&self, record: $ty) -> Result<(), RadarError> {
                self.$field.insert(record).await
            }

            async fn compare_and_swap(
                &self,
                expected_revision: u64,
                record: $ty,
            ) -> Result<(), RadarError> {
                self.$field.compare_and_swap(expected_revision, record).await
            }

            async fn list(&self) -> Result<Vec<$ty>, RadarError> {
                Ok(self.$field.list().await)
            }
        }
    };
}

table_store!(TechnologyEntry, technologies);
table_store!(ApiVersion, api_versions);
table_store!(DeprecationNotice, notices);
table_store!(RadarSnapshot, snapshots);
