//! In-memory datastore backend.
//!
//! A thread-safe [`Datastore`] implementation over nested maps behind an
//! async `RwLock`, intended for development and testing. Rows are organized
//! as `kind` → encoded primary predicate → JSON row.
//!
//! Transactions are kind-scoped snapshots: [`begin`](Datastore::begin) clones
//! the rows of one kind, and rollback restores that clone. This gives the
//! facade its whole-pipeline rollback guarantee for sequential use; writers
//! racing on the *same kind* while another operation holds an open
//! transaction can be clobbered by its rollback, which is an accepted limit
//! of this backend.
//!
//! # Example
//!
//! ```rust
//! use crudbase::datastore::{Datastore, MemoryDatastore, StoreTransaction};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryDatastore::new();
//! let predicate = vec![("id".to_string(), json!("a-1"))];
//!
//! store.put("Article", &predicate, json!({"id": "a-1", "title": "hello"})).await?;
//! assert!(store.fetch_one("Article", &predicate).await?.is_some());
//!
//! let tx = store.begin("Article").await?;
//! store.remove("Article", &predicate).await?;
//! tx.rollback().await?;
//! assert!(store.fetch_one("Article", &predicate).await?.is_some());
//! # Ok(())
//! # }
//! ```

use crate::datastore::{Datastore, Predicate, StoreError, StoreTransaction};
use async_trait::async_trait;
use log::trace;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type Rows = HashMap<String, Value>;
type Kinds = HashMap<String, Rows>;

/// Thread-safe in-memory datastore.
///
/// Cloning is cheap and every clone shares the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatastore {
    data: Arc<RwLock<Kinds>>,
}

impl MemoryDatastore {
    /// Create a new empty datastore.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all rows of every kind.
    pub async fn clear(&self) {
        self.data.write().await.clear();
    }

    /// Row counts for debugging and test assertions.
    pub async fn stats(&self) -> MemoryStats {
        let guard = self.data.read().await;
        MemoryStats {
            kind_count: guard.len(),
            total_rows: guard.values().map(Rows::len).sum(),
        }
    }

    fn encode_key(predicate: &Predicate) -> String {
        let parts: Vec<String> = predicate
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        parts.join("&")
    }

    fn matches(row: &Value, predicate: &Predicate) -> bool {
        predicate
            .iter()
            .all(|(name, value)| row.get(name) == Some(value))
    }
}

#[async_trait]
impl Datastore for MemoryDatastore {
    type Error = StoreError;
    type Tx = MemoryTransaction;

    async fn begin(&self, kind: &str) -> Result<MemoryTransaction, StoreError> {
        let snapshot = self.data.read().await.get(kind).cloned();
        trace!(
            "begin transaction for {} ({} rows snapshotted)",
            kind,
            snapshot.as_ref().map(Rows::len).unwrap_or(0)
        );
        Ok(MemoryTransaction {
            data: Arc::clone(&self.data),
            kind: kind.to_string(),
            snapshot,
        })
    }

    async fn fetch_all(&self, kind: &str) -> Result<Vec<Value>, StoreError> {
        let guard = self.data.read().await;
        let rows = match guard.get(kind) {
            Some(rows) => rows,
            None => return Ok(Vec::new()),
        };

        // Sort by key for a stable listing order.
        let mut keys: Vec<_> = rows.keys().collect();
        keys.sort();
        Ok(keys.into_iter().filter_map(|k| rows.get(k).cloned()).collect())
    }

    async fn fetch_one(
        &self,
        kind: &str,
        predicate: &Predicate,
    ) -> Result<Option<Value>, StoreError> {
        let guard = self.data.read().await;
        let rows = match guard.get(kind) {
            Some(rows) => rows,
            None => return Ok(None),
        };

        let mut keys: Vec<_> = rows.keys().collect();
        keys.sort();
        Ok(keys
            .into_iter()
            .filter_map(|k| rows.get(k))
            .find(|row| Self::matches(row, predicate))
            .cloned())
    }

    async fn put(
        &self,
        kind: &str,
        predicate: &Predicate,
        data: Value,
    ) -> Result<Value, StoreError> {
        if !data.is_object() {
            return Err(StoreError::invalid_data("row must be a JSON object"));
        }
        let mut guard = self.data.write().await;
        guard
            .entry(kind.to_string())
            .or_default()
            .insert(Self::encode_key(predicate), data.clone());
        Ok(data)
    }

    async fn remove(&self, kind: &str, predicate: &Predicate) -> Result<bool, StoreError> {
        let mut guard = self.data.write().await;
        let rows = match guard.get_mut(kind) {
            Some(rows) => rows,
            None => return Ok(false),
        };

        let matched: Vec<String> = rows
            .iter()
            .filter(|(_, row)| Self::matches(row, predicate))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &matched {
            rows.remove(key);
        }
        Ok(!matched.is_empty())
    }
}

/// Kind-scoped snapshot transaction for [`MemoryDatastore`].
pub struct MemoryTransaction {
    data: Arc<RwLock<Kinds>>,
    kind: String,
    snapshot: Option<Rows>,
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    type Error = StoreError;

    async fn commit(self) -> Result<(), StoreError> {
        trace!("commit transaction for {}", self.kind);
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        trace!("rollback transaction for {}", self.kind);
        let mut guard = self.data.write().await;
        match self.snapshot {
            Some(rows) => {
                guard.insert(self.kind, rows);
            }
            None => {
                guard.remove(&self.kind);
            }
        }
        Ok(())
    }
}

/// Row counts for the current state of a [`MemoryDatastore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStats {
    /// Number of record kinds with at least one row.
    pub kind_count: usize,
    /// Total number of rows across all kinds.
    pub total_rows: usize,
}
