//! In-process [`DataStore`] used for local development (`DATA_BACKEND=memory`)
//! and tests. Row-level security is not emulated.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::{Caller, DataStore, Query, StoreError, StoreResult};

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    operations: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, HashMap<String, Vec<Value>>> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of a table's rows.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables().get(table).cloned().unwrap_or_default()
    }

    /// Inserts a row directly, bypassing the operation counter.
    pub fn seed(&self, table: &str, row: Value) -> Value {
        let row = with_id(row);
        self.tables()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        row
    }

    /// Number of store operations served so far (seeding excluded).
    pub fn operations(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }
}

fn with_id(mut row: Value) -> Value {
    if let Some(object) = row.as_object_mut()
        && !object.contains_key("id")
    {
        object.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    }
    row
}

fn sort_rows(rows: &mut [Value], query: &Query) {
    if let Some(order) = &query.order {
        rows.sort_by(|a, b| {
            let left = a.get(&order.column).map(Value::to_string).unwrap_or_default();
            let right = b.get(&order.column).map(Value::to_string).unwrap_or_default();
            if order.descending {
                right.cmp(&left)
            } else {
                left.cmp(&right)
            }
        });
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn select(
        &self,
        table: &str,
        query: &Query,
        _caller: Caller<'_>,
    ) -> StoreResult<Vec<Value>> {
        self.record();
        let mut rows: Vec<Value> = self
            .tables()
            .get(table)
            .map(|rows| rows.iter().filter(|row| query.matches(row)).cloned().collect())
            .unwrap_or_default();

        sort_rows(&mut rows, query);
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value, _caller: Caller<'_>) -> StoreResult<Value> {
        self.record();
        if !row.is_object() {
            return Err(StoreError::Rejected {
                status: 400,
                message: "row must be a JSON object".to_string(),
            });
        }

        let row = with_id(row);
        let mut tables = self.tables();
        let rows = tables.entry(table.to_string()).or_default();
        if rows.iter().any(|existing| existing.get("id") == row.get("id")) {
            return Err(StoreError::Rejected {
                status: 409,
                message: "duplicate key value violates unique constraint".to_string(),
            });
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: &str,
        query: &Query,
        patch: Value,
        _caller: Caller<'_>,
    ) -> StoreResult<Vec<Value>> {
        self.record();
        if query.is_unfiltered() {
            return Err(StoreError::Unfiltered("update"));
        }
        let Some(patch) = patch.as_object() else {
            return Err(StoreError::Rejected {
                status: 400,
                message: "patch must be a JSON object".to_string(),
            });
        };

        let mut tables = self.tables();
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| query.matches(row)) {
                if let Some(object) = row.as_object_mut() {
                    for (key, value) in patch {
                        object.insert(key.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(
        &self,
        table: &str,
        query: &Query,
        _caller: Caller<'_>,
    ) -> StoreResult<Vec<Value>> {
        self.record();
        if query.is_unfiltered() {
            return Err(StoreError::Unfiltered("delete"));
        }

        let mut tables = self.tables();
        let Some(rows) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };
        let (removed, kept): (Vec<Value>, Vec<Value>) =
            rows.drain(..).partition(|row| query.matches(row));
        *rows = kept;
        Ok(removed)
    }
}
