//! In-process [`RemoteStore`] for tests and local development.
//!
//! Mirrors the parts of PostgREST behaviour the repositories rely on:
//! generated `id` / `created_at`, upsert merging on a key column, and
//! null-aware ordering. Like the hosted tables it never touches
//! `updated_at`; writers send it themselves. Failures can be
//! injected per operation and table.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::remote::{Direction, Filter, Query, RemoteStore, Row};

/// The store operation a failure is injected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Upsert,
    Delete,
    Ping,
}

/// Tables kept as JSON rows behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
    failures: RwLock<HashMap<(Operation, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rows to `table` verbatim.
    pub async fn seed(&self, table: &str, rows: impl IntoIterator<Item = Row>) {
        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    /// Snapshot of a table, in insertion order.
    pub async fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Make every `op` on `table` fail with `message` until cleared.
    /// `Ping` ignores the table.
    pub async fn fail_on(&self, op: Operation, table: &str, message: impl Into<String>) {
        self.failures
            .write()
            .await
            .insert((op, table.to_string()), message.into());
    }

    pub async fn clear_failures(&self) {
        self.failures.write().await.clear();
    }

    async fn check(&self, op: Operation, table: &str) -> Result<(), StoreError> {
        match self.failures.read().await.get(&(op, table.to_string())) {
            Some(message) => Err(StoreError::Rejected(message.clone())),
            None => Ok(()),
        }
    }
}

fn now_value() -> Value {
    Value::String(Utc::now().to_rfc3339())
}

fn as_object(table: &str, row: Row) -> Result<Map<String, Value>, StoreError> {
    match row {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::Rejected(format!(
            "{table}: row must be a JSON object"
        ))),
    }
}

/// Fill generated columns the way the hosted tables default them.
fn with_defaults(mut map: Map<String, Value>) -> Row {
    if map.get("id").is_none_or(Value::is_null) {
        map.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
    }
    if map.get("created_at").is_none_or(Value::is_null) {
        map.insert("created_at".into(), now_value());
    }
    Value::Object(map)
}

fn merge(target: &mut Row, patch: &Map<String, Value>) {
    if let Value::Object(existing) = target {
        for (key, value) in patch {
            existing.insert(key.clone(), value.clone());
        }
    }
}

/// Text form of a scalar, as a REST filter would see it.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn column<'a>(row: &'a Row, name: &str) -> Option<&'a Value> {
    row.get(name).filter(|v| !v.is_null())
}

fn matches(row: &Row, filter: &Filter) -> bool {
    let value = column(row, filter.column()).and_then(text);
    match filter {
        Filter::Eq(_, expected) => value.as_deref() == Some(expected.as_str()),
        Filter::Neq(_, expected) => value.is_some_and(|v| &v != expected),
        Filter::In(_, options) => value.is_some_and(|v| options.contains(&v)),
        Filter::IsNull(_) => value.is_none(),
        Filter::NotNull(_) => value.is_some(),
    }
}

fn matches_all(row: &Row, filters: &[Filter]) -> bool {
    filters.iter().all(|f| matches(row, f))
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Postgres defaults: nulls last ascending, first descending.
fn compare_rows(a: &Row, b: &Row, query: &Query) -> Ordering {
    for order in &query.order {
        let ordering = match (column(a, &order.column), column(b, &order.column)) {
            (Some(x), Some(y)) => compare_values(x, y),
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
        };
        let ordering = match order.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError> {
        self.check(Operation::Select, table).await?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Row> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by(|a, b| compare_rows(a, b, query));
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError> {
        self.check(Operation::Insert, table).await?;
        let row = with_defaults(as_object(table, row)?);
        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: &str,
        patch: Row,
        filters: &[Filter],
    ) -> Result<Vec<Row>, StoreError> {
        self.check(Operation::Update, table).await?;
        let patch = as_object(table, patch)?;
        let mut tables = self.tables.write().await;
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| matches_all(row, filters)) {
                merge(row, &patch);
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn upsert(
        &self,
        table: &str,
        rows: Vec<Row>,
        on_conflict: &str,
    ) -> Result<Vec<Row>, StoreError> {
        self.check(Operation::Upsert, table).await?;
        let incoming = rows
            .into_iter()
            .map(|row| as_object(table, row))
            .collect::<Result<Vec<_>, _>>()?;

        let mut tables = self.tables.write().await;
        let existing = tables.entry(table.to_string()).or_default();
        let mut written = Vec::with_capacity(incoming.len());
        for patch in incoming {
            let key = patch.get(on_conflict).and_then(text);
            let position = key.as_ref().and_then(|key| {
                existing
                    .iter()
                    .position(|row| column(row, on_conflict).and_then(text).as_ref() == Some(key))
            });
            match position {
                Some(index) => {
                    merge(&mut existing[index], &patch);
                    written.push(existing[index].clone());
                }
                None => {
                    let row = with_defaults(patch);
                    existing.push(row.clone());
                    written.push(row);
                }
            }
        }
        Ok(written)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
        self.check(Operation::Delete, table).await?;
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !matches_all(row, filters));
        Ok((before - rows.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let failures = self.failures.read().await;
        match failures.iter().find(|((op, _), _)| *op == Operation::Ping) {
            Some((_, message)) => Err(StoreError::Rejected(message.clone())),
            None => Ok(()),
        }
    }
}
