//! The store contract shared by the REST client and the in-memory store.
//!
//! Rows travel as untyped JSON objects. Typing happens at this boundary:
//! repositories decode with [`decode_rows`] / [`decode_row`] and a row that
//! does not fit its struct is a [`StoreError::Decode`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// One JSON object as stored in a table.
pub type Row = serde_json::Value;

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A row filter. Values are compared in their text form, which is how the
/// REST interface receives them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq(String, String),
    Neq(String, String),
    In(String, Vec<String>),
    IsNull(String),
    NotNull(String),
}

impl Filter {
    pub fn eq(column: &str, value: impl ToString) -> Self {
        Filter::Eq(column.to_string(), value.to_string())
    }

    pub fn neq(column: &str, value: impl ToString) -> Self {
        Filter::Neq(column.to_string(), value.to_string())
    }

    pub fn any_of<I, V>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        Filter::In(
            column.to_string(),
            values.into_iter().map(|v| v.to_string()).collect(),
        )
    }

    pub fn is_null(column: &str) -> Self {
        Filter::IsNull(column.to_string())
    }

    pub fn not_null(column: &str) -> Self {
        Filter::NotNull(column.to_string())
    }

    pub fn column(&self) -> &str {
        match self {
            Filter::Eq(c, _)
            | Filter::Neq(c, _)
            | Filter::In(c, _)
            | Filter::IsNull(c)
            | Filter::NotNull(c) => c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// Filters, ordering and limit of a select.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order.push(Order {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Table-level operations of the hosted store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Rows matching `query`, in the requested order.
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError>;

    /// Insert one row and return it with generated columns filled in.
    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError>;

    /// Merge `patch` into every row matching `filters`; returns the updated rows.
    async fn update(&self, table: &str, patch: Row, filters: &[Filter])
        -> Result<Vec<Row>, StoreError>;

    /// Insert-or-merge keyed on `on_conflict`. All rows succeed or none do.
    async fn upsert(
        &self,
        table: &str,
        rows: Vec<Row>,
        on_conflict: &str,
    ) -> Result<Vec<Row>, StoreError>;

    /// Remove rows matching `filters`; returns how many went away.
    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError>;

    /// Cheap reachability check.
    async fn ping(&self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Row codecs
// ---------------------------------------------------------------------------

pub fn decode_row<T: DeserializeOwned>(table: &str, row: Row) -> Result<T, StoreError> {
    serde_json::from_value(row).map_err(|source| StoreError::Decode {
        table: table.to_string(),
        source,
    })
}

pub fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Row>) -> Result<Vec<T>, StoreError> {
    rows.into_iter().map(|row| decode_row(table, row)).collect()
}

/// First row of a write response, or [`StoreError::Empty`].
pub fn decode_first<T: DeserializeOwned>(table: &str, rows: Vec<Row>) -> Result<T, StoreError> {
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::Empty(table.to_string()))?;
    decode_row(table, row)
}

pub fn encode_row<T: Serialize>(table: &str, value: &T) -> Result<Row, StoreError> {
    serde_json::to_value(value).map_err(|source| StoreError::Encode {
        table: table.to_string(),
        source,
    })
}
