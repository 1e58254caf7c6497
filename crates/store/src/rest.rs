//! PostgREST client for the hosted store.
//!
//! Every request carries the project `apikey` header plus a bearer token.
//! With a viewer's access token the store's row-level policies apply; the
//! service key bypasses them and is only used for server-side bookkeeping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;

use crate::error::StoreError;
use crate::remote::{Direction, Filter, Query, RemoteStore, Row};

const PREFER_RETURN: &str = "return=representation";
const PREFER_UPSERT: &str = "resolution=merge-duplicates,return=representation";

/// Build the shared HTTP client used by every [`PostgrestStore`].
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, StoreError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// A PostgREST endpoint bound to one credential.
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    client: reqwest::Client,
    rest_url: String,
    api_key: String,
    bearer: String,
}

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
    #[serde(default)]
    details: Option<String>,
}

impl PostgrestStore {
    /// * `rest_url` - e.g. `https://xyz.supabase.co/rest/v1`.
    /// * `bearer` - access token (or key) sent as `Authorization: Bearer`.
    pub fn new(
        client: reqwest::Client,
        rest_url: impl Into<String>,
        api_key: impl Into<String>,
        bearer: impl Into<String>,
    ) -> Self {
        Self {
            client,
            rest_url: rest_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            bearer: bearer.into(),
        }
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.rest_url, table))
            .headers(self.auth_headers())
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.bearer)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    // ---- private helpers ----

    /// Map a non-2xx response to [`StoreError::Api`], preferring the
    /// PostgREST `message` over the raw body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = match serde_json::from_str::<PostgrestError>(&body) {
            Ok(PostgrestError {
                message,
                details: Some(details),
            }) if !details.is_empty() => format!("{message} ({details})"),
            Ok(err) => err.message,
            Err(_) => body,
        };
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse_rows(response: reqwest::Response) -> Result<Vec<Row>, StoreError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<Vec<Row>>().await?)
    }
}

/// Encode filters as PostgREST query parameters.
pub fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|filter| {
            let value = match filter {
                Filter::Eq(_, v) => format!("eq.{v}"),
                Filter::Neq(_, v) => format!("neq.{v}"),
                Filter::In(_, values) => {
                    let quoted: Vec<String> = values
                        .iter()
                        .map(|v| format!("\"{}\"", v.replace('"', "\\\"")))
                        .collect();
                    format!("in.({})", quoted.join(","))
                }
                Filter::IsNull(_) => "is.null".to_string(),
                Filter::NotNull(_) => "not.is.null".to_string(),
            };
            (filter.column().to_string(), value)
        })
        .collect()
}

/// Encode a whole select query, `select=*` included.
pub fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    params.extend(filter_params(&query.filters));
    if !query.order.is_empty() {
        let order: Vec<String> = query
            .order
            .iter()
            .map(|o| {
                let dir = match o.direction {
                    Direction::Asc => "asc",
                    Direction::Desc => "desc",
                };
                format!("{}.{dir}", o.column)
            })
            .collect();
        params.push(("order".to_string(), order.join(",")));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

#[async_trait]
impl RemoteStore for PostgrestStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError> {
        let response = self
            .request(Method::GET, table)
            .query(&query_params(query))
            .send()
            .await?;
        Self::parse_rows(response).await
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError> {
        let response = self
            .request(Method::POST, table)
            .header("Prefer", PREFER_RETURN)
            .json(&row)
            .send()
            .await?;
        Self::parse_rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Empty(table.to_string()))
    }

    async fn update(
        &self,
        table: &str,
        patch: Row,
        filters: &[Filter],
    ) -> Result<Vec<Row>, StoreError> {
        let response = self
            .request(Method::PATCH, table)
            .header("Prefer", PREFER_RETURN)
            .query(&filter_params(filters))
            .json(&patch)
            .send()
            .await?;
        Self::parse_rows(response).await
    }

    async fn upsert(
        &self,
        table: &str,
        rows: Vec<Row>,
        on_conflict: &str,
    ) -> Result<Vec<Row>, StoreError> {
        let response = self
            .request(Method::POST, table)
            .header("Prefer", PREFER_UPSERT)
            .query(&[("on_conflict", on_conflict)])
            .json(&rows)
            .send()
            .await?;
        Self::parse_rows(response).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
        let response = self
            .request(Method::DELETE, table)
            .header("Prefer", PREFER_RETURN)
            .query(&filter_params(filters))
            .send()
            .await?;
        Ok(Self::parse_rows(response).await?.len() as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let response = self
            .client
            .get(format!("{}/", self.rest_url))
            .headers(self.auth_headers())
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}
