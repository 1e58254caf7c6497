/// Errors from the remote store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Store request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered with a non-2xx status.
    #[error("Store API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A row did not match the expected shape.
    #[error("Malformed {table} row: {source}")]
    Decode {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not encode {table} row: {source}")]
    Encode {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    /// A write that must return a row returned none.
    #[error("Store returned no row for {0}")]
    Empty(String),

    /// Rejected by the in-memory store (injected failure).
    #[error("{0}")]
    Rejected(String),
}

impl StoreError {
    /// HTTP status of an API error, if the store answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Api { status, .. } => Some(*status),
            StoreError::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
