use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use missionboard_core::error::CoreError;
use missionboard_store::{BoardError, StoreError};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for remote store
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `missionboard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The hosted store rejected or could not serve a request.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<BoardError> for AppError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::Core(core) => AppError::Core(core),
            BoardError::Store(store) => AppError::Store(store),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Store errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - 401/403 from the store (expired token, row-level policy) keep their status.
/// - 404 and 409 keep their status; other 4xx map to 400.
/// - Transport failures, 5xx and injected rejections map to 502 with the
///   store's message.
/// - Rows that fail to decode map to 500 with a sanitized message.
pub fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Api { status, message } => match *status {
            401 => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message.clone()),
            403 => (StatusCode::FORBIDDEN, "FORBIDDEN", message.clone()),
            404 => (StatusCode::NOT_FOUND, "NOT_FOUND", message.clone()),
            409 => (StatusCode::CONFLICT, "CONFLICT", message.clone()),
            400..=499 => (StatusCode::BAD_REQUEST, "STORE_REJECTED", message.clone()),
            _ => {
                tracing::error!(status, error = %message, "Store API error");
                (StatusCode::BAD_GATEWAY, "STORE_ERROR", message.clone())
            }
        },
        StoreError::Request(_) | StoreError::Rejected(_) => {
            tracing::error!(error = %err, "Store unavailable");
            (StatusCode::BAD_GATEWAY, "STORE_ERROR", err.to_string())
        }
        StoreError::Decode { .. } | StoreError::Encode { .. } | StoreError::Empty(_) => {
            tracing::error!(error = %err, "Store data error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn board_errors_unwrap_into_their_layer() {
        let core = AppError::from(BoardError::Core(CoreError::Forbidden("no".into())));
        assert_matches!(core, AppError::Core(CoreError::Forbidden(_)));

        let store = AppError::from(BoardError::Store(StoreError::Rejected("down".into())));
        assert_matches!(store, AppError::Store(StoreError::Rejected(msg)) if msg == "down");
    }

    #[test]
    fn policy_denial_is_forbidden() {
        let err = StoreError::Api {
            status: 403,
            message: "permission denied for table campaigns".into(),
        };
        let (status, code, message) = classify_store_error(&err);
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(code, "FORBIDDEN");
        assert!(message.contains("campaigns"));
    }

    #[test]
    fn upstream_failure_is_bad_gateway() {
        let err = StoreError::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(classify_store_error(&err).0, StatusCode::BAD_GATEWAY);
        let rejected = StoreError::Rejected("offline".into());
        assert_eq!(classify_store_error(&rejected).2, "offline");
    }

    #[test]
    fn decode_failure_is_sanitized() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = StoreError::Decode {
            table: "campaigns".into(),
            source,
        };
        let (status, _, message) = classify_store_error(&err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "An internal error occurred");
    }
}
