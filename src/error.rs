use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// StoreError
///
/// Failure reported by the Content Store Gateway (the `Repository` trait).
/// Kept as its own type so the repository boundary stays independent of the
/// HTTP layer: handlers convert it into an `ApiError` when they surface it.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StoreError(pub String);

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError(e.to_string())
    }
}

/// ApiError
///
/// The five failure kinds a content-management request can end in, mapped
/// one-to-one onto HTTP statuses by the `IntoResponse` impl below.
///
/// Propagation policy:
/// - `Validation` and `Auth` are raised before any backend call is made.
/// - `Storage` during upload aborts the create before any record insert.
/// - `Store` during insert is raised *after* best-effort blob rollback, so the
///   caller sees exactly one error for the operation they attempted.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input. The caller's fault; no store calls made.
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid, or non-admin credentials.
    #[error("{0}")]
    Auth(String),

    /// Object store upload or delete failed.
    #[error("storage operation failed: {0}")]
    Storage(String),

    /// Record insert/update/delete failed.
    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),

    /// The referenced record does not exist.
    #[error("record not found")]
    NotFound,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    /// Every failure becomes a structured `{success:false, error}` body.
    /// Auth rejections additionally carry `code:"UNAUTHORIZED"` so the admin
    /// frontend can distinguish "log in again" from other failures.
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Auth(reason) => json!({
                "success": false,
                "error": reason,
                "code": "UNAUTHORIZED",
            }),
            other => json!({
                "success": false,
                "error": other.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}
