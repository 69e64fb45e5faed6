use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// DataAccessError
///
/// Failures raised by the persistence layer. Never retried; the HTTP layer decides how much
/// of it the caller gets to see (nothing, for query failures).
#[derive(Debug, Error)]
pub enum DataAccessError {
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("constraint violated: {0}")]
    Constraint(String),
}

impl DataAccessError {
    /// Sorts a raw sqlx error into a constraint violation (caller's fault, 409)
    /// or a query failure (ours, 500).
    pub fn classify(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                return DataAccessError::Constraint(db_err.message().to_string());
            }
        }
        DataAccessError::Query(err)
    }
}

/// AppError
///
/// The error taxonomy exposed over HTTP. Every handler returns `Result<_, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    DataAccess(#[from] DataAccessError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("forbidden")]
    Forbidden,

    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::DataAccess(DataAccessError::Constraint(detail)) => {
                tracing::warn!("constraint violation: {}", detail);
                (
                    StatusCode::CONFLICT,
                    "Request conflicts with existing data".to_string(),
                )
            }
            AppError::DataAccess(err) => {
                // Detail stays in the logs.
                tracing::error!("data access error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            AppError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
