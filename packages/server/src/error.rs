use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use blog_common::storage::StorageError;
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;

/// Structured error envelope returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    #[schema(example = false)]
    pub success: bool,
    /// Human-readable error description.
    #[schema(example = "Blog not found")]
    pub message: String,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `CONFLICT`, `FOREIGN_KEY_VIOLATION`, `INTERNAL_ERROR`.
    #[schema(example = "NOT_FOUND")]
    pub error: &'static str,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    Conflict(String),
    /// A write referenced a row that does not exist.
    InvalidReference(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let (status, code, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            AppError::InvalidReference(msg) => {
                (StatusCode::BAD_REQUEST, "FOREIGN_KEY_VIOLATION", msg)
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".into(),
                )
            }
        };

        (
            status,
            ErrorBody {
                success: false,
                message,
                error: code,
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                AppError::Conflict(format!("A record with this value already exists: {msg}"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                AppError::InvalidReference(format!("Related record not found: {msg}"))
            }
            None => match err {
                DbErr::RecordNotFound(msg) => AppError::NotFound(msg),
                other => AppError::Internal(other.to_string()),
            },
            Some(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Internal(err.to_string())
    }
}
