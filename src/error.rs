//! Error taxonomy (spec.md S7): Validation, NotFound, Conflict, Repository, Internal.
//!
//! Each kind maps to one HTTP status when surfaced through the API layer,
//! generalizing the teacher's `AppError`/`ApiResponse` pattern
//! (see `utils::response`) to the exchange's error kinds instead of a flat
//! bag of REST-specific codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("repository error: {0}")]
    Repository(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ExchangeError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ExchangeError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION"),
            ExchangeError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ExchangeError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ExchangeError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "REPOSITORY_ERROR"),
            ExchangeError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ExchangeError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ApiResponse::<()>::error(code, &self.to_string());
        (status, Json(body)).into_response()
    }
}
