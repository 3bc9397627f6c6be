//! HTTP error mapping.
//!
//! Handlers return `Result<T, AppError>`. Client errors carry a readable
//! message; store failures are logged here and reach the client only as a
//! generic `500`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::services::{CatalogError, IntakeError};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed fields in a request body.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A product id that cannot name any product.
    #[error("Invalid ID")]
    InvalidId,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::InvalidId => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::InvalidInput(message) => json!({ "error": { "message": message, "code": "INVALID_INPUT" } }),
            Self::InvalidId => json!({ "message": "Invalid ID" }),
            Self::NotFound(message) => json!({ "message": message }),
            Self::Store(e) => {
                tracing::error!(error = %e, "Request failed on store access");
                json!({ "error": "Internal server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self { Self::InvalidInput(rejection.body_text()) }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidId(_) => Self::InvalidId,
            CatalogError::InvalidInput(message) => Self::InvalidInput(message),
            CatalogError::Store(e) => Self::Store(e),
        }
    }
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::Invalid(reason) => Self::InvalidInput(reason.to_string()),
            IntakeError::Store(e) => Self::Store(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
