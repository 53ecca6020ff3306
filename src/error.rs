//! Error types for the tweetline service.
//!
//! Every handler returns `Result<_, ApiError>`. The error carries an HTTP status
//! and a human-readable message, and renders itself as the standard error
//! envelope `{statusCode, message, success: false}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::{error, warn};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Failure kinds surfaced by the tweet handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, empty or malformed client input.
    #[error("{0}")]
    Validation(String),
    /// No authenticated actor on the request.
    #[error("{0}")]
    Unauthorized(String),
    /// The actor is not the owner of the resource.
    #[error("{0}")]
    Forbidden(String),
    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Persistence failed or returned something it should not have.
    #[error("{0}")]
    Internal(String),
    /// The request body was refused before parsing (too large, wrong media type).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected { status, .. } => *status,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        error!("Store operation failed: {}", err);
        ApiError::Internal("Database operation failed".to_string())
    }
}

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
    pub success: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed with {}: {}", status.as_u16(), self);
        } else {
            warn!("Request rejected with {}: {}", status.as_u16(), self);
        }

        let body = ErrorBody {
            status_code: status.as_u16(),
            message: self.to_string(),
            success: false,
        };
        (status, Json(body)).into_response()
    }
}
