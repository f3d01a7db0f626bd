//! HTTP error type
//!
//! Every failure is reported in the service envelope:
//! `{"success": false, "message": "..."}`.

use axum::{
    extract::multipart::MultipartRejection,
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Upload exceeds the configured size limit (413)
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error (poster storage)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// showlog-common error
    #[error(transparent)]
    Common(#[from] showlog_common::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Common(showlog_common::Error::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Common(showlog_common::Error::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) | ApiError::Io(_) | ApiError::Common(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let message = match &self {
            ApiError::Common(showlog_common::Error::InvalidInput(msg)) => msg.clone(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

// Extractor rejections are reported in the envelope instead of axum's
// plain-text body.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
