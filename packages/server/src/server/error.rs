//! HTTP error responses.
//!
//! Every failure leaves the server as `{ "error": message }` with the status
//! matching its kind.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::common::AuthError;
use crate::domains::businesses::VaultError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Server configuration error")]
    Configuration,

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Configuration | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::AuthenticationRequired | AuthError::InvalidToken => {
                ApiError::Unauthorized(error.to_string())
            }
            AuthError::PermissionDenied => ApiError::Forbidden(error.to_string()),
            AuthError::InternalError(e) => ApiError::Internal(e),
        }
    }
}

impl From<VaultError> for ApiError {
    fn from(error: VaultError) -> Self {
        match error {
            VaultError::Auth(e) => e.into(),
            VaultError::MissingEncryptionKey => ApiError::Configuration,
            VaultError::Internal(e) => ApiError::Internal(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(e) => tracing::error!(error = ?e, "Request failed"),
            ApiError::Configuration => tracing::error!("Request failed: server misconfigured"),
            other => tracing::debug!(status = %status, error = %other, "Request rejected"),
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
