use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use serde::Serialize;
use service::{auth::AuthError, errors::ServiceError};
use thiserror::Error;
use tracing::error;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    detail: &'a str,
}

/// Error response rendered as `{"error": ..., "detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, detail: impl Into<String>) -> Self {
        Self { status, error, detail: detail.into() }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation", detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = self.error, detail = %self.detail, "request failed");
        }
        let body = ErrorBody { error: self.error, detail: &self.detail };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(d) => Self::bad_request(d),
            ServiceError::Model(ModelError::Validation(d)) => Self::bad_request(d),
            ServiceError::NotFound(d) => Self::new(StatusCode::NOT_FOUND, "not_found", d),
            ServiceError::Conflict(d) => Self::new(StatusCode::CONFLICT, "conflict", d),
            ServiceError::Model(ModelError::Decode(d)) => Self::new(StatusCode::BAD_GATEWAY, "backend", d),
            ServiceError::Backend(d) => Self::new(StatusCode::BAD_GATEWAY, "backend", d),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let detail = e.to_string();
        match e {
            AuthError::Validation(d) => Self::bad_request(d),
            AuthError::Unauthorized | AuthError::LoginFailed => Self::unauthorized(detail),
            AuthError::Backend(_) => Self::new(StatusCode::BAD_GATEWAY, "backend", detail),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
