//! Response types and error handling for API endpoints
//!
//! Provides unified error handling, JSON response formatting and the
//! JSON-or-redirect negotiation used by browser form posts.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use arena_common::AppError;
use arena_core::DomainError;
use arena_service::ServiceError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::extractors::ResponseMode;

/// API error type for consistent error responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid path parameter: {0}")]
    InvalidPath(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        let code = match self {
            Self::App(e) => e.status_code(),
            Self::Service(e) => e.status_code(),
            Self::Domain(e) => arena_common::domain_status(e),
            Self::InvalidPath(_) | Self::InvalidBody(_) => 400,
            Self::MissingAuth => 401,
            Self::Internal(_) => 500,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::App(e) => e.error_code(),
            Self::Service(e) => e.error_code(),
            Self::Domain(e) => e.code(),
            Self::InvalidPath(_) => "INVALID_PATH_PARAMETER",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::MissingAuth => "MISSING_AUTHORIZATION",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    pub fn invalid_body(msg: impl Into<String>) -> Self {
        Self::InvalidBody(msg.into())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Error detail for API responses
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code().to_string();
        let message = self.to_string();

        if status.is_server_error() {
            error!(error = ?self, status = status.as_u16(), "Server error occurred");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

/// Created response (201) with JSON body
pub struct Created<T>(pub T);

impl<T: IntoResponse> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = self.0.into_response();
        *response.status_mut() = StatusCode::CREATED;
        response
    }
}

/// Result of a mutating browser endpoint.
///
/// Scripted clients get the JSON body with `status`. Plain form posts get
/// `303 See Other` pointing at `location`, carrying the same body.
pub struct Negotiated<T> {
    mode: ResponseMode,
    status: StatusCode,
    location: String,
    body: T,
}

impl<T> Negotiated<T> {
    pub fn new(mode: ResponseMode, location: impl Into<String>, body: T) -> Self {
        Self {
            mode,
            status: StatusCode::OK,
            location: location.into(),
            body,
        }
    }

    /// Same as [`Negotiated::new`] but answers scripted clients with 201
    pub fn created(mode: ResponseMode, location: impl Into<String>, body: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::new(mode, location, body)
        }
    }
}

impl<T: Serialize> IntoResponse for Negotiated<T> {
    fn into_response(self) -> Response {
        match self.mode {
            ResponseMode::Json => (self.status, Json(self.body)).into_response(),
            ResponseMode::Redirect => {
                let mut response = (StatusCode::SEE_OTHER, Json(self.body)).into_response();
                match HeaderValue::try_from(self.location) {
                    Ok(location) => {
                        response.headers_mut().insert(header::LOCATION, location);
                    }
                    Err(e) => error!(error = %e, "Redirect target is not a valid header value"),
                }
                response
            }
        }
    }
}
