//! Request body and response format negotiation for browser forms

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap},
    Form, Json,
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;

use crate::response::ApiError;

/// How a mutating endpoint should answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    Json,
    /// `303 See Other` to the affected page
    Redirect,
}

impl ResponseMode {
    /// Scripted requests (`X-Requested-With: XMLHttpRequest`) and JSON
    /// bodies get JSON, everything else a redirect.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let xhr = headers
            .get("x-requested-with")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
        if xhr || is_json(headers) {
            Self::Json
        } else {
            Self::Redirect
        }
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ResponseMode {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

pub(crate) fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn is_json(headers: &HeaderMap) -> bool {
    let mime = content_type(headers);
    mime.starts_with("application/json") || mime.contains("+json")
}

/// Body that may arrive as JSON or as `application/x-www-form-urlencoded`
#[derive(Debug, Clone)]
pub struct FormOrJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for FormOrJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(req.headers()) {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::invalid_body(e.body_text()))?;
            return Ok(Self(value));
        }

        if content_type(req.headers()).starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::invalid_body(e.body_text()))?;
            return Ok(Self(value));
        }

        Err(ApiError::invalid_body("Expected a JSON or form-encoded body"))
    }
}
