use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::fetcher::{FetchError, FetchErrorKind};

pub const BASIC_AUTH_REALM: &str = "Basic realm=\"content-exporter\"";

/// Errors surfaced by the serving layer
#[derive(Debug, Error)]
pub enum AppError {
    /// Upstream fetch failed
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// Missing or wrong basic-auth credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Request method other than GET/HEAD
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),
    /// Upstream body could not be decoded for rendering
    #[error("Malformed content: {0}")]
    MalformedContent(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Fetch(e) => fetch_error_status(e.kind()),
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::MalformedContent(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// HTTP status reported for a failed upstream fetch
pub fn fetch_error_status(kind: FetchErrorKind) -> StatusCode {
    match kind {
        FetchErrorKind::RequestTimeout => StatusCode::GATEWAY_TIMEOUT,
        FetchErrorKind::ResponseStatus404
        | FetchErrorKind::ResponseStatus500
        | FetchErrorKind::ResponseStatusNot200
        | FetchErrorKind::ContentTypeParse
        | FetchErrorKind::InvalidContentTypeFound
        | FetchErrorKind::UnableToReadBody
        | FetchErrorKind::Connection => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": error_type_name(&self),
            }
        }));

        let mut response = (status, body).into_response();
        match &self {
            Self::Unauthorized(_) => {
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static(BASIC_AUTH_REALM),
                );
            }
            Self::MethodNotAllowed(_) => {
                response
                    .headers_mut()
                    .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
            }
            _ => {}
        }
        response
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::Fetch(e) => e.kind().as_str(),
        AppError::Unauthorized(_) => "unauthorized",
        AppError::MethodNotAllowed(_) => "method_not_allowed",
        AppError::MalformedContent(_) => "malformed_content",
    }
}
