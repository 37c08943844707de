use std::fmt;
use thiserror::Error;

/// Discriminant of a [`FetchError`], usable for branching and metric labels
/// without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    RequestTimeout,
    ResponseStatus404,
    ResponseStatus500,
    ResponseStatusNot200,
    ContentTypeParse,
    InvalidContentTypeFound,
    UnableToReadBody,
    Connection,
}

impl FetchErrorKind {
    pub const ALL: [FetchErrorKind; 8] = [
        Self::RequestTimeout,
        Self::ResponseStatus404,
        Self::ResponseStatus500,
        Self::ResponseStatusNot200,
        Self::ContentTypeParse,
        Self::InvalidContentTypeFound,
        Self::UnableToReadBody,
        Self::Connection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestTimeout => "request_timeout",
            Self::ResponseStatus404 => "response_status_404",
            Self::ResponseStatus500 => "response_status_500",
            Self::ResponseStatusNot200 => "response_status_not_200",
            Self::ContentTypeParse => "content_type_parse",
            Self::InvalidContentTypeFound => "invalid_content_type_found",
            Self::UnableToReadBody => "unable_to_read_body",
            Self::Connection => "connection",
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure of a single content fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timed out: {0}")]
    RequestTimeout(String),

    #[error("Response status 404: {0}")]
    ResponseStatus404(String),

    #[error("Response status 500: {0}")]
    ResponseStatus500(String),

    #[error("Response status not 200: {0}")]
    ResponseStatusNot200(String),

    #[error("Could not parse content type: {0}")]
    ContentTypeParse(String),

    #[error("Invalid content type found: {0}")]
    InvalidContentTypeFound(String),

    #[error("Unable to read body: {0}")]
    UnableToReadBody(String),

    #[error("Connection failed: {0}")]
    Connection(String),
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::RequestTimeout(_) => FetchErrorKind::RequestTimeout,
            Self::ResponseStatus404(_) => FetchErrorKind::ResponseStatus404,
            Self::ResponseStatus500(_) => FetchErrorKind::ResponseStatus500,
            Self::ResponseStatusNot200(_) => FetchErrorKind::ResponseStatusNot200,
            Self::ContentTypeParse(_) => FetchErrorKind::ContentTypeParse,
            Self::InvalidContentTypeFound(_) => FetchErrorKind::InvalidContentTypeFound,
            Self::UnableToReadBody(_) => FetchErrorKind::UnableToReadBody,
            Self::Connection(_) => FetchErrorKind::Connection,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::RequestTimeout(msg)
            | Self::ResponseStatus404(msg)
            | Self::ResponseStatus500(msg)
            | Self::ResponseStatusNot200(msg)
            | Self::ContentTypeParse(msg)
            | Self::InvalidContentTypeFound(msg)
            | Self::UnableToReadBody(msg)
            | Self::Connection(msg) => msg,
        }
    }

    /// Build the error for a non-200 status
    pub(crate) fn from_status(status: reqwest::StatusCode, url: &str) -> Self {
        let msg = format!("{} returned {}", url, status);
        match status.as_u16() {
            404 => Self::ResponseStatus404(msg),
            500 => Self::ResponseStatus500(msg),
            _ => Self::ResponseStatusNot200(msg),
        }
    }
}

/// Rejection of caller-supplied fetch parameters
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("URL must not be empty")]
    EmptyUrl,

    #[error("Invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Accepted mime type must not be empty")]
    EmptyMimeType,

    #[error("Timeout must be a positive number of seconds")]
    NonPositiveTimeout,
}
