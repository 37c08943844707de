//! Deadline-bounded content fetching
//!
//! A fetch is one GET request whose whole lifecycle (connect, headers, body)
//! must finish before the request's deadline. Every failure is reported as a
//! single [`FetchError`] whose [`FetchErrorKind`] tells the caller what went
//! wrong without parsing messages.

pub mod error;
pub mod media_type;

pub use error::{FetchError, FetchErrorKind, RequestError};
pub use media_type::MediaType;

use reqwest::{header::CONTENT_TYPE, header::HeaderMap, Client, StatusCode, Url};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Validated parameters of a single fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    url: Url,
    mime_type: String,
    timeout: Duration,
}

impl FetchRequest {
    /// Build a request
    ///
    /// # Errors
    /// - empty or non-absolute URL, or a scheme other than http/https
    /// - empty mime type
    /// - zero timeout
    pub fn new(url: &str, mime_type: &str, timeout_seconds: u64) -> Result<Self, RequestError> {
        let url = parse_url(url)?;

        let mime_type = media_type::normalize_token(mime_type);
        if mime_type.is_empty() {
            return Err(RequestError::EmptyMimeType);
        }

        if timeout_seconds == 0 {
            return Err(RequestError::NonPositiveTimeout);
        }

        Ok(Self {
            url,
            mime_type,
            timeout: Duration::from_secs(timeout_seconds),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Normalized accepted mime-type token
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Parse an absolute http(s) URL
pub fn parse_url(url: &str) -> Result<Url, RequestError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(RequestError::EmptyUrl);
    }

    let parsed = Url::parse(trimmed).map_err(|e| RequestError::InvalidUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(RequestError::InvalidUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", scheme),
        }),
    }
}

/// Successfully fetched content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    /// Raw response body, possibly empty
    pub body: Vec<u8>,
    /// The accepted mime-type token that matched the response
    pub mime_type: String,
}

/// HTTP content fetcher
///
/// Holds no per-call state. Cloning is cheap and clones share the
/// transport's connection pool, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("content-exporter/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetch content described by `request`
    ///
    /// Status is checked before Content-Type, which is checked before the body
    /// is read. The deadline can preempt any of those steps.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<Content, FetchError> {
        debug!(
            url = %request.url(),
            mime_type = request.mime_type(),
            timeout_secs = request.timeout().as_secs(),
            "Fetching content"
        );

        // A timeout too large to represent as an instant never fires
        let result = match Instant::now().checked_add(request.timeout()) {
            Some(deadline) => match tokio::time::timeout_at(deadline, self.execute(request)).await {
                Ok(result) => result,
                Err(_) => Err(timeout_error(request)),
            },
            None => self.execute(request).await,
        };

        match &result {
            Ok(content) => debug!(
                url = %request.url(),
                bytes = content.body.len(),
                "Content fetched"
            ),
            Err(e) => warn!(
                url = %request.url(),
                kind = %e.kind(),
                error = %e,
                "Content fetch failed"
            ),
        }

        result
    }

    async fn execute(&self, request: &FetchRequest) -> Result<Content, FetchError> {
        let url = request.url().as_str();

        let response = self
            .client
            .get(request.url().clone())
            .timeout(request.timeout())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    timeout_error(request)
                } else {
                    FetchError::Connection(format!("{}: {}", url, e))
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::from_status(status, url));
        }

        let mime_type = match_content_type(response.headers(), request.mime_type())?;

        let declared_length = response.content_length();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                timeout_error(request)
            } else {
                FetchError::UnableToReadBody(format!("{}: {}", url, e))
            }
        })?;

        if let Some(expected) = declared_length {
            if (body.len() as u64) < expected {
                return Err(FetchError::UnableToReadBody(format!(
                    "{}: received {} of {} declared bytes",
                    url,
                    body.len(),
                    expected
                )));
            }
        }

        Ok(Content {
            body: body.to_vec(),
            mime_type,
        })
    }
}

/// Validate the Content-Type header against an accepted token
///
/// Returns the token on success.
pub fn match_content_type(headers: &HeaderMap, accepted: &str) -> Result<String, FetchError> {
    let value = headers
        .get(CONTENT_TYPE)
        .ok_or_else(|| FetchError::ContentTypeParse("no Content-Type header".to_string()))?;

    let value = value.to_str().map_err(|_| {
        FetchError::ContentTypeParse("Content-Type header is not valid ASCII".to_string())
    })?;

    let media = MediaType::parse(value)
        .ok_or_else(|| FetchError::ContentTypeParse(format!("unparsable value \"{}\"", value)))?;

    if !media.matches(accepted) {
        return Err(FetchError::InvalidContentTypeFound(format!(
            "expected \"{}\" but found \"{}\"",
            accepted,
            media.essence()
        )));
    }

    Ok(accepted.to_string())
}

fn timeout_error(request: &FetchRequest) -> FetchError {
    FetchError::RequestTimeout(format!(
        "{} did not respond within {}s",
        request.url(),
        request.timeout().as_secs()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_request_validation() {
        assert_eq!(
            FetchRequest::new("", "json", 10).unwrap_err(),
            RequestError::EmptyUrl
        );
        assert!(matches!(
            FetchRequest::new("/relative/path", "json", 10),
            Err(RequestError::InvalidUrl { .. })
        ));
        assert!(matches!(
            FetchRequest::new("ftp://example.com/file", "json", 10),
            Err(RequestError::InvalidUrl { .. })
        ));
        assert_eq!(
            FetchRequest::new("http://example.com", "  ", 10).unwrap_err(),
            RequestError::EmptyMimeType
        );
        assert_eq!(
            FetchRequest::new("http://example.com", "json", 0).unwrap_err(),
            RequestError::NonPositiveTimeout
        );
    }

    #[test]
    fn test_request_normalizes_mime_type() {
        let request = FetchRequest::new("https://example.com/data", " JSON ", 5).unwrap();
        assert_eq!(request.mime_type(), "json");
        assert_eq!(request.timeout(), Duration::from_secs(5));
        assert_eq!(request.url().as_str(), "https://example.com/data");
    }

    #[test]
    fn test_match_content_type_missing_header() {
        let error = match_content_type(&HeaderMap::new(), "json").unwrap_err();
        assert_eq!(error.kind(), FetchErrorKind::ContentTypeParse);
    }

    #[test]
    fn test_match_content_type_unparsable() {
        let error = match_content_type(&headers_with("garbage"), "json").unwrap_err();
        assert_eq!(error.kind(), FetchErrorKind::ContentTypeParse);
    }

    #[test]
    fn test_match_content_type_mismatch() {
        let error = match_content_type(&headers_with("text/plain"), "json").unwrap_err();
        assert_eq!(error.kind(), FetchErrorKind::InvalidContentTypeFound);
        assert!(error.message().contains("text/plain"));
    }

    #[test]
    fn test_match_content_type_ignores_charset() {
        let matched =
            match_content_type(&headers_with("application/json; charset=utf-8"), "json").unwrap();
        assert_eq!(matched, "json");
    }

    #[test]
    fn test_fetcher_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<Fetcher>();
        assert_send_sync::<FetchRequest>();
    }
}
