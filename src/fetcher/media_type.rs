//! Content-Type parsing and mime-type token matching
//!
//! Only the `type/subtype` essence of a header is considered; parameters such
//! as `charset` are dropped. An accepted token such as `json` matches
//! `application/json`, `application/problem+json` and `application/json`
//! written out in full.

/// Parsed `type/subtype` essence of a Content-Type header, lowercased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    pub type_: String,
    pub subtype: String,
}

impl MediaType {
    /// Parse a Content-Type header value
    ///
    /// Returns `None` when the value is empty or the essence is not two RFC 7230
    /// tokens separated by `/`.
    pub fn parse(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        let (type_, subtype) = essence.split_once('/')?;

        if !is_token(type_) || !is_token(subtype) {
            return None;
        }

        Some(Self {
            type_: type_.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
        })
    }

    /// Structured syntax suffix, e.g. `json` for `application/ld+json`
    pub fn suffix(&self) -> Option<&str> {
        self.subtype.rsplit_once('+').map(|(_, suffix)| suffix)
    }

    pub fn essence(&self) -> String {
        format!("{}/{}", self.type_, self.subtype)
    }

    /// Check an accepted token against this media type
    ///
    /// `token` must already be normalized with [`normalize_token`].
    pub fn matches(&self, token: &str) -> bool {
        if token.contains('/') {
            return self.essence() == token;
        }
        self.subtype == token || self.suffix() == Some(token)
    }
}

/// Trim and lowercase an accepted mime-type token
pub fn normalize_token(token: &str) -> String {
    token.trim().to_ascii_lowercase()
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^'
                        | b'_' | b'`' | b'|' | b'~'
                )
        })
}
