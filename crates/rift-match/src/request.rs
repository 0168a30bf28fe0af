//! Read-only request view consumed by pattern evaluation.
//!
//! The interception layer owns the real request representation; it only
//! needs to expose the request line through [`RequestView`].

use crate::error::PatternError;
use crate::uri::{normalize_path, UrlParts};
use hyper::{Method, Request, Uri};
use std::borrow::Cow;

/// Normalized request fields a pattern can read.
///
/// Missing components read as empty strings (or `None` for the port).
pub trait RequestView {
    fn method(&self) -> &str;
    fn scheme(&self) -> &str;
    fn host(&self) -> &str;
    /// Explicit port only; defaults are resolved by the port pattern.
    fn port(&self) -> Option<u16>;
    /// Path resolved the way path patterns are cleaned: dot segments
    /// removed and percent-encoding normalized.
    fn path(&self) -> Cow<'_, str>;
    /// Raw query string without the leading `?`.
    fn query(&self) -> &str;
    /// Full URL as sent.
    fn url(&self) -> Cow<'_, str>;
}

/// Owned request line. `path` holds the normalized path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParts {
    pub method: String,
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
    pub query: String,
    pub url: String,
}

impl RequestParts {
    /// Build from a method and a URL string.
    pub fn new(method: impl Into<String>, url: &str) -> Result<Self, PatternError> {
        let parts = UrlParts::parse(url)?;
        Ok(Self {
            method: method.into(),
            scheme: parts.scheme,
            host: parts.host,
            port: parts.port,
            path: normalize_path(&parts.path),
            query: parts.query,
            url: url.to_string(),
        })
    }

    pub fn from_uri(method: &Method, uri: &Uri) -> Self {
        Self {
            method: method.as_str().to_string(),
            scheme: uri.scheme_str().unwrap_or_default().to_string(),
            host: uri.host().unwrap_or_default().to_string(),
            port: uri.port_u16(),
            path: normalize_path(uri.path()),
            query: uri.query().unwrap_or_default().to_string(),
            url: uri.to_string(),
        }
    }
}

impl RequestView for RequestParts {
    fn method(&self) -> &str {
        &self.method
    }

    fn scheme(&self) -> &str {
        &self.scheme
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> Option<u16> {
        self.port
    }

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.path)
    }

    fn query(&self) -> &str {
        &self.query
    }

    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.url)
    }
}

impl<B> RequestView for Request<B> {
    fn method(&self) -> &str {
        Request::method(self).as_str()
    }

    fn scheme(&self) -> &str {
        self.uri().scheme_str().unwrap_or_default()
    }

    fn host(&self) -> &str {
        self.uri().host().unwrap_or_default()
    }

    fn port(&self) -> Option<u16> {
        self.uri().port_u16()
    }

    fn path(&self) -> Cow<'_, str> {
        Cow::Owned(normalize_path(self.uri().path()))
    }

    fn query(&self) -> &str {
        self.uri().query().unwrap_or_default()
    }

    fn url(&self) -> Cow<'_, str> {
        Cow::Owned(self.uri().to_string())
    }
}
