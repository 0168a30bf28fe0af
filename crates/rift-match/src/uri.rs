//! URL decomposition and normalization helpers.

use crate::error::PatternError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use url::Url;

// RFC 3986, appendix B.
static URI_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([^:/?#]+):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("URI reference grammar is a valid regex")
});

/// Components of a (possibly scheme-relative) URL string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    /// Raw path; empty when the URL carries none (`https://foo.bar`).
    pub path: String,
    pub query: String,
}

impl UrlParts {
    /// Split `input` into components.
    ///
    /// Userinfo is dropped, IPv6 hosts keep their brackets and the scheme is
    /// lowercased. Fails only on a non-numeric or out-of-range port.
    pub fn parse(input: &str) -> Result<Self, PatternError> {
        let invalid = || PatternError::InvalidUrl(input.to_string());
        let caps = URI_REFERENCE.captures(input).ok_or_else(invalid)?;
        let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("");

        let authority = group(2);
        let authority = match authority.rsplit_once('@') {
            Some((_userinfo, rest)) => rest,
            None => authority,
        };
        let (host, port) = split_host_port(authority);
        let port = match port {
            Some(text) if !text.is_empty() => Some(text.parse::<u16>().map_err(|_| invalid())?),
            _ => None,
        };

        Ok(Self {
            scheme: group(1).to_ascii_lowercase(),
            host: host.to_string(),
            port,
            path: group(3).to_string(),
            query: group(4).to_string(),
        })
    }

    /// True if the URL names a scheme (`//host/path` does not).
    pub fn is_absolute(&self) -> bool {
        !self.scheme.is_empty()
    }

    /// Explicit port, or the scheme's well-known one.
    pub fn effective_port(&self) -> Option<u16> {
        default_port(Some(&self.scheme), self.port)
    }
}

fn split_host_port(authority: &str) -> (&str, Option<&str>) {
    if authority.starts_with('[') {
        if let Some(end) = authority.find(']') {
            let (host, rest) = authority.split_at(end + 1);
            return (host, rest.strip_prefix(':'));
        }
        return (authority, None);
    }
    match authority.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (authority, None),
    }
}

/// Resolve an absent (or zero) port to the scheme default.
pub fn default_port(scheme: Option<&str>, port: Option<u16>) -> Option<u16> {
    match port {
        Some(port) if port != 0 => Some(port),
        _ => match scheme {
            Some("http") => Some(80),
            Some("https") => Some(443),
            _ => None,
        },
    }
}

/// Resolve `path` against the root: leading slash, dot segments removed,
/// percent-encoding normalized. Query and fragment are discarded.
///
/// Idempotent: `normalize_path(normalize_path(p)) == normalize_path(p)`.
pub fn normalize_path(path: &str) -> String {
    let relative = if path.starts_with("//") {
        format!("/.{path}")
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("./{path}")
    };
    match Url::parse("http://localhost/").and_then(|root| root.join(&relative)) {
        Ok(url) => url.path().to_string(),
        Err(_) => format!("/{}", path.trim_start_matches('/')),
    }
}

/// Percent-decoded form of a normalized path, as regex lookups see it.
/// Sequences that do not decode to UTF-8 leave the path as is.
pub fn decode_path(path: &str) -> Cow<'_, str> {
    urlencoding::decode(path).unwrap_or(Cow::Borrowed(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute() {
        let parts = UrlParts::parse("HTTPS://user:pw@Foo.bar:8443/baz/?ham=spam#frag").unwrap();
        assert_eq!(parts.scheme, "https");
        assert_eq!(parts.host, "Foo.bar");
        assert_eq!(parts.port, Some(8443));
        assert_eq!(parts.path, "/baz/");
        assert_eq!(parts.query, "ham=spam");
        assert!(parts.is_absolute());
    }

    #[test]
    fn test_parse_keeps_empty_path_distinct() {
        assert_eq!(UrlParts::parse("https://foo.bar").unwrap().path, "");
        assert_eq!(UrlParts::parse("https://foo.bar/").unwrap().path, "/");
    }

    #[test]
    fn test_parse_scheme_relative() {
        let parts = UrlParts::parse("//foo.bar:22/baz/").unwrap();
        assert!(!parts.is_absolute());
        assert_eq!(parts.host, "foo.bar");
        assert_eq!(parts.port, Some(22));
        assert_eq!(parts.effective_port(), Some(22));
    }

    #[test]
    fn test_parse_ipv6() {
        let parts = UrlParts::parse("http://[::1]:8080/").unwrap();
        assert_eq!(parts.host, "[::1]");
        assert_eq!(parts.port, Some(8080));
    }

    #[test]
    fn test_parse_relative_path_only() {
        let parts = UrlParts::parse("/foo/").unwrap();
        assert_eq!(parts, UrlParts { path: "/foo/".to_string(), ..Default::default() });
        assert_eq!(UrlParts::parse("").unwrap(), UrlParts::default());
    }

    #[test]
    fn test_parse_bad_port() {
        assert!(matches!(
            UrlParts::parse("https://foo.bar:http/"),
            Err(PatternError::InvalidUrl(_))
        ));
        assert!(UrlParts::parse("https://foo.bar:99999/").is_err());
    }

    #[test]
    fn test_default_port() {
        assert_eq!(default_port(Some("http"), None), Some(80));
        assert_eq!(default_port(Some("https"), None), Some(443));
        assert_eq!(default_port(Some("https"), Some(8080)), Some(8080));
        assert_eq!(default_port(Some("https"), Some(0)), Some(443));
        assert_eq!(default_port(Some("ftp"), None), None);
        assert_eq!(default_port(None, None), None);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("foo"), "/foo");
        assert_eq!(normalize_path("/foo"), "/foo");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/a/b/../c/"), "/a/c/");
        assert_eq!(normalize_path("a:b"), "/a:b");
        assert_eq!(normalize_path("/foo?x=1"), "/foo");
        assert_eq!(normalize_path("/a b"), "/a%20b");
    }

    #[test]
    fn test_normalize_path_idempotent() {
        for path in ["foo", "/foo/", "/a b/../c", "//double", "a:b", "%2F"] {
            let once = normalize_path(path);
            assert_eq!(normalize_path(&once), once, "input {path:?}");
        }
    }

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/caf%C3%A9/a%20b"), "/café/a b");
        assert_eq!(decode_path("/plain"), "/plain");
        assert_eq!(decode_path("/bad%FF"), "/bad%FF");
    }
}
