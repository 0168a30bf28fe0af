//! Leaf patterns bound to one request field.
//!
//! Values are cleaned once, at construction: methods are uppercased,
//! schemes and hosts lowercased, paths resolved against the root, regexes
//! compiled, query strings parsed and URLs decomposed into component
//! patterns. Evaluation only reads.

use super::logical::{combine, Operator, Pattern};
use super::lookup::{FieldKind, Lookup};
use super::result::{Captures, MatchResult};
use super::value::{CompiledRegex, QueryParams, Value};
use crate::error::PatternError;
use crate::request::RequestView;
use crate::uri::{decode_path, default_port, normalize_path, UrlParts};
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Cleaned comparison value stored in a [`FieldPattern`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CleanedValue {
    Text(String),
    Regex(CompiledRegex),
    Port(Option<u16>),
    Params(QueryParams),
    /// Component patterns of a decomposed URL or base URL
    Pattern(Arc<Pattern>),
}

impl fmt::Display for CleanedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanedValue::Text(s) => write!(f, "{s:?}"),
            CleanedValue::Regex(r) => write!(f, "re({:?})", r.as_str()),
            CleanedValue::Port(Some(port)) => write!(f, "{port}"),
            CleanedValue::Port(None) => f.write_str("None"),
            CleanedValue::Params(params) => write!(f, "{:?}", params.to_string()),
            CleanedValue::Pattern(pattern) => write!(f, "({pattern})"),
        }
    }
}

/// Immutable predicate on a single request field.
///
/// Two field patterns are equal iff kind, lookup and cleaned value are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPattern {
    kind: FieldKind,
    lookup: Lookup,
    value: CleanedValue,
}

impl FieldPattern {
    /// Construct a pattern of any kind, validating the lookup and cleaning
    /// the value.
    pub fn new(
        kind: FieldKind,
        lookup: Lookup,
        value: impl Into<Value>,
    ) -> Result<Self, PatternError> {
        kind.check(lookup)?;
        let value = clean(kind, lookup, value.into())?;
        Ok(Self {
            kind,
            lookup,
            value,
        })
    }

    pub fn method(method: impl AsRef<str>) -> Self {
        Self::equal(
            FieldKind::Method,
            CleanedValue::Text(method.as_ref().to_uppercase()),
        )
    }

    pub fn scheme(scheme: impl AsRef<str>) -> Self {
        Self::equal(
            FieldKind::Scheme,
            CleanedValue::Text(scheme.as_ref().to_lowercase()),
        )
    }

    pub fn host(host: impl AsRef<str>) -> Self {
        Self::equal(
            FieldKind::Host,
            CleanedValue::Text(host.as_ref().to_lowercase()),
        )
    }

    /// `None` matches only requests whose port cannot be resolved.
    pub fn port(port: Option<u16>) -> Self {
        Self::equal(FieldKind::Port, CleanedValue::Port(port))
    }

    pub fn path(path: impl Into<Value>, lookup: Lookup) -> Result<Self, PatternError> {
        Self::new(FieldKind::Path, lookup, path)
    }

    /// Query pairs, given as a raw query string or as pairs.
    pub fn params(params: impl Into<Value>) -> Result<Self, PatternError> {
        Self::new(FieldKind::Params, Lookup::Equal, params)
    }

    pub fn url(url: impl Into<Value>, lookup: Lookup) -> Result<Self, PatternError> {
        Self::new(FieldKind::Url, lookup, url)
    }

    pub fn base_url(base_url: impl Into<Value>) -> Result<Self, PatternError> {
        Self::new(FieldKind::BaseUrl, Lookup::Equal, base_url)
    }

    fn equal(kind: FieldKind, value: CleanedValue) -> Self {
        Self {
            kind,
            lookup: Lookup::Equal,
            value,
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn lookup(&self) -> Lookup {
        self.lookup
    }

    pub fn value(&self) -> &CleanedValue {
        &self.value
    }

    /// Evaluate against a request.
    pub fn matches<R: RequestView + ?Sized>(&self, request: &R) -> MatchResult {
        let result = match (&self.value, self.kind) {
            (CleanedValue::Pattern(components), _) => components.matches(request),
            (_, FieldKind::Method) => self.compare(request.method()),
            (_, FieldKind::Scheme) => self.compare(&request.scheme().to_ascii_lowercase()),
            (_, FieldKind::Host) => self.compare(&request.host().to_lowercase()),
            (_, FieldKind::Port) => self.compare_port(request),
            (_, FieldKind::Path) => self.compare_path(&request.path()),
            (_, FieldKind::Params) => self.compare_params(request.query()),
            (_, FieldKind::Url | FieldKind::BaseUrl) => self.compare(&request.url()),
        };
        trace!(pattern = %self, matched = result.is_match(), "field pattern evaluated");
        result
    }

    fn compare(&self, value: &str) -> MatchResult {
        match (self.lookup, &self.value) {
            (Lookup::Equal | Lookup::Exact, CleanedValue::Text(expected)) => {
                MatchResult::new(value == expected)
            }
            (Lookup::StartsWith, CleanedValue::Text(prefix)) => {
                MatchResult::new(value.starts_with(prefix.as_str()))
            }
            (Lookup::Regex, CleanedValue::Regex(regex)) => search(regex, value),
            _ => MatchResult::no_match(),
        }
    }

    fn compare_port<R: RequestView + ?Sized>(&self, request: &R) -> MatchResult {
        let scheme = request.scheme().to_ascii_lowercase();
        let actual = default_port(Some(scheme.as_str()), request.port());
        MatchResult::new(matches!(&self.value, CleanedValue::Port(expected) if *expected == actual))
    }

    /// Regexes see the decoded path; other lookups compare normalized forms.
    fn compare_path(&self, path: &str) -> MatchResult {
        match self.lookup {
            Lookup::Regex => self.compare(&decode_path(path)),
            _ => self.compare(path),
        }
    }

    fn compare_params(&self, query: &str) -> MatchResult {
        match &self.value {
            CleanedValue::Params(expected) => {
                MatchResult::new(expected.contained_in(&QueryParams::parse(query)))
            }
            _ => MatchResult::no_match(),
        }
    }
}

impl fmt::Display for FieldPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lookup {
            Lookup::Equal => write!(f, "<{} {}>", self.kind, self.value),
            lookup => write!(f, "<{} {} {}>", self.kind, lookup, self.value),
        }
    }
}

/// Regex search; named groups that took part in the match become captures.
fn search(regex: &Regex, value: &str) -> MatchResult {
    let Some(caps) = regex.captures(value) else {
        return MatchResult::no_match();
    };
    let captures: Captures = regex
        .capture_names()
        .flatten()
        .filter_map(|name| caps.name(name).map(|m| (name.to_string(), m.as_str().to_string())))
        .collect();
    MatchResult::with_captures(true, captures)
}

fn compile_regex(pattern: &str) -> Result<CompiledRegex, PatternError> {
    Regex::new(pattern)
        .map(CompiledRegex::new)
        .map_err(|source| PatternError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })
}

fn clean(kind: FieldKind, lookup: Lookup, value: Value) -> Result<CleanedValue, PatternError> {
    let invalid = |value: &Value| PatternError::InvalidValue {
        kind,
        value: value.to_string(),
    };

    match (kind, value) {
        (FieldKind::Method, Value::Text(s)) => Ok(CleanedValue::Text(s.to_uppercase())),
        (FieldKind::Scheme | FieldKind::Host, Value::Text(s)) => {
            Ok(CleanedValue::Text(s.to_lowercase()))
        }

        (FieldKind::Port, Value::Number(n)) => u16::try_from(n)
            .map(|port| CleanedValue::Port(Some(port)))
            .map_err(|_| invalid(&Value::Number(n))),
        (FieldKind::Port, Value::Text(s)) => match s.trim().parse::<u16>() {
            Ok(port) => Ok(CleanedValue::Port(Some(port))),
            Err(_) => Err(invalid(&Value::Text(s))),
        },

        (FieldKind::Path, value) => match (lookup, value) {
            (Lookup::Regex, Value::Text(s)) => compile_regex(&s).map(CleanedValue::Regex),
            (Lookup::Regex, Value::Regex(r)) => Ok(CleanedValue::Regex(CompiledRegex::new(r))),
            (_, Value::Text(s)) => Ok(CleanedValue::Text(normalize_path(&s))),
            (_, other) => Err(invalid(&other)),
        },

        (FieldKind::Params, Value::Text(s)) => Ok(CleanedValue::Params(QueryParams::parse(&s))),
        (FieldKind::Params, Value::Pairs(pairs)) => {
            Ok(CleanedValue::Params(QueryParams::from_pairs(pairs)))
        }

        (FieldKind::Url, value) => match (lookup, value) {
            (Lookup::Equal, Value::Text(s)) => url_components(&s),
            (Lookup::Regex, Value::Text(s)) => compile_regex(&s).map(CleanedValue::Regex),
            (Lookup::Regex, Value::Regex(r)) => Ok(CleanedValue::Regex(CompiledRegex::new(r))),
            (Lookup::Exact | Lookup::StartsWith, Value::Text(s)) => Ok(CleanedValue::Text(s)),
            (_, other) => Err(invalid(&other)),
        },

        (FieldKind::BaseUrl, Value::Text(s)) => base_url_components(&s),
        (FieldKind::BaseUrl, other) => Err(PatternError::InvalidBaseUrl(other.to_string())),

        (_, other) => Err(invalid(&other)),
    }
}

/// Scheme, host and resolved port of `parts`, each only when present.
fn origin_patterns(parts: &UrlParts) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    if !parts.scheme.is_empty() {
        patterns.push(FieldPattern::scheme(&parts.scheme).into());
    }
    if !parts.host.is_empty() {
        patterns.push(FieldPattern::host(&parts.host).into());
    }
    if let Some(port) = parts.effective_port() {
        patterns.push(FieldPattern::port(Some(port)).into());
    }
    patterns
}

fn url_components(url: &str) -> Result<CleanedValue, PatternError> {
    let parts = UrlParts::parse(url)?;
    let mut patterns = origin_patterns(&parts);
    if !parts.path.is_empty() {
        patterns.push(
            FieldPattern::equal(FieldKind::Path, CleanedValue::Text(normalize_path(&parts.path)))
                .into(),
        );
    }
    if !parts.query.is_empty() {
        patterns.push(
            FieldPattern::equal(
                FieldKind::Params,
                CleanedValue::Params(QueryParams::parse(&parts.query)),
            )
            .into(),
        );
    }
    if patterns.is_empty() {
        return Err(PatternError::InvalidUrl(url.to_string()));
    }
    let pattern = combine(patterns, Operator::And)?;
    Ok(CleanedValue::Pattern(Arc::new(pattern)))
}

fn base_url_components(base_url: &str) -> Result<CleanedValue, PatternError> {
    let parts = UrlParts::parse(base_url)
        .map_err(|_| PatternError::InvalidBaseUrl(base_url.to_string()))?;
    if !parts.is_absolute() {
        return Err(PatternError::InvalidBaseUrl(base_url.to_string()));
    }
    let mut patterns = origin_patterns(&parts);
    let path = normalize_path(&parts.path);
    if path.len() > 1 {
        patterns.push(
            FieldPattern {
                kind: FieldKind::Path,
                lookup: Lookup::StartsWith,
                value: CleanedValue::Text(path),
            }
            .into(),
        );
    }
    let pattern = combine(patterns, Operator::And)?;
    Ok(CleanedValue::Pattern(Arc::new(pattern)))
}
