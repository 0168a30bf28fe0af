//! Lookup operators and the request fields they apply to.

use crate::error::PatternError;
use std::fmt;
use std::str::FromStr;

/// Comparison a field pattern applies to its extracted request value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lookup {
    /// Structural equality (the default)
    #[default]
    Equal,

    /// Equality on the raw value; for URLs, the full URL string
    Exact,

    /// Regex search, named groups become captures
    Regex,

    /// String prefix test
    StartsWith,
}

impl Lookup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lookup::Equal => "eq",
            Lookup::Exact => "exact",
            Lookup::Regex => "regex",
            Lookup::StartsWith => "startswith",
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lookup {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Lookup::Equal),
            "exact" => Ok(Lookup::Exact),
            "regex" => Ok(Lookup::Regex),
            "startswith" => Ok(Lookup::StartsWith),
            other => Err(PatternError::UnknownLookup(other.to_string())),
        }
    }
}

/// Request field a leaf pattern is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Method,
    Scheme,
    Host,
    Port,
    Path,
    Params,
    Url,
    BaseUrl,
}

impl FieldKind {
    /// All kinds, in criterion-table order.
    pub const ALL: [FieldKind; 8] = [
        FieldKind::Method,
        FieldKind::Scheme,
        FieldKind::Host,
        FieldKind::Port,
        FieldKind::Path,
        FieldKind::Params,
        FieldKind::Url,
        FieldKind::BaseUrl,
    ];

    /// Lookups a pattern of this kind may be constructed with.
    pub fn supported_lookups(&self) -> &'static [Lookup] {
        match self {
            FieldKind::Path => &[Lookup::Equal, Lookup::Regex, Lookup::StartsWith],
            FieldKind::Url => &[
                Lookup::Equal,
                Lookup::Exact,
                Lookup::Regex,
                Lookup::StartsWith,
            ],
            FieldKind::Method
            | FieldKind::Scheme
            | FieldKind::Host
            | FieldKind::Port
            | FieldKind::Params
            | FieldKind::BaseUrl => &[Lookup::Equal],
        }
    }

    pub fn supports(&self, lookup: Lookup) -> bool {
        self.supported_lookups().contains(&lookup)
    }

    /// Fail unless `lookup` is supported by this kind.
    pub fn check(&self, lookup: Lookup) -> Result<(), PatternError> {
        if self.supports(lookup) {
            Ok(())
        } else {
            Err(PatternError::UnsupportedLookup { kind: *self, lookup })
        }
    }

    /// Name used in builder criteria (`base_url`, `path`, ...).
    pub fn criterion_name(&self) -> &'static str {
        match self {
            FieldKind::Method => "method",
            FieldKind::Scheme => "scheme",
            FieldKind::Host => "host",
            FieldKind::Port => "port",
            FieldKind::Path => "path",
            FieldKind::Params => "params",
            FieldKind::Url => "url",
            FieldKind::BaseUrl => "base_url",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Method => "Method",
            FieldKind::Scheme => "Scheme",
            FieldKind::Host => "Host",
            FieldKind::Port => "Port",
            FieldKind::Path => "Path",
            FieldKind::Params => "Params",
            FieldKind::Url => "URL",
            FieldKind::BaseUrl => "BaseURL",
        };
        f.write_str(name)
    }
}

impl FromStr for FieldKind {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::ALL
            .into_iter()
            .find(|kind| kind.criterion_name() == s)
            .ok_or_else(|| PatternError::UnknownField(s.to_string()))
    }
}
