//! Input values accepted by pattern constructors and builder criteria.

use regex::Regex;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Loosely-typed value handed to a constructor or builder criterion.
///
/// Each field kind cleans the variants it understands and rejects the rest.
#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Number(i64),
    /// A regex compiled by the caller, usable with the `regex` lookup.
    Regex(Regex),
    /// Query pairs, in declaration order.
    Pairs(Vec<(String, String)>),
}

impl Value {
    /// Falsy values stand for "not specified" and are skipped by the builder.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Text(s) => s.is_empty(),
            Value::Number(n) => *n == 0,
            Value::Regex(_) => false,
            Value::Pairs(pairs) => pairs.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Regex(r) => write!(f, "re({:?})", r.as_str()),
            Value::Pairs(pairs) => write!(f, "{pairs:?}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(i64::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Number(i64::from(value))
    }
}

impl From<Regex> for Value {
    fn from(value: Regex) -> Self {
        Value::Regex(value)
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for Value {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Value::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Value {
    fn from(pairs: [(K, V); N]) -> Self {
        Value::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<QueryParams> for Value {
    fn from(params: QueryParams) -> Self {
        Value::Pairs(params.pairs)
    }
}

/// Ordered multi-map of decoded query pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse a raw query string, decoding `+` and percent escapes.
    ///
    /// Duplicate keys are kept in order; a key without `=` gets an empty value.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (decode_component(key), decode_component(value)),
                None => (decode_component(pair), String::new()),
            })
            .collect();
        Self { pairs }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// True if every pair of `self` appears in `other`.
    ///
    /// Pairs are consumed as they match, in declaration order, so a key
    /// declared twice needs two occurrences in `other`.
    pub fn contained_in(&self, other: &QueryParams) -> bool {
        let mut remaining: Vec<&(String, String)> = other.pairs.iter().collect();
        for pair in &self.pairs {
            match remaining.iter().position(|candidate| *candidate == pair) {
                Some(index) => {
                    remaining.remove(index);
                }
                None => return false,
            }
        }
        true
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(
                f,
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )?;
        }
        Ok(())
    }
}

fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    match urlencoding::decode(&raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw,
    }
}

/// Compiled regex compared and hashed by its source pattern.
#[derive(Debug, Clone)]
pub struct CompiledRegex(Arc<Regex>);

impl CompiledRegex {
    pub fn new(regex: Regex) -> Self {
        Self(Arc::new(regex))
    }
}

impl Deref for CompiledRegex {
    type Target = Regex;

    fn deref(&self) -> &Regex {
        &self.0
    }
}

impl PartialEq for CompiledRegex {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

impl Eq for CompiledRegex {}

impl Hash for CompiledRegex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_str().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falsy_values() {
        assert!(Value::from("").is_empty());
        assert!(Value::from(0).is_empty());
        assert!(Value::from(Vec::<(String, String)>::new()).is_empty());
        assert!(!Value::from("GET").is_empty());
        assert!(!Value::from(443u16).is_empty());
        assert!(!Value::from(Regex::new("").unwrap()).is_empty());
    }

    #[test]
    fn test_parse_query_keeps_duplicates_in_order() {
        let params = QueryParams::parse("?a=1&b=2&a=3");
        assert_eq!(
            params.pairs(),
            &[
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_query_decodes() {
        let params = QueryParams::parse("q=hello+world&name=J%C3%BCrgen&flag");
        assert_eq!(
            params,
            QueryParams::from_pairs([("q", "hello world"), ("name", "Jürgen"), ("flag", "")])
        );
        assert!(QueryParams::parse("").is_empty());
    }

    #[test]
    fn test_containment_is_partial() {
        let pattern = QueryParams::from_pairs([("a", "1")]);
        assert!(pattern.contained_in(&QueryParams::parse("a=1&b=2")));
        assert!(!pattern.contained_in(&QueryParams::parse("b=2")));
        assert!(!pattern.contained_in(&QueryParams::parse("a=2")));
        assert!(QueryParams::default().contained_in(&QueryParams::parse("x=1")));
    }

    #[test]
    fn test_containment_consumes_duplicates() {
        let twice = QueryParams::from_pairs([("a", "1"), ("a", "1")]);
        assert!(!twice.contained_in(&QueryParams::parse("a=1")));
        assert!(twice.contained_in(&QueryParams::parse("a=1&b=0&a=1")));
    }

    #[test]
    fn test_display_encodes() {
        let params = QueryParams::from_pairs([("q", "a b"), ("x", "1")]);
        assert_eq!(params.to_string(), "q=a%20b&x=1");
    }

    #[test]
    fn test_compiled_regex_identity() {
        let a = CompiledRegex::new(Regex::new(r"^/\d+").unwrap());
        let b = CompiledRegex::new(Regex::new(r"^/\d+").unwrap());
        let c = CompiledRegex::new(Regex::new(r"^/\w+").unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.is_match("/42"));
    }
}
