//! Pattern declarations loaded from YAML or JSON files.
//!
//! ```yaml
//! patterns:
//!   - name: item-detail
//!     match:
//!       method: GET
//!       path__regex: '^/items/(?P<id>\d+)/$'
//!       params: { color: red }
//! ```
//!
//! Each `match` block is an ordered set of builder criteria, so the same
//! `field` / `field__lookup` keys apply.

mod value;

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::PatternBuilder;
use crate::pattern::{MatchResult, Pattern};
use crate::request::RequestView;

pub use value::criterion_value;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PatternFile {
    #[serde(default)]
    pub patterns: Vec<PatternEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PatternEntry {
    pub name: String,
    /// Criteria in declaration order
    #[serde(rename = "match", default)]
    pub criteria: serde_yaml::Mapping,
}

/// A compiled entry. `pattern` is `None` when the entry constrains nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedPattern {
    pub name: String,
    pub pattern: Option<Pattern>,
}

impl NamedPattern {
    pub fn matches<R: RequestView + ?Sized>(&self, request: &R) -> MatchResult {
        match &self.pattern {
            Some(pattern) => pattern.matches(request),
            None => MatchResult::new(true),
        }
    }
}

impl PatternFile {
    /// Load and validate a pattern file; `.json` files are parsed as JSON,
    /// anything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pattern file {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let file = if is_json {
            Self::from_json_str(&contents)?
        } else {
            Self::from_yaml_str(&contents)?
        };
        debug!(
            "Loaded {} pattern(s) from {}",
            file.patterns.len(),
            path.display()
        );
        Ok(file)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, anyhow::Error> {
        let file: PatternFile = serde_yaml::from_str(contents)?;
        file.validate()?;
        Ok(file)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, anyhow::Error> {
        let file: PatternFile = serde_json::from_str(contents)?;
        file.validate()?;
        Ok(file)
    }

    /// Names must be non-empty and unique, and every entry must build.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let mut seen = HashSet::new();
        for entry in &self.patterns {
            if entry.name.trim().is_empty() {
                anyhow::bail!("Pattern names must not be empty");
            }
            if !seen.insert(entry.name.as_str()) {
                anyhow::bail!("Duplicate pattern name: '{}'", entry.name);
            }
            entry.build()?;
        }
        Ok(())
    }

    pub fn compile(&self) -> Result<Vec<NamedPattern>, anyhow::Error> {
        self.patterns
            .iter()
            .map(|entry| {
                Ok(NamedPattern {
                    name: entry.name.clone(),
                    pattern: entry.build()?,
                })
            })
            .collect()
    }
}

impl PatternEntry {
    pub fn build(&self) -> Result<Option<Pattern>, anyhow::Error> {
        let mut builder = PatternBuilder::new();
        for (key, value) in &self.criteria {
            let key = key
                .as_str()
                .with_context(|| format!("Pattern '{}': criterion keys must be strings", self.name))?;
            let value = criterion_value(value)
                .with_context(|| format!("Pattern '{}': invalid value for '{}'", self.name, key))?;
            if let Some(value) = value {
                builder = builder.criterion(key, value);
            }
        }
        builder
            .build()
            .with_context(|| format!("Pattern '{}' is invalid", self.name))
    }
}

/// First entry matching `request`, with its result. Entries are tried in
/// order; an unconstrained entry matches everything.
pub fn first_match<'a, R: RequestView + ?Sized>(
    patterns: &'a [NamedPattern],
    request: &R,
) -> Option<(&'a NamedPattern, MatchResult)> {
    patterns.iter().find_map(|named| {
        let result = named.matches(request);
        if result.is_match() {
            debug!("Request {} {} matched pattern '{}'", request.method(), request.url(), named.name);
            Some((named, result))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::FieldPattern;
    use crate::request::RequestParts;
    use std::io::Write;

    const YAML: &str = r#"
patterns:
  - name: item-detail
    match:
      method: GET
      path__regex: '^/items/(?P<id>\d+)/$'
      params: { color: red }
  - name: api
    match:
      base_url: https://foo.bar/api
  - name: fallback
    match: {}
"#;

    #[test]
    fn test_yaml_compiles_in_order() {
        let file = PatternFile::from_yaml_str(YAML).unwrap();
        let compiled = file.compile().unwrap();
        let names: Vec<_> = compiled.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["item-detail", "api", "fallback"]);
        assert!(compiled[2].pattern.is_none());

        let api = compiled[1].pattern.clone().unwrap();
        assert_eq!(
            api,
            Pattern::from(FieldPattern::base_url("https://foo.bar/api").unwrap())
        );
    }

    #[test]
    fn test_first_match() {
        let compiled = PatternFile::from_yaml_str(YAML).unwrap().compile().unwrap();

        let request = RequestParts::new("GET", "https://foo.bar/items/42/?color=red").unwrap();
        let (named, result) = first_match(&compiled, &request).unwrap();
        assert_eq!(named.name, "item-detail");
        assert_eq!(result.get("id"), Some("42"));

        let request = RequestParts::new("POST", "https://foo.bar/api/users").unwrap();
        assert_eq!(first_match(&compiled, &request).unwrap().0.name, "api");

        let request = RequestParts::new("GET", "https://ham.spam/").unwrap();
        assert_eq!(first_match(&compiled, &request).unwrap().0.name, "fallback");
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let yaml = "patterns:\n  - name: a\n    match: {method: GET}\n  - name: a\n    match: {method: PUT}\n";
        let err = PatternFile::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("Duplicate pattern name"));
    }

    #[test]
    fn test_validate_reports_bad_criteria() {
        let yaml = "patterns:\n  - name: broken\n    match: {scheme__regex: http}\n";
        let err = PatternFile::from_yaml_str(yaml).unwrap_err();
        assert!(format!("{err:#}").contains("regex is not a valid Lookup for Scheme"));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"patterns": [{{"name": "ping", "match": {{"method": "get", "path": "ping", "port": 8080}}}}]}}"#
        )
        .unwrap();

        let compiled = PatternFile::from_file(file.path()).unwrap().compile().unwrap();
        let expected = (FieldPattern::method("GET")
            & FieldPattern::path("/ping", crate::pattern::Lookup::Equal).unwrap())
            & FieldPattern::port(Some(8080));
        assert_eq!(compiled[0].pattern, Some(expected));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();
        let loaded = PatternFile::from_file(file.path()).unwrap();
        assert_eq!(loaded.patterns.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = PatternFile::from_file("/nonexistent/patterns.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read pattern file"));
    }
}
