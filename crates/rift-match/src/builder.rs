//! Flat criteria to pattern tree.
//!
//! A criterion is `field` or `field__lookup` mapped to a value, e.g.
//! `method = "GET"` or `path__regex = r"^/items/(?P<id>\d+)$"`. The builder
//! validates names, constructs the field patterns and AND-folds everything
//! in declaration order: positional patterns first, then criteria.

use crate::error::PatternError;
use crate::pattern::{combine, FieldKind, FieldPattern, Lookup, Operator, Pattern, Value};
use tracing::{debug, trace};

/// Separator between field name and lookup in a criterion key.
pub const LOOKUP_SEPARATOR: &str = "__";

/// Builds a single AND-combined pattern from patterns and criteria.
#[derive(Debug, Clone, Default)]
pub struct PatternBuilder {
    patterns: Vec<Pattern>,
    criteria: Vec<(String, Value)>,
}

impl PatternBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(mut self, pattern: impl Into<Pattern>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Add a pattern if present; `None` is ignored.
    pub fn maybe_pattern<P: Into<Pattern>>(mut self, pattern: Option<P>) -> Self {
        if let Some(pattern) = pattern {
            self.patterns.push(pattern.into());
        }
        self
    }

    /// Add a `field` or `field__lookup` criterion.
    ///
    /// Names are validated by [`build`](Self::build). Empty values (empty
    /// text, zero, no pairs) are skipped there without validation.
    pub fn criterion(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.criteria.push((key.into(), value.into()));
        self
    }

    pub fn criteria<K, V>(mut self, criteria: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.criteria
            .extend(criteria.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Combine everything into one tree.
    ///
    /// Returns `Ok(None)` when nothing was constrained; callers decide what
    /// an unconstrained rule means.
    pub fn build(self) -> Result<Option<Pattern>, PatternError> {
        let mut pattern = if self.patterns.is_empty() {
            None
        } else {
            Some(combine(self.patterns, Operator::And)?)
        };

        let mut folded = 0usize;
        for (key, value) in self.criteria {
            if value.is_empty() {
                trace!(criterion = %key, "skipping empty criterion");
                continue;
            }
            let field = parse_criterion(&key, value)?;
            pattern = Some(match pattern {
                Some(acc) => acc & field,
                None => field.into(),
            });
            folded += 1;
        }

        debug!(criteria = folded, "built request pattern");
        Ok(pattern)
    }
}

/// Build from optional positional patterns and criteria in one call.
pub fn build<K, V>(
    patterns: impl IntoIterator<Item = Option<Pattern>>,
    criteria: impl IntoIterator<Item = (K, V)>,
) -> Result<Option<Pattern>, PatternError>
where
    K: Into<String>,
    V: Into<Value>,
{
    patterns
        .into_iter()
        .fold(PatternBuilder::new(), PatternBuilder::maybe_pattern)
        .criteria(criteria)
        .build()
}

/// Split a criterion key and construct its field pattern.
pub fn parse_criterion(key: &str, value: Value) -> Result<FieldPattern, PatternError> {
    let (name, lookup) = key.split_once(LOOKUP_SEPARATOR).unwrap_or((key, ""));
    let kind: FieldKind = name.parse()?;
    let lookup = if lookup.is_empty() {
        Lookup::Equal
    } else {
        lookup.parse()?
    };
    FieldPattern::new(kind, lookup, value)
}
