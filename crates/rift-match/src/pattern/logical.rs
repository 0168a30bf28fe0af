//! Logical combinators for composing patterns into trees.
//!
//! `And`/`Or` hold exactly two children and `Not` one. Composition always
//! produces a new node; operands are shared, never mutated.

use super::field::FieldPattern;
use super::result::MatchResult;
use crate::error::PatternError;
use crate::request::RequestView;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

/// A pattern tree whose leaves are [`FieldPattern`]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// A leaf field predicate
    Field(FieldPattern),

    /// Matches if both sides match; captures merge, right side wins
    And(Arc<Pattern>, Arc<Pattern>),

    /// First matching side, verbatim
    Or(Arc<Pattern>, Arc<Pattern>),

    /// Inverted verdict, never carries captures
    Not(Arc<Pattern>),
}

impl Pattern {
    pub fn and(self, other: impl Into<Pattern>) -> Pattern {
        Pattern::And(Arc::new(self), Arc::new(other.into()))
    }

    pub fn or(self, other: impl Into<Pattern>) -> Pattern {
        Pattern::Or(Arc::new(self), Arc::new(other.into()))
    }

    pub fn negate(self) -> Pattern {
        Pattern::Not(Arc::new(self))
    }

    /// Evaluate the tree against a request.
    ///
    /// `And` does not evaluate its right side when the left side fails, and
    /// `Or` does not evaluate its right side when the left side matches.
    pub fn matches<R: RequestView + ?Sized>(&self, request: &R) -> MatchResult {
        match self {
            Pattern::Field(field) => field.matches(request),
            Pattern::And(left, right) => {
                let left = left.matches(request);
                if !left.is_match() {
                    return MatchResult::no_match();
                }
                left.merge(right.matches(request))
            }
            Pattern::Or(left, right) => {
                let left = left.matches(request);
                if left.is_match() {
                    left
                } else {
                    right.matches(request)
                }
            }
            Pattern::Not(inner) => !inner.matches(request),
        }
    }

    /// Number of leaf patterns in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Pattern::Field(_) => 1,
            Pattern::And(left, right) | Pattern::Or(left, right) => {
                left.leaf_count() + right.leaf_count()
            }
            Pattern::Not(inner) => inner.leaf_count(),
        }
    }

    fn fmt_child(&self, parent: &Pattern, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nested = matches!(
            (parent, self),
            (Pattern::And(..), Pattern::Or(..))
                | (Pattern::Or(..), Pattern::And(..))
                | (Pattern::Not(..), Pattern::And(..) | Pattern::Or(..))
        );
        if nested {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Field(field) => write!(f, "{field}"),
            Pattern::And(left, right) => {
                left.fmt_child(self, f)?;
                f.write_str(" AND ")?;
                right.fmt_child(self, f)
            }
            Pattern::Or(left, right) => {
                left.fmt_child(self, f)?;
                f.write_str(" OR ")?;
                right.fmt_child(self, f)
            }
            Pattern::Not(inner) => {
                f.write_str("NOT ")?;
                inner.fmt_child(self, f)
            }
        }
    }
}

impl From<FieldPattern> for Pattern {
    fn from(field: FieldPattern) -> Self {
        Pattern::Field(field)
    }
}

impl From<&FieldPattern> for Pattern {
    fn from(field: &FieldPattern) -> Self {
        Pattern::Field(field.clone())
    }
}

impl From<&Pattern> for Pattern {
    fn from(pattern: &Pattern) -> Self {
        pattern.clone()
    }
}

impl<P: Into<Pattern>> BitAnd<P> for Pattern {
    type Output = Pattern;

    fn bitand(self, rhs: P) -> Pattern {
        self.and(rhs)
    }
}

impl<P: Into<Pattern>> BitOr<P> for Pattern {
    type Output = Pattern;

    fn bitor(self, rhs: P) -> Pattern {
        self.or(rhs)
    }
}

impl Not for Pattern {
    type Output = Pattern;

    fn not(self) -> Pattern {
        self.negate()
    }
}

impl<P: Into<Pattern>> BitAnd<P> for &Pattern {
    type Output = Pattern;

    fn bitand(self, rhs: P) -> Pattern {
        self.clone().and(rhs)
    }
}

impl<P: Into<Pattern>> BitOr<P> for &Pattern {
    type Output = Pattern;

    fn bitor(self, rhs: P) -> Pattern {
        self.clone().or(rhs)
    }
}

impl Not for &Pattern {
    type Output = Pattern;

    fn not(self) -> Pattern {
        self.clone().negate()
    }
}

impl<P: Into<Pattern>> BitAnd<P> for FieldPattern {
    type Output = Pattern;

    fn bitand(self, rhs: P) -> Pattern {
        Pattern::from(self).and(rhs)
    }
}

impl<P: Into<Pattern>> BitOr<P> for FieldPattern {
    type Output = Pattern;

    fn bitor(self, rhs: P) -> Pattern {
        Pattern::from(self).or(rhs)
    }
}

impl Not for FieldPattern {
    type Output = Pattern;

    fn not(self) -> Pattern {
        Pattern::from(self).negate()
    }
}

/// Binary operator used by [`combine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    #[default]
    And,
    Or,
}

impl Operator {
    pub fn apply(&self, left: Pattern, right: Pattern) -> Pattern {
        match self {
            Operator::And => left.and(right),
            Operator::Or => left.or(right),
        }
    }
}

/// Left-fold `patterns` with `op`: `((p0 op p1) op p2) ...`.
///
/// Fails with [`PatternError::EmptyReduction`] on an empty sequence.
pub fn combine<I>(patterns: I, op: Operator) -> Result<Pattern, PatternError>
where
    I: IntoIterator,
    I::Item: Into<Pattern>,
{
    let mut patterns = patterns.into_iter().map(Into::into);
    let first = patterns.next().ok_or(PatternError::EmptyReduction)?;
    Ok(patterns.fold(first, |acc, pattern| op.apply(acc, pattern)))
}
