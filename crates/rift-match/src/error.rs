//! Errors raised while building request patterns.
//!
//! Every error surfaces at the constructor, builder or `combine` call that
//! caused it. Evaluating a built pattern never fails.

use crate::pattern::{FieldKind, Lookup};

/// Error raised while constructing or combining patterns.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// The lookup exists but the field does not support it.
    #[error("{lookup} is not a valid Lookup for {kind}")]
    UnsupportedLookup { kind: FieldKind, lookup: Lookup },

    /// A builder criterion named a field that does not exist.
    #[error("{0:?} is not a valid Pattern")]
    UnknownField(String),

    /// A builder criterion carried an unrecognized lookup suffix.
    #[error("{0:?} is not a valid Lookup")]
    UnknownLookup(String),

    /// The URL is unparseable or constrains no component at all.
    #[error("Invalid url: {0:?}")]
    InvalidUrl(String),

    /// Base URLs must be absolute strings.
    #[error("Invalid base url: {0:?}")]
    InvalidBaseUrl(String),

    #[error("Invalid regex {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The value has the wrong shape for the field (e.g. text for a port).
    #[error("Invalid {kind} value: {value}")]
    InvalidValue { kind: FieldKind, value: String },

    /// `combine` was handed nothing to reduce.
    #[error("Cannot combine an empty sequence of patterns")]
    EmptyReduction,
}
