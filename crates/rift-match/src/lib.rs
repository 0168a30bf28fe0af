//! Composable request patterns for HTTP mocking.
//!
//! Declare rules against an outgoing request's method, scheme, host, port,
//! path, query and URL, compose them with `&`, `|` and `!`, and evaluate the
//! tree to get a verdict plus any named regex captures.
//!
//! ```
//! use rift_match::{FieldPattern, PatternBuilder, RequestParts};
//!
//! let pattern = PatternBuilder::new()
//!     .criterion("method", "GET")
//!     .criterion("path__regex", r"/items/(?P<id>\d+)/")
//!     .build()
//!     .unwrap()
//!     .unwrap()
//!     & FieldPattern::params([("color", "red")]).unwrap();
//!
//! let request = RequestParts::new("GET", "https://foo.bar/items/42/?color=red").unwrap();
//! let result = pattern.matches(&request);
//! assert!(result.is_match());
//! assert_eq!(result.get("id"), Some("42"));
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod pattern;
pub mod request;
pub mod uri;

pub use builder::{build, PatternBuilder};
pub use config::{first_match, NamedPattern, PatternFile};
pub use error::PatternError;
pub use pattern::{
    combine, Captures, CleanedValue, FieldKind, FieldPattern, Lookup, MatchResult, Operator,
    Pattern, QueryParams, Value,
};
pub use request::{RequestParts, RequestView};
