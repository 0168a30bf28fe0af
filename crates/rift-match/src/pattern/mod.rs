//! Request pattern engine.
//!
//! Patterns are immutable predicate trees evaluated against a
//! [`RequestView`](crate::request::RequestView). Leaves bind one request
//! field to a lookup and a value cleaned at construction; combinators
//! compose them with AND, OR and NOT.
//!
//! # Module Structure
//!
//! - `lookup` - Lookup operators and field kinds
//! - `value` - Constructor inputs, query multi-maps, hashable regexes
//! - `field` - Leaf field patterns (cleaning and evaluation)
//! - `logical` - AND/OR/NOT combinators and `combine`
//! - `result` - Match verdict and named captures
//!
//! Evaluation is pure, so a tree can be shared across threads and evaluated
//! concurrently without locking. Regex evaluation has no timeout; the
//! `regex` crate guarantees linear-time search, which bounds the cost.

mod field;
mod logical;
mod lookup;
mod result;
mod value;

pub use field::{CleanedValue, FieldPattern};
pub use logical::{combine, Operator, Pattern};
pub use lookup::{FieldKind, Lookup};
pub use result::{Captures, MatchResult};
pub use value::{CompiledRegex, QueryParams, Value};
