//! Filter expression parsing, evaluation and formatting
//!
//! Tests are selected with a small expression language. A filter matches
//! tests by attribute; a filter set orders inclusion and exclusion rules.
//!
//! # Syntax
//!
//! ```text
//! key:value                 Leaf filter on one attribute
//! key:v1,v2                 Any of several values
//! key:/regex/  key:/regex/i Regular expression (unanchored), optionally case-insensitive
//! key:~value                Value read as a regular expression
//! a and b   a & b   a b     Both
//! a or b    a | b           Either
//! not a     ! a             Negation
//! ( ... )                   Grouping
//! *                         Every test
//! ```
//!
//! Precedence from loosest to tightest: `or`, `and`, `not`. Values may be
//! single- or double-quoted; a backslash escapes the closing quote. A word
//! starting with `!`, `|` or `&` has that symbol split off as an operator,
//! so such values must be quoted.
//!
//! # Keys
//!
//! - `Id`, `Name`, `Assembly`, `Namespace`, `Member` - attributes of the test
//! - `Type` - declaring type, including types derived from it
//! - `ExactType` - declaring type only
//! - anything else - metadata entry with that key
//!
//! # Filter sets
//!
//! ```text
//! Category:Smoke exclude Category:Flaky
//! include Type:Acme.Fixture exclude Member:Slow include *
//! ```
//!
//! The first rule that matches a test decides whether it is included or
//! excluded; a test no rule matches is unmatched.

pub mod error;
mod eval;
pub mod expr;
pub mod format;
pub mod lexer;
pub mod list;
pub mod parser;
pub mod set;
pub mod value;

pub use error::FilterParseError;
pub use expr::{Filter, FilterKey};
pub use format::{to_filter_expr, to_filter_set_expr};
pub use lexer::{Token, TokenKind, tokenize, tokenize_optional};
pub use list::NonEmpty;
pub use parser::{MAX_NESTING_DEPTH, parse_filter, parse_filter_optional, parse_filter_set};
pub use set::{FilterRule, FilterRuleType, FilterSet, FilterSetResult};
pub use value::{RegexMatcher, ValueFilter};
