use super::list::NonEmpty;
use crate::descriptor::TypeRef;
use regex::{Regex, RegexBuilder};
use std::fmt;

/// A compiled regular expression together with the text it came from.
#[derive(Clone)]
pub struct RegexMatcher {
    pattern: String,
    ignore_case: bool,
    regex: Regex,
}

impl RegexMatcher {
    pub fn new(pattern: &str, ignore_case: bool) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(ignore_case)
            .build()?;
        Ok(Self {
            pattern: pattern.to_string(),
            ignore_case,
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Unanchored search.
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for RegexMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.ignore_case == other.ignore_case
    }
}

impl Eq for RegexMatcher {}

impl fmt::Debug for RegexMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tuple = f.debug_tuple("Regex");
        tuple.field(&self.pattern);
        if self.ignore_case {
            tuple.field(&"IgnoreCase");
        }
        tuple.finish()
    }
}

/// Predicate over a single string attribute of a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueFilter {
    Equality(String),
    Regex(RegexMatcher),
    Or(NonEmpty<ValueFilter>),
}

impl ValueFilter {
    pub fn equality(expected: impl Into<String>) -> Self {
        ValueFilter::Equality(expected.into())
    }

    pub fn regex(pattern: &str, ignore_case: bool) -> Result<Self, regex::Error> {
        RegexMatcher::new(pattern, ignore_case).map(ValueFilter::Regex)
    }

    /// Disjunction of `values`, collapsing a single value to itself.
    pub fn any_of(values: NonEmpty<ValueFilter>) -> Self {
        values.into_single().unwrap_or_else(ValueFilter::Or)
    }

    /// An absent value never matches.
    pub fn is_match(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match self {
            ValueFilter::Equality(expected) => expected == actual,
            ValueFilter::Regex(matcher) => matcher.is_match(actual),
            ValueFilter::Or(values) => values.iter().any(|v| v.is_match(Some(actual))),
        }
    }

    /// Matches when any representation of the type satisfies this filter.
    pub fn matches_type(&self, type_ref: &TypeRef) -> bool {
        self.is_match(Some(type_ref.name()))
            || self.is_match(Some(type_ref.full_name()))
            || self.is_match(type_ref.assembly_qualified_name())
    }
}
