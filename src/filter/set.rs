use super::expr::Filter;
use crate::descriptor::TestDescriptor;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterRuleType {
    Inclusion,
    Exclusion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRule {
    pub rule_type: FilterRuleType,
    pub filter: Filter,
}

impl FilterRule {
    pub fn new(rule_type: FilterRuleType, filter: Filter) -> Self {
        Self { rule_type, filter }
    }

    pub fn include(filter: Filter) -> Self {
        Self::new(FilterRuleType::Inclusion, filter)
    }

    pub fn exclude(filter: Filter) -> Self {
        Self::new(FilterRuleType::Exclusion, filter)
    }
}

/// Outcome of evaluating a filter set against one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterSetResult {
    Include,
    Exclude,
    Unmatched,
}

/// Ordered inclusion and exclusion rules.
///
/// Evaluation is first-match: the earliest rule whose filter matches decides.
/// Callers wanting "include unless excluded" put exclusions first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    rules: Vec<FilterRule>,
}

impl FilterSet {
    pub const fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn new(rules: Vec<FilterRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn has_inclusion_rules(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.rule_type == FilterRuleType::Inclusion)
    }

    pub fn evaluate<D: TestDescriptor + ?Sized>(&self, test: &D) -> FilterSetResult {
        self.rules
            .iter()
            .find(|rule| rule.filter.is_match(test))
            .map_or(FilterSetResult::Unmatched, |rule| match rule.rule_type {
                FilterRuleType::Inclusion => FilterSetResult::Include,
                FilterRuleType::Exclusion => FilterSetResult::Exclude,
            })
    }
}

impl From<Filter> for FilterSet {
    /// A set with the single inclusion rule `filter`.
    fn from(filter: Filter) -> Self {
        Self::new(vec![FilterRule::include(filter)])
    }
}
