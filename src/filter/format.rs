use super::expr::Filter;
use super::list::NonEmpty;
use super::set::{FilterRuleType, FilterSet};
use super::value::ValueFilter;
use std::fmt;

/// Canonical expression text for `filter`; parsing it yields an equivalent filter.
pub fn to_filter_expr(filter: &Filter) -> String {
    let mut out = String::new();
    write_filter(&mut out, filter, false);
    out
}

/// Canonical expression text for `set`; the empty set renders as `""`.
pub fn to_filter_set_expr(set: &FilterSet) -> String {
    let mut out = String::new();
    for (index, rule) in set.rules().iter().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        match rule.rule_type {
            // a later inclusion needs its keyword or it would fold into the previous rule
            FilterRuleType::Inclusion if index > 0 => out.push_str("include "),
            FilterRuleType::Inclusion => {}
            FilterRuleType::Exclusion => out.push_str("exclude "),
        }
        write_filter(&mut out, &rule.filter, true);
    }
    out
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_filter_expr(self))
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_filter_set_expr(self))
    }
}

fn write_filter(out: &mut String, filter: &Filter, nested: bool) {
    match filter {
        Filter::Any => out.push('*'),
        Filter::None => out.push_str("not *"),
        Filter::And(children) => write_list(out, children, " and ", nested),
        Filter::Or(children) => write_list(out, children, " or ", nested),
        Filter::Not(child) => {
            out.push_str("not (");
            write_filter(out, child, false);
            out.push(')');
        }
        Filter::Metadata { key, value } => {
            write_key(out, key);
            out.push_str(": ");
            write_value(out, value);
        }
        leaf => {
            if let (Some(key), Some(value)) = (leaf.key(), leaf.value()) {
                out.push_str(key);
                out.push_str(": ");
                write_value(out, value);
            }
        }
    }
}

fn write_list(out: &mut String, children: &NonEmpty<Filter>, separator: &str, nested: bool) {
    if children.len() == 1 {
        write_filter(out, children.first(), nested);
        return;
    }
    if nested {
        out.push('(');
    }
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            out.push_str(separator);
        }
        write_filter(out, child, true);
    }
    if nested {
        out.push(')');
    }
}

fn write_key(out: &mut String, key: &str) {
    if is_plain_key(key) {
        out.push_str(key);
    } else {
        write_quoted(out, key);
    }
}

/// Keys that lex back as the same unquoted word and are not operators.
fn is_plain_key(key: &str) -> bool {
    const RESERVED: [&str; 5] = ["and", "or", "not", "include", "exclude"];

    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !RESERVED.iter().any(|word| key.eq_ignore_ascii_case(word))
}

fn write_value(out: &mut String, value: &ValueFilter) {
    match value {
        ValueFilter::Equality(expected) => write_quoted(out, expected),
        ValueFilter::Regex(matcher) => {
            out.push('/');
            write_regex_pattern(out, matcher.pattern());
            out.push('/');
            if matcher.ignore_case() {
                out.push('i');
            }
        }
        ValueFilter::Or(values) => {
            for (index, value) in values.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_value(out, value);
            }
        }
    }
}

fn write_quoted(out: &mut String, text: &str) {
    out.push('\'');
    for c in text.chars() {
        if matches!(c, '\'' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
}

fn write_regex_pattern(out: &mut String, pattern: &str) {
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '/' => out.push_str("\\/"),
            '\\' => match chars.next() {
                // `\/` and `/` mean the same to the regex engine
                Some('/') => out.push_str("\\/"),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push_str("\\\\"),
            },
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterRule, parse_filter, parse_filter_set};

    #[test]
    fn test_leaf_formatting() {
        assert_eq!(
            to_filter_expr(&parse_filter("Type:Fixture1").unwrap()),
            "Type: 'Fixture1'"
        );
        assert_eq!(
            to_filter_expr(&parse_filter("ExactType:\"Acme.Foo\"").unwrap()),
            "ExactType: 'Acme.Foo'"
        );
        assert_eq!(
            to_filter_expr(&parse_filter("Name:/A*b+/i").unwrap()),
            "Name: /A*b+/i"
        );
        assert_eq!(
            to_filter_expr(&parse_filter("Type:Fixture1,'Fixture2'").unwrap()),
            "Type: 'Fixture1', 'Fixture2'"
        );
    }

    #[test]
    fn test_escaping() {
        let filter = Filter::Name(ValueFilter::equality(r"it's a\b"));
        assert_eq!(to_filter_expr(&filter), r"Name: 'it\'s a\\b'");

        let regex = Filter::Name(ValueFilter::regex("a/b", false).unwrap());
        assert_eq!(to_filter_expr(&regex), r"Name: /a\/b/");
    }

    #[test]
    fn test_metadata_keys_are_quoted_when_needed() {
        let plain = Filter::metadata("Category", ValueFilter::equality("Smoke"));
        assert_eq!(to_filter_expr(&plain), "Category: 'Smoke'");

        let spaced = Filter::metadata("Test Owner", ValueFilter::equality("qa"));
        assert_eq!(to_filter_expr(&spaced), "'Test Owner': 'qa'");

        let keyword = Filter::metadata("exclude", ValueFilter::equality("yes"));
        assert_eq!(to_filter_expr(&keyword), "'exclude': 'yes'");
    }

    #[test]
    fn test_combinators() {
        assert_eq!(
            to_filter_expr(&parse_filter("* and * or * and *").unwrap()),
            "(* and *) or (* and *)"
        );
        assert_eq!(
            to_filter_expr(&parse_filter("not * or not * and *").unwrap()),
            "not (*) or (not (*) and *)"
        );
        assert_eq!(to_filter_expr(&Filter::None), "not *");
    }

    #[test]
    fn test_filter_sets() {
        assert_eq!(to_filter_set_expr(&FilterSet::empty()), "");
        assert_eq!(
            to_filter_set_expr(&FilterSet::new(vec![FilterRule::exclude(Filter::Any)])),
            "exclude *"
        );
        assert_eq!(
            to_filter_set_expr(&parse_filter_set("include * exclude *").unwrap()),
            "* exclude *"
        );
        assert_eq!(
            to_filter_set_expr(
                &parse_filter_set("include * exclude Type: foo and Type: bar").unwrap()
            ),
            "* exclude (Type: 'foo' and Type: 'bar')"
        );
        assert_eq!(
            to_filter_set_expr(&parse_filter_set("exclude Name:a include Name:b").unwrap()),
            "exclude Name: 'a' include Name: 'b'"
        );
    }
}
