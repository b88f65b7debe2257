use test_select::filter::{
    Filter, FilterRule, FilterSet, NonEmpty, ValueFilter, parse_filter, parse_filter_set,
    to_filter_expr, to_filter_set_expr,
};

const EXPRESSIONS: &[&str] = &[
    "*",
    "Type:Fixture1",
    "ExactType:\"Acme.Foo\"",
    "Type:Fixture1,'Fixture2'",
    "Name:/A*b+/i",
    "Name:/a\\/b/",
    "Name:~'Fix.*'",
    "Author:JulianHidalgo",
    "'Test Owner':'it\\'s me'",
    "not Type:A or Type:B and not (Member:x | Member:y)",
    "(Name:a Name:b) or not not *",
    "Category:Smoke,/^Fa/i and Id:'1\\\\2'",
];

#[test]
fn test_formatted_filters_parse_back_to_the_same_tree() {
    for expression in EXPRESSIONS {
        let parsed = parse_filter(expression).expect(expression);
        let formatted = to_filter_expr(&parsed);
        let reparsed = parse_filter(&formatted)
            .unwrap_or_else(|e| panic!("{formatted:?} from {expression:?} failed: {e}"));
        assert_eq!(reparsed, parsed, "formatted as {formatted:?}");
    }
}

#[test]
fn test_formatting_is_stable_after_one_round() {
    for expression in EXPRESSIONS {
        let once = to_filter_expr(&parse_filter(expression).unwrap());
        let twice = to_filter_expr(&parse_filter(&once).unwrap());
        assert_eq!(once, twice, "expression {expression:?}");
    }
}

#[test]
fn test_nested_value_lists_are_flattened() {
    let mut inner = NonEmpty::new(ValueFilter::equality("b"));
    inner.push(ValueFilter::equality("c"));
    let mut outer = NonEmpty::new(ValueFilter::equality("a"));
    outer.push(ValueFilter::Or(inner));
    let filter = Filter::Name(ValueFilter::Or(outer));
    assert_eq!(to_filter_expr(&filter), "Name: 'a', 'b', 'c'");
}

#[test]
fn test_none_round_trips_to_an_equivalent_filter() {
    let formatted = to_filter_expr(&Filter::None);
    assert_eq!(
        parse_filter(&formatted).unwrap(),
        Filter::negate(Filter::Any)
    );
}

#[test]
fn test_filter_sets_round_trip() {
    for expression in [
        "",
        "exclude *",
        "Category:Smoke exclude Category:Flaky",
        "exclude Name:a include Name:b include Name:c or Name:d",
        "include Type:A and not Member:B exclude 'include':x",
    ] {
        let parsed = parse_filter_set(expression).expect(expression);
        let formatted = to_filter_set_expr(&parsed);
        assert_eq!(
            parse_filter_set(&formatted).unwrap(),
            parsed,
            "formatted as {formatted:?}"
        );
    }
}

#[test]
fn test_filter_set_text() {
    let set = FilterSet::new(vec![
        FilterRule::include(parse_filter("Name:a").unwrap()),
        FilterRule::include(parse_filter("Name:b or Name:c").unwrap()),
        FilterRule::exclude(parse_filter("Name:d").unwrap()),
    ]);
    assert_eq!(
        set.to_string(),
        "Name: 'a' include (Name: 'b' or Name: 'c') exclude Name: 'd'"
    );
}
