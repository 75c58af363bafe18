use chrono::{TimeZone, Utc};
use odata_filter::{parse, render_with, Dialect, GroupOperator, Predicate};

fn eq_value(property: &str) -> Predicate {
    Predicate::new(property).equals("value")
}

#[test]
fn test_builders_render() {
    let cases = [
        (Predicate::new("property").equals("value"), "property eq 'value'"),
        (Predicate::new("property").not_equal_to("value"), "property ne 'value'"),
        (Predicate::new("property").greater_than("value"), "property gt 'value'"),
        (Predicate::new("property").greater_than_or_equal_to("value"), "property ge 'value'"),
        (Predicate::new("property").less_than("value"), "property lt 'value'"),
        (Predicate::new("property").less_than_or_equal_to("value"), "property le 'value'"),
        (Predicate::new("property").starts_with("value"), "startswith(property, 'value')"),
        (Predicate::new("property").ends_with("value"), "endswith(property, 'value')"),
        (Predicate::new("property").contains("value"), "contains(property, 'value')"),
        (Predicate::new("property1").equals(1), "property1 eq 1"),
        (Predicate::new("property1").equals(2.5), "property1 eq 2.5"),
        (Predicate::new("property1").equals(true), "property1 eq true"),
        (Predicate::new("property1").equals(false), "property1 eq false"),
    ];

    for (predicate, expected) in cases {
        assert_eq!(predicate.to_string(), expected);
    }
}

#[test]
fn test_date_literal_renders_as_string() {
    let when = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
    let p = Predicate::new("created").greater_than(when);
    assert_eq!(p.to_string(), "created gt '2024-03-01T08:30:00Z'");
}

#[test]
fn test_uninitialized_condition_renders_empty() {
    assert_eq!(Predicate::new("property").to_string(), "");
}

#[test]
fn test_join_existing_predicate() {
    let p = eq_value("property1").join(Predicate::new("property2").equals(1), None);
    assert_eq!(p.to_string(), "property1 eq 'value' and property2 eq 1");
    assert_eq!(p.property(), None);
    assert_eq!(p.children()[0].property(), Some("property1"));
}

#[test]
fn test_join_all() {
    let joined = Predicate::join_all(
        [eq_value("property1"), Predicate::new("property2").equals(false)],
        None,
    )
    .unwrap();
    assert_eq!(joined.to_string(), "property1 eq 'value' and property2 eq false");

    let joined = Predicate::join_all(
        vec![eq_value("property1"), Predicate::new("property2").equals(false)],
        Some(GroupOperator::Or),
    )
    .unwrap();
    assert_eq!(joined.to_string(), "property1 eq 'value' or property2 eq false");
}

#[test]
fn test_join_all_with_only_none_entries() {
    let joined = Predicate::join_all(vec![None::<Predicate>], None).unwrap();
    assert!(!joined.is_group());
    assert_eq!(joined.to_string(), "");
    assert!(!joined.test(&serde_json::json!({"property1": "value"})));

    assert!(Predicate::join_all(Vec::<Option<Predicate>>::new(), None).is_none());
}

#[test]
fn test_join_array_of_predicates() {
    let p = eq_value("property1").join(vec![eq_value("property2"), eq_value("property3")], None);
    assert_eq!(p.children().len(), 3);
}

#[test]
fn test_and_or() {
    let p = eq_value("property1").and(eq_value("property2"));
    assert_eq!(p.group_operator(), Some(GroupOperator::And));

    let p = eq_value("property1").or(eq_value("property2"));
    assert_eq!(p.group_operator(), Some(GroupOperator::Or));
    assert_eq!(p.to_string(), "property1 eq 'value' or property2 eq 'value'");
}

#[test]
fn test_in_place_chain() {
    let mut p = eq_value("a");
    p.and_in_place(eq_value("b")).and_in_place(eq_value("c"));
    assert_eq!(p.to_string(), "a eq 'value' and b eq 'value' and c eq 'value'");
}

#[test]
fn test_parsed_group_stays_parenthesized_when_joined() {
    let parsed =
        parse("property1 gt 5 and (property2 eq false or startswith(property3, 'test'))").unwrap();
    let p = Predicate::new("property").contains("test").join(parsed, Some(GroupOperator::Or));
    assert_eq!(
        p.to_string(),
        "contains(property, 'test') or (property1 gt 5 and (property2 eq false or startswith(property3, 'test')))"
    );
}

#[test]
fn test_mixed_fluent_groups_render_flat() {
    // a group absorbs operands and takes the latest explicit connective
    let p = eq_value("a").and(eq_value("b")).or(eq_value("c"));
    assert_eq!(p.to_string(), "a eq 'value' or b eq 'value' or c eq 'value'");
}

#[test]
fn test_nested_building() {
    let p = eq_value("a").and(eq_value("b").or(eq_value("c")));
    assert_eq!(p.to_string(), "a eq 'value' and (b eq 'value' or c eq 'value')");
}

#[test]
fn test_legacy_dialect_rendering() {
    let p = Predicate::new("name").contains("it's").and(Predicate::new("n").starts_with("x"));
    assert_eq!(
        render_with(&p, Dialect::V2),
        "substringof('it''s', name) and startswith(n, 'x')"
    );
}

#[test]
fn test_serde_shape() {
    let p = Predicate::new("age").greater_than(21).or(Predicate::new("vip").equals(true));
    let json = serde_json::to_value(&p).unwrap();
    let back: Predicate = serde_json::from_value(json).unwrap();
    assert_eq!(back, p);
}
