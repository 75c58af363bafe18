use chrono::{Duration, SecondsFormat, Utc};
use odata_filter::{parse, Evaluator, Predicate};
use serde::Serialize;
use serde_json::{json, Value};
use slog::{o, Discard, Logger};

fn object() -> Value {
    let now = Utc::now();
    json!({
        "prop1": "test",
        "prop2": 12,
        "prop3": false,
        "prop4": null,
        "prop5": {"sub1": "test", "sub2": true},
        "prop6": now.timestamp_millis(),
        "prop7": now.to_rfc3339_opts(SecondsFormat::Millis, true),
        "prop8": "TEST",
        "tags": ["a", "b"]
    })
}

fn check(predicate: &Predicate, expected: bool) {
    let obj = object();
    assert_eq!(
        predicate.test(&obj),
        expected,
        "'{}' against {}",
        predicate,
        obj
    );
}

#[test]
fn test_object_matches_predicates() {
    check(&Predicate::new("prop1").contains("es"), true);
    check(
        &Predicate::new("prop1").contains("es").or(Predicate::new("prop2").greater_than(13)),
        true,
    );
    check(
        &Predicate::new("prop1").contains("es").and(Predicate::new("prop2").greater_than(13)),
        false,
    );
    check(
        &Predicate::new("prop1").contains("es").and(
            Predicate::new("prop2")
                .greater_than(13)
                .or(Predicate::new("prop3").equals(false)),
        ),
        true,
    );
    check(&Predicate::new("prop4").not_equal_to("test"), true);
    check(&Predicate::new("prop5.sub1").contains("es"), true);
    check(&Predicate::new("prop8").starts_with("te"), true);
    check(&Predicate::new("undef").equals("test"), false);
}

#[test]
fn test_date_strings_compare_as_instants() {
    let yesterday = (Utc::now() - Duration::days(1)).to_rfc3339();
    let tomorrow = (Utc::now() + Duration::days(1)).to_rfc3339();

    check(&Predicate::new("prop7").greater_than(yesterday.as_str()), true);
    check(&Predicate::new("prop7").less_than(tomorrow.as_str()), true);
    check(&Predicate::new("prop7").less_than(yesterday.as_str()), false);

    // same instant written with an offset
    let obj = json!({"at": "2024-06-01T12:00:00+02:00"});
    assert!(Predicate::new("at").equals("2024-06-01T10:00:00Z").test(&obj));
    assert!(Predicate::new("at").greater_than_or_equal_to("2024-06-01").test(&obj));
}

#[test]
fn test_epoch_numbers_compare_numerically() {
    let yesterday = (Utc::now() - Duration::days(1)).timestamp_millis();
    let tomorrow = (Utc::now() + Duration::days(1)).timestamp_millis();

    check(&Predicate::new("prop6").greater_than(yesterday), true);
    check(&Predicate::new("prop6").less_than(tomorrow.to_string()), true);
}

#[test]
fn test_missing_paths_never_match() {
    for filter in [
        "undef eq 'test'",
        "undef ne 'test'",
        "prop5.missing gt 1",
        "prop1.deeper eq 'test'",
        "tags.5 eq 'a'",
        "contains(undef, 'x')",
    ] {
        check(&parse(filter).unwrap(), false);
    }
}

#[test]
fn test_array_index_segments() {
    check(&parse("tags.1 eq 'b'").unwrap(), true);
    check(&parse("tags eq 'a'").unwrap(), false);
    check(&parse("tags ne 'a'").unwrap(), true);
}

#[test]
fn test_parsed_filter_evaluates() {
    let p = parse("prop2 ge 12 and (startswith(prop8, 'x') or prop5.sub2 eq true)").unwrap();
    check(&p, true);

    let p = parse("prop2 gt 100 or endswith(prop1, 'ST')").unwrap();
    check(&p, true);

    let p = parse("prop3 eq true or prop2 lt '9'").unwrap();
    check(&p, false);
}

#[test]
fn test_non_numeric_strings_do_not_order_against_numbers() {
    let record = json!({"name": "abc", "n": 12});
    for (filter, expected) in [
        ("name gt 5", false),
        ("name lt 5", false),
        ("name ne 5", true),
        ("n lt 'abc'", false),
        ("n gt 'abc'", false),
        ("n ne 'abc'", true),
        ("n lt '13'", true),
    ] {
        assert_eq!(parse(filter).unwrap().test(&record), expected, "{}", filter);
    }
}

#[test]
fn test_whole_number_floats_match_as_integers() {
    let record = json!({"x": 10.0, "y": 2.5});
    assert!(parse("endswith(x, '10')").unwrap().test(&record));
    assert!(!parse("contains(x, '.0')").unwrap().test(&record));
    assert!(parse("startswith(y, '2.5')").unwrap().test(&record));
}

#[test]
fn test_uninitialized_condition_never_matches() {
    check(&Predicate::new("prop1"), false);
    check(&Predicate::new("prop1").or(Predicate::new("prop2").equals(12)), true);
}

#[test]
fn test_records() {
    #[derive(Serialize)]
    struct Person {
        name: String,
        age: u32,
        address: Address,
    }

    #[derive(Serialize)]
    struct Address {
        city: String,
    }

    let people = vec![
        Person {
            name: "Ada".into(),
            age: 36,
            address: Address { city: "London".into() },
        },
        Person {
            name: "Grace".into(),
            age: 85,
            address: Address { city: "Arlington".into() },
        },
    ];

    let p = parse("age lt 50 and contains(address.city, 'lon')").unwrap();
    let matched: Vec<_> = people
        .iter()
        .filter(|person| p.test_record(*person))
        .map(|person| person.name.as_str())
        .collect();
    assert_eq!(matched, vec!["Ada"]);
}

#[test]
fn test_evaluator_with_logger() {
    let logger = Logger::root(Discard, o!("test" => "eval"));
    let evaluator = Evaluator::new(&logger);
    let p = parse("prop1 eq 'test' and prop2 eq 12").unwrap();
    assert!(evaluator.test(&p, &object()));
    assert!(!evaluator.test(&p, &json!({})));
}
