use std::cmp::Ordering;

use serde_json::Value;

use super::resolve::value_to_string;
use super::temporal::parse_instant;
use crate::predicate::value::parse_number;
use crate::predicate::{CompareOperator, Literal};

/// Evaluate `actual <operator> expected` with loose typing
pub fn compare_value(actual: &Value, operator: CompareOperator, expected: &Literal) -> bool {
    operator.accepts(order(actual, expected))
}

/// Order a document value against a literal.
///
/// Date-like strings on both sides compare as instants. A string against a
/// number compares numerically when the string parses and is unordered when
/// it does not. Booleans count as 0/1 against numbers, and the remaining
/// pairs with string forms compare lexicographically. `None` means the pair
/// is unordered.
pub fn order(actual: &Value, expected: &Literal) -> Option<Ordering> {
    if let (Value::String(a), Literal::String(e)) = (actual, expected) {
        if let (Some(a), Some(e)) = (parse_instant(a), parse_instant(e)) {
            return Some(a.cmp(&e));
        }
    }

    match (actual, expected) {
        (Value::Null | Value::Array(_) | Value::Object(_), _) => None,

        (Value::Number(a), Literal::Number(e)) => a.as_f64().and_then(|a| a.partial_cmp(e)),
        (Value::Number(a), Literal::String(e)) => {
            let (a, e) = (a.as_f64()?, parse_number(e)?);
            a.partial_cmp(&e)
        }
        (Value::String(a), Literal::Number(e)) => parse_number(a)?.partial_cmp(e),

        (Value::Bool(a), Literal::Boolean(e)) => Some(a.cmp(e)),
        (Value::Bool(a), Literal::Number(e)) => f64::from(u8::from(*a)).partial_cmp(e),
        (Value::Number(a), Literal::Boolean(e)) => {
            a.as_f64().and_then(|a| a.partial_cmp(&f64::from(u8::from(*e))))
        }

        _ => value_to_string(actual).map(|a| a.as_str().cmp(expected.to_plain_string().as_str())),
    }
}
