//! In-memory evaluation of a predicate tree against JSON documents

use serde::Serialize;
use serde_json::Value;
use slog::{debug, o, Discard, Logger};

use crate::predicate::{Comparison, Condition, Group, GroupOperator, Predicate};

pub mod compare;
pub mod resolve;
pub mod temporal;

use self::compare::compare_value;
use self::resolve::{resolve_path, value_to_string};

/// Evaluates predicates, logging each visited node at debug level
#[derive(Clone)]
pub struct Evaluator {
    logger: Logger,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            logger: Logger::root(Discard, o!()),
        }
    }
}

impl Evaluator {
    pub fn new(logger: &Logger) -> Self {
        Self {
            logger: logger.new(o!("component" => "eval")),
        }
    }

    /// Whether `object` satisfies `predicate`
    pub fn test(&self, predicate: &Predicate, object: &Value) -> bool {
        let result = self.eval(predicate, object);
        debug!(self.logger, "evaluated"; "expr" => %predicate, "result" => result);
        result
    }

    /// Serialize `record` and evaluate it; a record that cannot be represented
    /// as JSON never matches
    pub fn test_record<T: Serialize + ?Sized>(&self, predicate: &Predicate, record: &T) -> bool {
        match serde_json::to_value(record) {
            Ok(value) => self.test(predicate, &value),
            Err(e) => {
                debug!(self.logger, "record not serializable"; "error" => %e);
                false
            }
        }
    }

    fn eval(&self, predicate: &Predicate, object: &Value) -> bool {
        match predicate {
            Predicate::Condition(c) => self.eval_condition(c, object),
            Predicate::Group(g) => self.eval_group(g, object),
        }
    }

    fn eval_group(&self, group: &Group, object: &Value) -> bool {
        let result = match group.operator {
            GroupOperator::And => group.children.iter().all(|c| self.eval(c, object)),
            GroupOperator::Or => group.children.iter().any(|c| self.eval(c, object)),
        };
        debug!(self.logger, "group";
            "operator" => %group.operator,
            "children" => group.children.len(),
            "result" => result);
        result
    }

    fn eval_condition(&self, condition: &Condition, object: &Value) -> bool {
        let comparison = match &condition.comparison {
            Some(comparison) => comparison,
            None => {
                debug!(self.logger, "uninitialized condition"; "property" => &condition.property);
                return false;
            }
        };

        let actual = match resolve_path(object, &condition.property) {
            Some(actual) => actual,
            None => {
                debug!(self.logger, "property missing"; "property" => &condition.property);
                return false;
            }
        };

        let result = match comparison {
            Comparison::Compare { operator, value } => compare_value(actual, *operator, value),
            Comparison::Text { function, value } => {
                value_to_string(actual).is_some_and(|s| function.matches(&s, value))
            }
        };
        debug!(self.logger, "condition";
            "property" => &condition.property,
            "actual" => %actual,
            "result" => result);
        result
    }
}

impl Predicate {
    /// Evaluate against a JSON document without logging
    pub fn test(&self, object: &Value) -> bool {
        Evaluator::default().test(self, object)
    }

    /// Evaluate against any serializable record without logging
    pub fn test_record<T: Serialize + ?Sized>(&self, record: &T) -> bool {
        Evaluator::default().test_record(self, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object() -> Value {
        json!({
            "prop1": "test",
            "prop2": 12,
            "prop3": false,
            "prop4": null,
            "prop5": {"sub1": "test", "sub2": true},
            "prop8": "TEST"
        })
    }

    #[test]
    fn test_short_circuit_groups() {
        let obj = object();
        let matches = Predicate::new("prop1").contains("es");
        let misses = Predicate::new("prop2").greater_than(13);

        assert!(matches.clone().or(misses.clone()).test(&obj));
        assert!(!matches.clone().and(misses.clone()).test(&obj));
        assert!(matches
            .and(misses.or(Predicate::new("prop3").equals(false)))
            .test(&obj));
    }

    #[test]
    fn test_vacuous_groups() {
        let obj = object();
        assert!(Predicate::Group(Group::new(GroupOperator::And, vec![])).test(&obj));
        assert!(!Predicate::Group(Group::new(GroupOperator::Or, vec![])).test(&obj));
    }

    #[test]
    fn test_uninitialized_condition_is_false() {
        assert!(!Predicate::new("prop1").test(&object()));
    }

    #[test]
    fn test_null_and_nested_values() {
        let obj = object();
        assert!(Predicate::new("prop4").not_equal_to("test").test(&obj));
        assert!(!Predicate::new("prop4").contains("null").test(&obj));
        assert!(Predicate::new("prop5.sub1").contains("es").test(&obj));
        assert!(!Predicate::new("prop5").contains("test").test(&obj));
    }

    #[test]
    fn test_text_functions_ignore_case() {
        let obj = object();
        assert!(Predicate::new("prop8").starts_with("te").test(&obj));
        assert!(Predicate::new("prop1").ends_with("ST").test(&obj));
        assert!(Predicate::new("prop2").starts_with("1").test(&obj));
    }

    #[test]
    fn test_missing_path_is_false_for_every_operator() {
        let obj = object();
        assert!(!Predicate::new("undef").equals("test").test(&obj));
        assert!(!Predicate::new("undef").not_equal_to("test").test(&obj));
        assert!(!Predicate::new("prop5.nope").less_than(1).test(&obj));
    }

    #[test]
    fn test_record() {
        #[derive(Serialize)]
        struct Row {
            name: &'static str,
            age: u32,
        }

        let p = Predicate::new("age").greater_than_or_equal_to(21);
        assert!(p.test_record(&Row { name: "a", age: 30 }));
        assert!(!p.test_record(&Row { name: "b", age: 18 }));
    }

    #[test]
    fn test_logged_evaluation_matches_plain() {
        let logger = Logger::root(Discard, o!());
        let evaluator = Evaluator::new(&logger);
        let p = Predicate::new("prop2").less_than(20);
        assert_eq!(evaluator.test(&p, &object()), p.test(&object()));
    }
}
