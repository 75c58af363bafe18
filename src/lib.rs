//! Build, render, parse and evaluate OData-style `$filter` expressions, and
//! assemble OData query strings.
//!
//! ```
//! use odata_filter::{parse, Predicate};
//! use serde_json::json;
//!
//! let p = Predicate::new("age").greater_than(21).and(Predicate::new("name").starts_with("a"));
//! assert_eq!(p.to_string(), "age gt 21 and startswith(name, 'a')");
//! assert_eq!(parse(&p.to_string()).unwrap(), p);
//! assert!(p.test(&json!({"age": 30, "name": "Alice"})));
//! ```

pub mod config;
pub mod eval;
pub mod parser;
pub mod predicate;
pub mod query_options;
pub mod render;

pub use config::{Dialect, FilterConfig};
pub use eval::Evaluator;
pub use parser::{parse, parse_with, ParseError};
pub use predicate::{
    CompareOperator, Comparison, Condition, Group, GroupOperator, Literal, Operands, Predicate,
    TextFunction,
};
pub use query_options::{Filter, PropertyList, QueryOptions};
pub use render::{render, render_with};
