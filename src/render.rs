//! Predicate tree to canonical filter string

use std::fmt::{self, Display};

use itertools::Itertools;
use recursion::CollapsibleExt;

use crate::config::Dialect;
use crate::predicate::value::quote;
use crate::predicate::{Comparison, Condition, Predicate, PredicateFrame, TextFunction};

/// Render `predicate` in the default (V4) dialect
pub fn render(predicate: &Predicate) -> String {
    render_with(predicate, Dialect::default())
}

/// Render `predicate`, spelling substring matches the way `dialect` does.
///
/// Child groups are parenthesized, the outermost level never is. An
/// uninitialized condition renders as the empty string.
pub fn render_with(predicate: &Predicate, dialect: Dialect) -> String {
    struct Rendered {
        text: String,
        grouped: bool,
    }

    let rendered = predicate.collapse_frames(|frame: PredicateFrame<Rendered>| match frame {
        PredicateFrame::Condition(c) => Rendered {
            text: render_condition(c, dialect),
            grouped: false,
        },
        PredicateFrame::Group(op, children) => {
            let separator = format!(" {} ", op);
            let text = children
                .into_iter()
                .map(|child| {
                    if child.grouped {
                        format!("({})", child.text)
                    } else {
                        child.text
                    }
                })
                .join(&separator);
            Rendered {
                text,
                grouped: true,
            }
        }
    });

    rendered.text
}

fn render_condition(condition: &Condition, dialect: Dialect) -> String {
    let property = &condition.property;
    match &condition.comparison {
        None => String::new(),
        Some(Comparison::Compare { operator, value }) => {
            format!("{} {} {}", property, operator, value)
        }
        Some(Comparison::Text { function, value }) => match (function, dialect) {
            (TextFunction::Contains, Dialect::V2) => {
                format!("substringof({}, {})", quote(value), property)
            }
            (function, _) => format!("{}({}, {})", function, property, quote(value)),
        },
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_condition(self, Dialect::default()))
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}
