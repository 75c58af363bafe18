use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use super::value::Literal;

/// Infix comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOperator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOperator {
    pub const ALL: [CompareOperator; 6] = [
        CompareOperator::Eq,
        CompareOperator::Ne,
        CompareOperator::Gt,
        CompareOperator::Ge,
        CompareOperator::Lt,
        CompareOperator::Le,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            CompareOperator::Eq => "eq",
            CompareOperator::Ne => "ne",
            CompareOperator::Gt => "gt",
            CompareOperator::Ge => "ge",
            CompareOperator::Lt => "lt",
            CompareOperator::Le => "le",
        }
    }

    /// Case-sensitive: only the lowercase keywords are operators
    pub fn from_keyword(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.keyword() == s)
    }

    /// Whether an ordering between the two sides satisfies this operator.
    /// `None` means the sides are incomparable, which only `ne` accepts.
    pub fn accepts(&self, ordering: Option<std::cmp::Ordering>) -> bool {
        use std::cmp::Ordering::*;
        match (self, ordering) {
            (CompareOperator::Ne, None) => true,
            (_, None) => false,
            (CompareOperator::Eq, Some(o)) => o == Equal,
            (CompareOperator::Ne, Some(o)) => o != Equal,
            (CompareOperator::Gt, Some(o)) => o == Greater,
            (CompareOperator::Ge, Some(o)) => o != Less,
            (CompareOperator::Lt, Some(o)) => o == Less,
            (CompareOperator::Le, Some(o)) => o != Greater,
        }
    }
}

impl Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// String-matching functions, always applied to a string value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextFunction {
    Contains,
    StartsWith,
    EndsWith,
}

impl TextFunction {
    /// Function name as written in a filter string
    pub fn name(&self) -> &'static str {
        match self {
            TextFunction::Contains => "contains",
            TextFunction::StartsWith => "startswith",
            TextFunction::EndsWith => "endswith",
        }
    }

    /// Case-insensitive match of `needle` against `haystack`
    pub fn matches(&self, haystack: &str, needle: &str) -> bool {
        let haystack = haystack.to_lowercase();
        let needle = needle.to_lowercase();
        match self {
            TextFunction::Contains => haystack.contains(&needle),
            TextFunction::StartsWith => haystack.starts_with(&needle),
            TextFunction::EndsWith => haystack.ends_with(&needle),
        }
    }
}

impl Display for TextFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operator and value of a condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Compare {
        operator: CompareOperator,
        value: Literal,
    },
    Text {
        function: TextFunction,
        value: String,
    },
}

/// Boolean connective of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupOperator {
    #[default]
    And,
    Or,
}

impl GroupOperator {
    pub fn keyword(&self) -> &'static str {
        match self {
            GroupOperator::And => "and",
            GroupOperator::Or => "or",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "and" => Some(GroupOperator::And),
            "or" => Some(GroupOperator::Or),
            _ => None,
        }
    }
}

impl Display for GroupOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
