use std::fmt::{self, Display};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Boolean(bool),
    Number(f64),
    String(String),
}

impl Literal {
    /// Convert a bare (unquoted) filter token into its typed literal.
    ///
    /// `true`/`false` are matched case-insensitively, finite numbers become
    /// numeric, anything else stays a string.
    pub fn from_bare(token: &str) -> Self {
        if token.eq_ignore_ascii_case("true") {
            return Literal::Boolean(true);
        }
        if token.eq_ignore_ascii_case("false") {
            return Literal::Boolean(false);
        }
        match parse_number(token) {
            Some(n) => Literal::Number(n),
            None => Literal::String(token.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Literal::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The literal's value without quoting, as used in a URL query string
    pub fn to_plain_string(&self) -> String {
        match self {
            Literal::String(s) => s.clone(),
            Literal::Number(n) => n.to_string(),
            Literal::Boolean(b) => b.to_string(),
        }
    }
}

/// Parses a token as a finite decimal number. Words like `inf` or `NaN` that
/// `f64::from_str` would accept are rejected.
pub(crate) fn parse_number(token: &str) -> Option<f64> {
    let token = token.trim();
    let first = token.chars().next()?;
    if !(first.is_ascii_digit() || first == '-' || first == '+' || first == '.') {
        return None;
    }
    token.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// String literal in filter syntax: single quoted, embedded quotes doubled
pub(crate) fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => f.write_str(&quote(s)),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<&String> for Literal {
    fn from(s: &String) -> Self {
        Literal::String(s.clone())
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

impl From<f32> for Literal {
    fn from(n: f32) -> Self {
        Literal::Number(f64::from(n))
    }
}

macro_rules! literal_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Literal {
                fn from(n: $t) -> Self {
                    Literal::Number(n as f64)
                }
            }
        )*
    };
}

literal_from_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<DateTime<Utc>> for Literal {
    fn from(dt: DateTime<Utc>) -> Self {
        Literal::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}
