pub mod error;
pub mod grammar;
pub mod lexer;

use std::str::FromStr;

pub use error::ParseError;
pub use lexer::{Lexer, Token, TokenKind};

use crate::config::FilterConfig;
use crate::predicate::Predicate;

/// Parse a filter string with the default configuration
pub fn parse(input: &str) -> Result<Predicate, ParseError> {
    parse_with(input, &FilterConfig::default())
}

/// Parse a filter string, e.g. `age gt 21 and (startswith(name, 'A') or vip eq true)`
///
/// # Errors
/// Returns a [`ParseError`] describing the first problem found: unknown
/// operators or functions, unbalanced parentheses, unterminated literals, or
/// `and`/`or` mixed within one group.
pub fn parse_with(input: &str, config: &FilterConfig) -> Result<Predicate, ParseError> {
    let tokens = Lexer::tokenize(input)?;
    grammar::Parser::new(input, &tokens, *config).parse_filter()
}

impl FromStr for Predicate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
