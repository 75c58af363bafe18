//! Recursive descent over the token stream.
//!
//! ```text
//! filter    := expr EOF
//! expr      := operand ( connective operand )*
//! operand   := "(" expr ")" | condition
//! condition := word op literal
//!            | func "(" word "," literal ")"
//!            | "substringof" "(" literal "," word ")"
//! ```
//!
//! Each `expr` level uses a single connective; mixing `and` and `or` without
//! parentheses is rejected instead of guessing a precedence.

use miette::SourceSpan;

use super::error::ParseError;
use super::lexer::{Token, TokenKind};
use crate::config::{Dialect, FilterConfig};
use crate::predicate::{
    CompareOperator, Comparison, Condition, Group, GroupOperator, Literal, Predicate, TextFunction,
};

pub struct Parser<'s, 't> {
    source: &'s str,
    tokens: &'t [Token<'s>],
    pos: usize,
    depth: usize,
    config: FilterConfig,
}

impl<'s, 't> Parser<'s, 't> {
    pub fn new(source: &'s str, tokens: &'t [Token<'s>], config: FilterConfig) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            depth: 0,
            config,
        }
    }

    /// Parse the complete token stream into one predicate
    pub fn parse_filter(&mut self) -> Result<Predicate, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::Empty);
        }

        let predicate = self.parse_expr()?;

        match self.peek() {
            None => Ok(predicate),
            Some(token) if token.kind == TokenKind::RParen => {
                Err(ParseError::UnmatchedParenthesis {
                    src: self.source.to_string(),
                    span: token.source_span(),
                })
            }
            Some(token) => Err(self.unexpected(token, "'and' or 'or'")),
        }
    }

    fn peek(&self) -> Option<&'t Token<'s>> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'t Token<'s>> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn end_span(&self) -> SourceSpan {
        (self.source.len(), 0).into()
    }

    fn unexpected(&self, token: &Token<'_>, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            found: token.kind.describe(),
            expected,
            src: self.source.to_string(),
            span: token.source_span(),
        }
    }

    fn unexpected_end(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedEnd {
            expected,
            src: self.source.to_string(),
            span: self.end_span(),
        }
    }

    /// Next token, failing with `expected` at end of input
    fn expect_any(&mut self, expected: &'static str) -> Result<&'t Token<'s>, ParseError> {
        match self.advance() {
            Some(token) => Ok(token),
            None => Err(self.unexpected_end(expected)),
        }
    }

    fn expect(&mut self, kind: TokenKind<'static>, expected: &'static str) -> Result<(), ParseError> {
        let token = self.expect_any(expected)?;
        if token.kind == kind {
            Ok(())
        } else {
            Err(self.unexpected(token, expected))
        }
    }

    fn connective(&self) -> Option<(GroupOperator, &'t Token<'s>)> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::Word(w) => GroupOperator::from_keyword(w).map(|op| (op, token)),
            _ => None,
        }
    }

    fn parse_expr(&mut self) -> Result<Predicate, ParseError> {
        let mut children = vec![self.parse_operand()?];
        let mut joined_by: Option<(GroupOperator, &'t Token<'s>)> = None;

        while let Some((op, token)) = self.connective() {
            if let Some((first_op, first)) = joined_by {
                if first_op != op {
                    return Err(ParseError::MixedOperators {
                        src: self.source.to_string(),
                        first: first.source_span(),
                        second: token.source_span(),
                    });
                }
            } else {
                joined_by = Some((op, token));
            }
            self.pos += 1;
            children.push(self.parse_operand()?);
        }

        match joined_by {
            Some((op, _)) => Ok(Predicate::Group(Group::new(op, children))),
            None => Ok(children.remove(0)),
        }
    }

    fn parse_operand(&mut self) -> Result<Predicate, ParseError> {
        let token = self.expect_any("a condition or '('")?;
        match &token.kind {
            TokenKind::LParen => self.parse_parenthesized(token),
            TokenKind::Word(word) => self.parse_condition(*word, token),
            _ => Err(self.unexpected(token, "a condition or '('")),
        }
    }

    fn parse_parenthesized(&mut self, open: &'t Token<'s>) -> Result<Predicate, ParseError> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.config.max_depth,
                src: self.source.to_string(),
                span: open.source_span(),
            });
        }

        let inner = self.parse_expr()?;

        match self.advance() {
            Some(token) if token.kind == TokenKind::RParen => {}
            Some(token) => return Err(self.unexpected(token, "')'")),
            None => {
                return Err(ParseError::UnclosedParenthesis {
                    src: self.source.to_string(),
                    span: open.source_span(),
                })
            }
        }
        self.depth -= 1;

        // keep the parentheses of `(cond)` so rendering reproduces them
        Ok(match inner {
            group @ Predicate::Group(_) => group,
            condition => Predicate::Group(Group::new(GroupOperator::And, vec![condition])),
        })
    }

    fn parse_condition(&mut self, word: &'s str, token: &'t Token<'s>) -> Result<Predicate, ParseError> {
        if matches!(self.peek(), Some(next) if next.kind == TokenKind::LParen) {
            return self.parse_function(word, token);
        }

        let op_token = self.expect_any("a comparison operator")?;
        let operator = match &op_token.kind {
            TokenKind::Word(w) => {
                CompareOperator::from_keyword(w).ok_or_else(|| ParseError::UnknownOperator {
                    operator: w.to_string(),
                    src: self.source.to_string(),
                    span: op_token.source_span(),
                })?
            }
            _ => return Err(self.unexpected(op_token, "a comparison operator")),
        };

        let value = self.parse_literal()?;

        Ok(Predicate::Condition(Condition::new(
            word,
            Comparison::Compare { operator, value },
        )))
    }

    fn parse_literal(&mut self) -> Result<Literal, ParseError> {
        let token = self.expect_any("a value")?;
        match &token.kind {
            TokenKind::Quoted(s) => Ok(Literal::String(s.clone())),
            TokenKind::Word(w) => Ok(Literal::from_bare(w)),
            _ => Err(self.unexpected(token, "a value")),
        }
    }

    /// Text-function values are always strings; a bare word is taken verbatim
    fn parse_text_value(&mut self) -> Result<String, ParseError> {
        let token = self.expect_any("a string value")?;
        match &token.kind {
            TokenKind::Quoted(s) => Ok(s.clone()),
            TokenKind::Word(w) => Ok(w.to_string()),
            _ => Err(self.unexpected(token, "a string value")),
        }
    }

    fn parse_property(&mut self) -> Result<&'s str, ParseError> {
        let token = self.expect_any("a property name")?;
        match token.kind {
            TokenKind::Word(w) => Ok(w),
            _ => Err(self.unexpected(token, "a property name")),
        }
    }

    fn parse_function(&mut self, name: &'s str, token: &'t Token<'s>) -> Result<Predicate, ParseError> {
        let dialect = self.config.dialect;
        let function = match (name, dialect) {
            ("startswith", _) => TextFunction::StartsWith,
            ("endswith", _) => TextFunction::EndsWith,
            ("contains", Dialect::V4) | ("substringof", Dialect::V2) => TextFunction::Contains,
            _ => {
                let help = match name {
                    "contains" | "substringof" => Some(format!(
                        "The {:?} dialect spells this function `{}`",
                        dialect,
                        dialect.contains_function()
                    )),
                    _ => Some(format!(
                        "Valid functions: {}, startswith, endswith",
                        dialect.contains_function()
                    )),
                };
                return Err(ParseError::UnknownFunction {
                    function: name.to_string(),
                    src: self.source.to_string(),
                    span: token.source_span(),
                    help,
                });
            }
        };

        self.expect(TokenKind::LParen, "'('")?;
        let (property, value) = if name == "substringof" {
            let value = self.parse_text_value()?;
            self.expect(TokenKind::Comma, "','")?;
            (self.parse_property()?, value)
        } else {
            let property = self.parse_property()?;
            self.expect(TokenKind::Comma, "','")?;
            (property, self.parse_text_value()?)
        };
        self.expect(TokenKind::RParen, "')'")?;

        Ok(Predicate::Condition(Condition::new(
            property,
            Comparison::Text { function, value },
        )))
    }
}
