//! Character-class scanner for filter strings

use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;

use miette::SourceSpan;

use super::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'a> {
    LParen,
    RParen,
    Comma,
    /// bare run of characters: property paths, operators, keywords, unquoted values
    Word(&'a str),
    /// single-quoted literal with the quotes stripped and `''` unescaped
    Quoted(String),
}

impl TokenKind<'_> {
    /// How the token is named in error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Word(w) => format!("'{}'", w),
            TokenKind::Quoted(s) => format!("string '{}'", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub span: Range<usize>,
}

impl Token<'_> {
    pub fn source_span(&self) -> SourceSpan {
        (self.span.start, self.span.end - self.span.start).into()
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Scan the whole input
    pub fn tokenize(input: &'a str) -> Result<Vec<Token<'a>>, ParseError> {
        let mut lexer = Self::new(input);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn skip_whitespace(&mut self) {
        while let Some((_, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        self.skip_whitespace();

        let (start, ch) = match self.chars.next() {
            Some(next) => next,
            None => return Ok(None),
        };

        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '\'' => {
                let (value, end) = self.read_quoted(start)?;
                return Ok(Some(Token {
                    kind: TokenKind::Quoted(value),
                    span: start..end,
                }));
            }
            _ => {
                let end = self.read_word(start + ch.len_utf8());
                return Ok(Some(Token {
                    kind: TokenKind::Word(&self.input[start..end]),
                    span: start..end,
                }));
            }
        };

        Ok(Some(Token {
            kind,
            span: start..start + 1,
        }))
    }

    fn read_word(&mut self, mut end: usize) -> usize {
        while let Some(&(idx, ch)) = self.chars.peek() {
            if is_word_char(ch) {
                end = idx + ch.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        end
    }

    /// Reads up to the closing quote; the opening quote at `start` is already consumed.
    /// Returns the unescaped contents and the byte offset after the closing quote.
    fn read_quoted(&mut self, start: usize) -> Result<(String, usize), ParseError> {
        let mut value = String::new();
        while let Some((idx, ch)) = self.chars.next() {
            if ch != '\'' {
                value.push(ch);
                continue;
            }
            // '' inside a literal is an escaped quote
            if let Some(&(_, '\'')) = self.chars.peek() {
                self.chars.next();
                value.push('\'');
                continue;
            }
            return Ok((value, idx + 1));
        }

        Err(ParseError::UnterminatedString {
            src: self.input.to_string(),
            span: (start, self.input.len() - start).into(),
        })
    }
}

fn is_word_char(ch: char) -> bool {
    !(ch.is_whitespace() || matches!(ch, '(' | ')' | ',' | '\''))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind<'_>> {
        Lexer::tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_infix_condition() {
        assert_eq!(
            kinds("prop.sub eq 'a b'"),
            vec![
                TokenKind::Word("prop.sub"),
                TokenKind::Word("eq"),
                TokenKind::Quoted("a b".into()),
            ]
        );
    }

    #[test]
    fn test_function_call() {
        assert_eq!(
            kinds("startswith(p,'x')"),
            vec![
                TokenKind::Word("startswith"),
                TokenKind::LParen,
                TokenKind::Word("p"),
                TokenKind::Comma,
                TokenKind::Quoted("x".into()),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_quoted_literal_keeps_punctuation() {
        assert_eq!(
            kinds("p eq 'a (b, c) and d'"),
            vec![
                TokenKind::Word("p"),
                TokenKind::Word("eq"),
                TokenKind::Quoted("a (b, c) and d".into()),
            ]
        );
    }

    #[test]
    fn test_escaped_quote() {
        assert_eq!(
            kinds("p eq 'O''Brien'"),
            vec![
                TokenKind::Word("p"),
                TokenKind::Word("eq"),
                TokenKind::Quoted("O'Brien".into()),
            ]
        );
        assert_eq!(kinds("''"), vec![TokenKind::Quoted(String::new())]);
    }

    #[test]
    fn test_spans() {
        let tokens = Lexer::tokenize("(a  eq 'é')").unwrap();
        let spans: Vec<_> = tokens.iter().map(|t| t.span.clone()).collect();
        assert_eq!(spans, vec![0..1, 1..2, 4..6, 7..11, 11..12]);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = Lexer::tokenize("p eq 'abc").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedString { .. }));
        assert_eq!(err.location(), Some((5, 4)));
    }

    #[test]
    fn test_whitespace_only() {
        assert!(kinds(" \t ").is_empty());
    }
}
