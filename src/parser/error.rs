use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Reasons a filter string cannot be turned into a predicate
#[derive(Debug, Clone, Diagnostic, Error)]
pub enum ParseError {
    #[error("Filter expression is empty")]
    #[diagnostic(code(filter::empty), help("Write at least one condition, e.g. `age gt 21`"))]
    Empty,

    #[error("Unterminated string literal")]
    #[diagnostic(
        code(filter::unterminated_string),
        help("Close the literal with ' and write an embedded quote as ''")
    )]
    UnterminatedString {
        #[source_code]
        src: String,
        #[label("missing closing quote")]
        span: SourceSpan,
    },

    #[error("Unexpected {found}, expected {expected}")]
    #[diagnostic(code(filter::unexpected_token))]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        #[source_code]
        src: String,
        #[label("unexpected {found}")]
        span: SourceSpan,
    },

    #[error("Unexpected end of filter, expected {expected}")]
    #[diagnostic(code(filter::unexpected_end))]
    UnexpectedEnd {
        expected: &'static str,
        #[source_code]
        src: String,
        #[label("input ends here")]
        span: SourceSpan,
    },

    #[error("Unknown operator: {operator}")]
    #[diagnostic(
        code(filter::unknown_operator),
        help("Valid operators: eq, ne, gt, ge, lt, le (lowercase)")
    )]
    UnknownOperator {
        operator: String,
        #[source_code]
        src: String,
        #[label("unknown operator")]
        span: SourceSpan,
    },

    #[error("Unknown function: {function}")]
    #[diagnostic(code(filter::unknown_function))]
    UnknownFunction {
        function: String,
        #[source_code]
        src: String,
        #[label("unknown function")]
        span: SourceSpan,
        #[help]
        help: Option<String>,
    },

    #[error("Cannot mix 'and' and 'or' in the same group")]
    #[diagnostic(
        code(filter::mixed_operators),
        help("Add parentheses to make the precedence explicit")
    )]
    MixedOperators {
        #[source_code]
        src: String,
        #[label("group joined with this")]
        first: SourceSpan,
        #[label("conflicts with this")]
        second: SourceSpan,
    },

    #[error("Unclosed parenthesis")]
    #[diagnostic(code(filter::unclosed_parenthesis))]
    UnclosedParenthesis {
        #[source_code]
        src: String,
        #[label("opened here")]
        span: SourceSpan,
    },

    #[error("Unmatched closing parenthesis")]
    #[diagnostic(code(filter::unmatched_parenthesis))]
    UnmatchedParenthesis {
        #[source_code]
        src: String,
        #[label("no matching '('")]
        span: SourceSpan,
    },

    #[error("Filter nests deeper than {limit} levels")]
    #[diagnostic(code(filter::too_deep))]
    TooDeep {
        limit: usize,
        #[source_code]
        src: String,
        #[label("limit exceeded here")]
        span: SourceSpan,
    },
}

impl ParseError {
    /// Byte offset and length of the primary label, if any
    pub fn location(&self) -> Option<(usize, usize)> {
        let span = match self {
            ParseError::Empty => return None,
            ParseError::UnterminatedString { span, .. }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEnd { span, .. }
            | ParseError::UnknownOperator { span, .. }
            | ParseError::UnknownFunction { span, .. }
            | ParseError::UnclosedParenthesis { span, .. }
            | ParseError::UnmatchedParenthesis { span, .. }
            | ParseError::TooDeep { span, .. } => span,
            ParseError::MixedOperators { second, .. } => second,
        };
        Some((span.offset(), span.len()))
    }
}
