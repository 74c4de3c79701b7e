// SPDX-License-Identifier: Apache-2.0

use crate::scanner::{Pos, Span};

/// Which stage of reading rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A byte sequence that does not form any token.
    Lexical,
    /// Tokens that do not follow the module/statement grammar.
    Syntax,
    /// A well-formed right-hand side that is not one of the accepted gate
    /// shapes.
    Pattern,
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorKind::Lexical => write!(f, "lexical"),
            ParseErrorKind::Syntax => write!(f, "syntax"),
            ParseErrorKind::Pattern => write!(f, "pattern"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParseErrorKind::Lexical, message, span)
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParseErrorKind::Syntax, message, span)
    }

    pub fn pattern(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParseErrorKind::Pattern, message, span)
    }

    /// Syntax error for input that ended while `expected` was still pending.
    pub fn unexpected_eof(expected: &str, pos: Pos) -> Self {
        Self::syntax(
            format!("unexpected end of input, {}", expected),
            Span::at(pos),
        )
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} error: {} @ {}",
            self.kind,
            self.message,
            self.span.to_human_string()
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_span() {
        let span = Span {
            start: Pos { lineno: 3, colno: 5 },
            limit: Pos { lineno: 3, colno: 9 },
        };
        let e = ParseError::pattern("unsupported expression shape", span);
        assert_eq!(
            e.to_string(),
            "pattern error: unsupported expression shape @ 3:5..3:9"
        );
    }

    #[test]
    fn test_unexpected_eof_is_syntax_error() {
        let e = ParseError::unexpected_eof("expected ';'", Pos { lineno: 7, colno: 1 });
        assert_eq!(e.kind, ParseErrorKind::Syntax);
        assert_eq!(e.span.start, e.span.limit);
        assert!(e.message.contains("expected ';'"));
    }
}
