use thiserror::Error;

use crate::syntax::Span;

/// A pattern that could not be compiled.
///
/// Carries what went wrong, the pattern itself and where in the pattern the
/// parser stopped.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("could not parse `{pattern}` at offset {}: {kind}", .span.start.offset)]
pub struct Error {
    kind: ErrorKind,
    pattern: String,
    span: Span,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, pattern: &str, span: Span) -> Error {
        Error {
            kind,
            pattern: pattern.to_string(),
            span,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ErrorKind {
    /// `\Q…\E`, `[:…:]`, `[…]`, `{…}`, `\x{…}` or `(?P<…>` without its
    /// closing delimiter.
    #[error("unterminated literal, expected `{delimiter}`")]
    UnterminatedLiteral { delimiter: &'static str },
    #[error("not a valid escape sequence")]
    InvalidEscape,
    #[error("could not identify class: {0}")]
    UnknownClass(String),
    #[error("unexpected range: {lo:?} > {hi:?}")]
    InvalidRange { lo: char, hi: char },
    #[error("can't match a range outside class: {lo}-{hi}")]
    RangeOutsideClass { lo: char, hi: char },
    #[error("can't match a [...] class within another class")]
    NestedBracket,
    #[error("invalid repetition range")]
    InvalidRepetitionRange,
    #[error("unexpected {0:?}")]
    UnexpectedToken(char),
    #[error("group is never closed")]
    UnclosedGroup,
    #[error("could not consume all of the pattern")]
    TrailingInput,
    #[error("unexpected end of pattern")]
    UnexpectedEof,
    #[error("flag not in range: {0:?}")]
    InvalidFlag(char),
}

#[cfg(test)]
mod test {
    use super::{Error, ErrorKind};
    use crate::syntax::{Position, Span};
    use pretty_assertions::assert_eq;

    #[test]
    fn display() {
        let err = Error::new(
            ErrorKind::UnclosedGroup,
            "a(b",
            Span::point(Position::new(3)),
        );
        assert_eq!(
            "could not parse `a(b` at offset 3: group is never closed",
            err.to_string()
        );

        let err = Error::new(
            ErrorKind::InvalidRange { lo: 'z', hi: 'a' },
            "[z-a]",
            Span::new(Position::new(1), Position::new(4)),
        );
        assert_eq!(
            "could not parse `[z-a]` at offset 1: unexpected range: 'z' > 'a'",
            err.to_string()
        );
    }
}
