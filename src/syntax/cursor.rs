use crate::errors::{Error, ErrorKind};
use crate::syntax::{Position, Span};

/// A position over the pattern text.
///
/// Cheap to copy, so the parser can save one and come back to it when a term
/// has to be read again.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'a> {
    pattern: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(pattern: &'a str) -> Cursor<'a> {
        Cursor { pattern, pos: 0 }
    }

    pub fn position(&self) -> Position {
        Position::new(self.pos)
    }

    /// The code point under the cursor, `None` at the end of the pattern.
    pub fn curr(&self) -> Option<char> {
        self.pattern[self.pos..].chars().next()
    }

    /// The code point after [`Cursor::curr`].
    pub fn peek(&self) -> Option<char> {
        let mut chars = self.pattern[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Step over the current code point and return the one after it.
    pub fn next_ch(&mut self) -> Option<char> {
        if let Some(c) = self.curr() {
            self.pos += c.len_utf8();
        }
        self.curr()
    }

    /// Step over `s` if the pattern continues with it.
    pub fn consume(&mut self, s: &str) -> bool {
        if self.pattern[self.pos..].starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// The pattern text from `from` up to the cursor.
    pub fn slice(&self, from: Position) -> &'a str {
        &self.pattern[from.offset..self.pos]
    }

    /// Read the raw text between `open`, which must start at the cursor, and
    /// the nearest following `close`. The cursor ends up past `close`.
    pub fn literal(&mut self, open: &str, close: &'static str) -> Result<&'a str, Error> {
        let start = self.position();
        if !self.consume(open) {
            return Err(match self.curr() {
                Some(c) => self.error(ErrorKind::UnexpectedToken(c)),
                None => self.error(ErrorKind::UnexpectedEof),
            });
        }

        let rest = &self.pattern[self.pos..];
        match rest.find(close) {
            Some(len) => {
                let literal = &rest[..len];
                self.pos += len + close.len();
                Ok(literal)
            }
            None => {
                self.pos = self.pattern.len();
                Err(self.error_from(
                    start,
                    ErrorKind::UnterminatedLiteral { delimiter: close },
                ))
            }
        }
    }

    pub fn error(&self, kind: ErrorKind) -> Error {
        Error::new(kind, self.pattern, Span::point(self.position()))
    }

    /// An error covering the pattern from `start` up to the cursor.
    pub fn error_from(&self, start: Position, kind: ErrorKind) -> Error {
        Error::new(kind, self.pattern, Span::new(start, self.position()))
    }
}
