use std::fmt;

pub(crate) mod cursor;
pub(crate) mod parser;

/// A byte offset into the pattern.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Position {
    pub offset: usize,
}
impl Position {
    pub fn new(offset: usize) -> Position {
        Position { offset }
    }
}

/// The byte range of the pattern an error refers to.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn point(pos: Position) -> Span {
        Span {
            start: pos,
            end: pos,
        }
    }

    pub(crate) fn new(start: Position, end: Position) -> Span {
        Span { start, end }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({:?}, {:?})", self.start, self.end)
    }
}

/// On/off state for the single-letter flags in code points 64..=127, one bit
/// per letter.
#[derive(Clone, Copy, Default, Eq, PartialEq, Debug)]
pub(crate) struct Flags(u64);

impl Flags {
    pub const CASE_INSENSITIVE: char = 'i';
    pub const DOT_ALL: char = 's';
    pub const MULTI_LINE: char = 'm';
    pub const SWAP_GREED: char = 'U';

    /// Whether `flag` can be stored at all.
    pub fn in_range(flag: char) -> bool {
        ('\u{40}'..='\u{7f}').contains(&flag)
    }

    pub fn get(self, flag: char) -> bool {
        self.0 & Self::bit(flag) != 0
    }

    pub fn set(&mut self, flag: char, on: bool) {
        if on {
            self.0 |= Self::bit(flag);
        } else {
            self.0 &= !Self::bit(flag);
        }
    }

    pub fn with(mut self, flag: char, on: bool) -> Flags {
        self.set(flag, on);
        self
    }

    fn bit(flag: char) -> u64 {
        assert!(
            Flags::in_range(flag),
            "flag out of range: {:?}",
            flag
        );
        1 << (flag as u32 - 0x40)
    }
}

/// Flags in effect while parsing, scoped by group.
///
/// Entering a group pushes the flags it starts with, leaving it pops them,
/// so whatever a nested group changes never leaks into its parent. A bare
/// `(?flags)` rewrites the innermost scope in place.
#[derive(Debug)]
pub(crate) struct FlagStack {
    outer: Flags,
    scopes: Vec<Flags>,
}

impl FlagStack {
    pub fn new(initial: Flags) -> FlagStack {
        FlagStack {
            outer: initial,
            scopes: vec![],
        }
    }

    pub fn current(&self) -> Flags {
        *self.scopes.last().unwrap_or(&self.outer)
    }

    pub fn replace(&mut self, flags: Flags) {
        match self.scopes.last_mut() {
            Some(top) => *top = flags,
            None => self.outer = flags,
        }
    }

    pub fn push(&mut self, flags: Flags) {
        self.scopes.push(flags);
    }

    pub fn pop(&mut self) {
        let popped = self.scopes.pop();
        assert!(popped.is_some(), "popped the outermost flag scope");
    }
}
