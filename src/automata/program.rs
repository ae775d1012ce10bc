use std::fmt;

use crate::class::{tables, Filter};

pub type InstPtr = usize;

/// Zero-width assertion between the code point left of the current offset
/// and the one right of it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Boundary {
    /// Beginning of text.
    BeginText,
    /// Beginning of text or line.
    BeginLine,
    /// End of text.
    EndText,
    /// End of text or line.
    EndLine,
    /// ASCII word boundary.
    WordBoundary,
    NotWordBoundary,
}

impl Boundary {
    /// `None` stands for the outside of the text on either edge.
    pub fn matches(self, left: Option<char>, right: Option<char>) -> bool {
        match self {
            Boundary::BeginText => left.is_none(),
            Boundary::BeginLine => matches!(left, None | Some('\n')),
            Boundary::EndText => right.is_none(),
            Boundary::EndLine => matches!(right, None | Some('\n')),
            Boundary::WordBoundary | Boundary::NotWordBoundary => {
                let word = |c: Option<char>| c.map_or(false, tables::is_word);
                let at_boundary = word(left) != word(right);
                at_boundary == (self == Boundary::WordBoundary)
            }
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InstKind {
    /// Proceed down `out`, then `out1`.
    Split,
    /// Record the current offset in slot `cid`; group `k` owns slots `2k`
    /// and `2k + 1`.
    Capture { cid: usize, name: Option<String> },
    Boundary(Boundary),
    /// Consume one code point if the filter accepts it.
    CodePoint(Filter),
    Match,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Inst {
    pub idx: InstPtr,
    pub kind: InstKind,
    pub out: Option<InstPtr>,
    /// Alternate path, only ever set on `Split`.
    pub out1: Option<InstPtr>,
}

impl Inst {
    pub fn new(idx: InstPtr, kind: InstKind) -> Inst {
        Inst {
            idx,
            kind,
            out: None,
            out1: None,
        }
    }

    pub fn is_split(&self) -> bool {
        self.kind == InstKind::Split
    }

    pub fn edges(&self) -> impl Iterator<Item = InstPtr> {
        self.out.into_iter().chain(self.out1)
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}", self.idx)?;
        match &self.kind {
            InstKind::Split => write!(f, " Split")?,
            InstKind::Capture { cid, name } => {
                write!(f, " Capture cid={}", cid)?;
                if let Some(name) = name {
                    write!(f, " name={}", name)?;
                }
            }
            InstKind::Boundary(b) => write!(f, " Boundary [{:?}]", b)?,
            InstKind::CodePoint(filter) => write!(f, " CodePoint {}", filter)?,
            InstKind::Match => write!(f, " Match")?,
        }
        if let Some(out) = self.out {
            write!(f, " out={}", out)?;
        }
        if let Some(out1) = self.out1 {
            write!(f, " out1={}", out1)?;
        }
        write!(f, "}}")
    }
}

/// A compiled pattern: a flat list of instructions whose edges are indices
/// into the same list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Program {
    pub insts: Vec<Inst>,
    pub start: InstPtr,
    /// Number of paired groups, including the implicit one around the whole
    /// match.
    pub caps: usize,
}

impl Program {
    pub fn len(&self) -> usize {
        self.insts.len()
    }

    pub fn slots(&self) -> usize {
        self.caps * 2
    }

    /// Group names by group index. Group 0 is never named.
    pub fn capture_names(&self) -> Vec<Option<&str>> {
        let mut names = vec![None; self.caps];
        for inst in &self.insts {
            if let InstKind::Capture {
                cid,
                name: Some(name),
            } = &inst.kind
            {
                names[cid / 2] = Some(name.as_str());
            }
        }
        names
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for inst in &self.insts {
            writeln!(f, "{} {}", inst.idx, inst)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Boundary, Inst, InstKind};
    use crate::class::Filter;
    use pretty_assertions::assert_eq;

    #[test]
    fn boundaries() {
        assert_eq!(true, Boundary::BeginText.matches(None, Some('a')));
        assert_eq!(false, Boundary::BeginText.matches(Some('\n'), Some('a')));
        assert_eq!(true, Boundary::BeginLine.matches(Some('\n'), Some('a')));
        assert_eq!(true, Boundary::EndText.matches(Some('a'), None));
        assert_eq!(false, Boundary::EndText.matches(Some('a'), Some('\n')));
        assert_eq!(true, Boundary::EndLine.matches(Some('a'), Some('\n')));

        assert_eq!(true, Boundary::WordBoundary.matches(None, Some('c')));
        assert_eq!(true, Boundary::WordBoundary.matches(Some('t'), Some(' ')));
        assert_eq!(false, Boundary::WordBoundary.matches(Some('n'), Some('c')));
        assert_eq!(false, Boundary::WordBoundary.matches(None, None));
        assert_eq!(true, Boundary::NotWordBoundary.matches(Some('n'), Some('c')));
        assert_eq!(false, Boundary::NotWordBoundary.matches(Some(' '), Some('c')));
    }

    #[test]
    fn display() {
        let mut i = Inst::new(3, InstKind::Split);
        i.out = Some(4);
        i.out1 = Some(7);
        assert_eq!("{3 Split out=4 out1=7}", i.to_string());

        let mut i = Inst::new(
            5,
            InstKind::Capture {
                cid: 2,
                name: Some("year".to_string()),
            },
        );
        i.out = Some(6);
        assert_eq!("{5 Capture cid=2 name=year out=6}", i.to_string());

        let i = Inst::new(9, InstKind::CodePoint(Filter::literal('a')));
        assert_eq!("{9 CodePoint 'a'}", i.to_string());
    }
}
