//! Predicates over single code points.
//!
//! A [`Filter`] is built once by the parser and never changes afterwards.
//! Classes compose from literals, ranges and tables through union, negation
//! and case folding.

use std::{borrow::Cow, fmt};

pub(crate) mod tables;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Filter {
    /// Every code point.
    Any,
    Literal(char),
    /// Inclusive, `lo <= hi`.
    Range(char, char),
    /// Sorted, non-overlapping inclusive ranges.
    Table(Cow<'static, [(char, char)]>),
    Union(Vec<Filter>),
    Negate(Box<Filter>),
    /// Matches when the lower or upper case form of a code point matches.
    IgnoreCase(Box<Filter>),
}

impl Filter {
    pub fn literal(c: char) -> Filter {
        Filter::Literal(c)
    }

    pub fn range(lo: char, hi: char) -> Filter {
        debug_assert!(lo <= hi, "range {:?}-{:?} is inverted", lo, hi);
        Filter::Range(lo, hi)
    }

    /// Every code point except `\n`.
    pub fn any_but_newline() -> Filter {
        Filter::literal('\n').negate()
    }

    /// Resolve a Unicode category, script or property name. `None` if no
    /// table is known by that name.
    pub fn named(name: &str) -> Option<Filter> {
        tables::unicode(name).map(|ranges| Filter::Table(Cow::Owned(ranges)))
    }

    pub fn posix(name: &str) -> Option<Filter> {
        tables::posix(name).map(|table| Filter::Table(Cow::Borrowed(table)))
    }

    pub fn perl(letter: char) -> Option<Filter> {
        tables::perl(letter).map(|table| Filter::Table(Cow::Borrowed(table)))
    }

    pub fn negate(self) -> Filter {
        match self {
            Filter::Negate(inner) => *inner,
            other => Filter::Negate(Box::new(other)),
        }
    }

    pub fn ignore_case(self) -> Filter {
        match self {
            f @ Filter::IgnoreCase(_) => f,
            other => Filter::IgnoreCase(Box::new(other)),
        }
    }

    pub fn matches(&self, c: char) -> bool {
        match self {
            Filter::Any => true,
            Filter::Literal(l) => *l == c,
            Filter::Range(lo, hi) => *lo <= c && c <= *hi,
            Filter::Table(table) => tables::contains(table, c),
            Filter::Union(filters) => filters.iter().any(|f| f.matches(c)),
            Filter::Negate(inner) => !inner.matches(c),
            Filter::IgnoreCase(inner) => inner.matches(to_lower(c)) || inner.matches(to_upper(c)),
        }
    }
}

fn to_lower(c: char) -> char {
    single(c.to_lowercase()).unwrap_or(c)
}

fn to_upper(c: char) -> char {
    single(c.to_uppercase()).unwrap_or(c)
}

// Only one-to-one case mappings apply: 'ß' has no single upper case form.
fn single(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    match (mapped.next(), mapped.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Any => write!(f, "any"),
            Filter::Literal(c) => write!(f, "{:?}", c),
            Filter::Range(lo, hi) => write!(f, "{:?}-{:?}", lo, hi),
            Filter::Table(table) => write!(f, "table({} ranges)", table.len()),
            Filter::Union(filters) => {
                write!(f, "[")?;
                for (i, filter) in filters.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", filter)?;
                }
                write!(f, "]")
            }
            Filter::Negate(inner) => write!(f, "!{}", inner),
            Filter::IgnoreCase(inner) => write!(f, "(?i){}", inner),
        }
    }
}
