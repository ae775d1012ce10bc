//! A small regular expression engine.
//!
//! Patterns compile to a Thompson NFA that a Pike VM runs over the input, so
//! matching takes time linear in the input. Matches are unanchored and
//! leftmost-first, and report every capture group.
//!
//! ```
//! let re = sre::must_parse(r"(?P<user>\w+)@(\w+)\.com");
//! assert!(re.is_match("mail me@host.com"));
//! assert_eq!(vec!["me@host.com", "me", "host"], re.extract("mail me@host.com", 3));
//! ```
//!
//! The [`phonetic`] module builds Soundex and Caverphone codes on top of it.

mod automata;
mod class;
mod errors;
mod executor;
pub mod phonetic;
mod regex;
mod syntax;

pub use crate::automata::program::{Boundary, Inst, InstKind, InstPtr, Program};
pub use crate::class::Filter;
pub use crate::errors::{Error, ErrorKind};
pub use crate::regex::{must_parse, parse, Regex};
pub use crate::syntax::{Position, Span};
