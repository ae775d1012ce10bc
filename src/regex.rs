use bon::bon;

use crate::automata::program::Program;
use crate::errors::Error;
use crate::executor::Executor;
use crate::syntax::{parser, Flags};

/// A compiled regular expression.
///
/// Patterns are unanchored: a match may start and end anywhere in the
/// input. Among the matches starting at the leftmost possible offset, the one
/// the pattern prefers wins, i.e. earlier alternatives and the greedy or
/// lazy bias of each quantifier decide.
///
/// A `Regex` never changes after it is built, so it can be shared between
/// threads and queried concurrently.
///
/// ```
/// let re = sre::parse(r"(\d{4})-(\d{2})").unwrap();
/// assert_eq!(vec!["2011-04", "2011"], re.extract("on 2011-04-01", 2 + 1));
/// ```
#[derive(Clone, Debug)]
pub struct Regex {
    program: Program,
}

#[bon]
impl Regex {
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        Self::builder().build(pattern)
    }

    /// Configure the flags a pattern starts out with. Inline flags such as
    /// `(?-i)` still override them.
    ///
    /// ```
    /// let re = sre::Regex::builder().case_insensitive(true).build("abc").unwrap();
    /// assert!(re.is_match("xABCx"));
    /// ```
    #[builder(finish_fn = build)]
    pub fn builder(
        #[builder(finish_fn)] pattern: &str,
        /// `i`: letters match both their lower and upper case forms.
        #[builder(default)]
        case_insensitive: bool,
        /// `s`: `.` also matches `\n`.
        #[builder(default)]
        dot_matches_new_line: bool,
        /// `m`: `^` and `$` also match at line boundaries.
        #[builder(default)]
        multi_line: bool,
        /// `U`: quantifiers are lazy unless followed by `?`.
        #[builder(default)]
        swap_greed: bool,
    ) -> Result<Regex, Error> {
        let flags = Flags::default()
            .with(Flags::CASE_INSENSITIVE, case_insensitive)
            .with(Flags::DOT_ALL, dot_matches_new_line)
            .with(Flags::MULTI_LINE, multi_line)
            .with(Flags::SWAP_GREED, swap_greed);
        let program = parser::parse(pattern, flags)?;
        Ok(Regex { program })
    }

    /// Number of capturing groups, not counting the whole match.
    pub fn num_subexps(&self) -> usize {
        self.program.caps - 1
    }

    pub fn is_match(&self, input: &str) -> bool {
        Executor::new(&self.program).matches(input)
    }

    /// Byte offsets of the leftmost-first match: start and end of the whole
    /// match, then of every group in order. A group that took no part in the
    /// match is `None`.
    pub fn match_index(&self, input: &str) -> Option<Vec<Option<usize>>> {
        Executor::new(&self.program).captures(input)
    }

    /// The whole match followed by the text of each group, `max` entries at
    /// most and never more than there are groups. A group that took no part
    /// in the match yields an empty string.
    ///
    /// Empty if nothing matches or `max < 2`.
    pub fn extract(&self, input: &str, max: usize) -> Vec<String> {
        if max < 2 {
            return vec![];
        }
        let slots = match self.match_index(input) {
            Some(slots) => slots,
            None => return vec![],
        };
        slots
            .chunks(2)
            .take(max - 1)
            .map(|pair| match (pair[0], pair[1]) {
                (Some(start), Some(end)) => input[start..end].to_string(),
                _ => String::new(),
            })
            .collect()
    }

    /// Names given with `(?P<name>…)`, by group index. Index 0 is the whole
    /// match and never named.
    pub fn capture_names(&self) -> Vec<Option<&str>> {
        self.program.capture_names()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Dump every instruction to stderr.
    pub fn debug_out(&self) {
        eprint!("{}", self.program);
    }
}

/// Compile `pattern` with no flags set.
pub fn parse(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern)
}

/// Like [`parse`], but panics if the pattern does not compile. Meant for
/// patterns fixed in the source.
pub fn must_parse(pattern: &str) -> Regex {
    parse(pattern).unwrap_or_else(|err| panic!("{}", err))
}
