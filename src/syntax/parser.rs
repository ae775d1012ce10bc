//! Recursive descent from pattern text straight to instructions.
//!
//! Grammar, loosely:
//!
//! ```text
//! alt     := regexp ('|' regexp)*
//! regexp  := closure*
//! closure := term quantifier?
//! term    := '(' group ')' | class | boundary | '\Q' raw '\E'
//! ```
//!
//! Every level hands back the first and last instruction of what it built,
//! so the caller can wire it into its own fragment.

use std::{mem, result};

use crate::{
    automata::{
        compiler::Compiler,
        program::{Boundary, InstKind, InstPtr, Program},
    },
    class::{tables, Filter},
    errors::{Error, ErrorKind},
    syntax::{cursor::Cursor, FlagStack, Flags},
};

type Result<T> = result::Result<T, Error>;

/// First and last instruction of a piece of the program.
type Frag = (InstPtr, InstPtr);

/// Parser state to rewind to before reading a repeated term again.
struct Saved<'a> {
    cursor: Cursor<'a>,
    caps: usize,
    flags: Flags,
}

pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    compiler: Compiler,
    flags: FlagStack,
}

/// Compile `pattern` inside an implicit `.*?(…).*?` frame, starting out with
/// `flags`.
pub(crate) fn parse(pattern: &str, flags: Flags) -> Result<Program> {
    log::debug!("compiling `{}`", pattern);
    let mut p = Parser::new(pattern, flags);

    // Comes first so that its head is instruction 0, the entry point.
    let (_, prefix) = p.compiler.dot_star_lazy();
    p.compiler
        .set_kind(prefix, InstKind::Capture { cid: 0, name: None });

    let (suffix, accept) = p.compiler.dot_star_lazy();
    p.compiler
        .set_kind(suffix, InstKind::Capture { cid: 1, name: None });
    p.compiler.set_kind(accept, InstKind::Match);

    let (start, end) = p.alt(None, false)?;
    if p.cursor.curr().is_some() {
        return Err(p.cursor.error(ErrorKind::TrailingInput));
    }
    p.compiler.connect(prefix, start);
    p.compiler.connect(end, suffix);

    Ok(p.compiler.finish())
}

impl<'a> Parser<'a> {
    fn new(pattern: &'a str, flags: Flags) -> Parser<'a> {
        Parser {
            cursor: Cursor::new(pattern),
            compiler: Compiler::new(),
            flags: FlagStack::new(flags),
        }
    }

    fn flag(&self, flag: char) -> bool {
        self.flags.current().get(flag)
    }

    /// `regexp ('|' regexp)*`, stopping on the `)` or end of pattern that
    /// closes it. The cursor is left on that terminator.
    fn alt(&mut self, name: Option<String>, capture: bool) -> Result<Frag> {
        let end = self.compiler.push_split();
        let begin = self.compiler.push_split();
        if capture {
            let cid = self.compiler.next_group();
            self.compiler.set_kind(
                begin,
                InstKind::Capture {
                    cid,
                    name: name.clone(),
                },
            );
            self.compiler
                .set_kind(end, InstKind::Capture { cid: cid + 1, name });
        }

        let (mut first, last) = self.regexp()?;
        self.compiler.connect(last, end);

        // Each further branch hangs off a new split whose primary edge keeps
        // the branches before it, so they win ties.
        while self.cursor.curr() == Some('|') {
            let split = self.compiler.push_split();
            self.compiler.connect(split, first);

            self.cursor.next_ch();
            let (b_start, b_end) = self.regexp()?;
            self.compiler.connect(split, b_start);
            self.compiler.connect(b_end, end);
            first = split;
        }

        self.compiler.connect(begin, first);
        Ok((begin, end))
    }

    /// `closure*` up to the end of pattern, `|` or `)`.
    fn regexp(&mut self) -> Result<Frag> {
        let start = self.compiler.push_split();
        let mut curr = start;
        while !matches!(self.cursor.curr(), None | Some('|') | Some(')')) {
            let (s, e) = self.closure()?;
            self.compiler.connect(curr, s);
            curr = e;
        }
        let end = self.compiler.push_split();
        self.compiler.connect(curr, end);
        Ok((start, end))
    }

    /// A term and its optional quantifier.
    ///
    /// Every repetition gets its own copy of the term, read again from the
    /// saved cursor. Copies reuse the same group ids, so a group repeated
    /// several times reports its last iteration.
    fn closure(&mut self) -> Result<Frag> {
        let saved = Saved {
            cursor: self.cursor,
            caps: self.compiler.caps(),
            flags: self.flags.current(),
        };

        let start = self.compiler.push_split();
        let mut end = start;
        let mut term = self.term()?;
        let mut pending = true;

        let mut greedy = !self.flag(Flags::SWAP_GREED);
        let (req, opt) = match self.cursor.curr() {
            Some('?') => {
                self.cursor.next_ch();
                (0, Some(1))
            }
            Some('*') => {
                self.cursor.next_ch();
                (0, None)
            }
            Some('+') => {
                self.cursor.next_ch();
                (1, None)
            }
            Some('{') => self.repetition()?,
            _ => return Ok(term),
        };
        if self.cursor.curr() == Some('?') {
            greedy = !greedy;
            self.cursor.next_ch();
        }
        let after = self.cursor;

        for _ in 0..req {
            if !mem::take(&mut pending) {
                term = self.reparse(&saved)?;
            }
            self.compiler.connect(end, term.0);
            end = term.1;
        }

        match opt {
            None => {
                let helper = self.compiler.push_split();
                self.compiler.connect(end, helper);
                if greedy {
                    self.compiler.set_out(helper, term.0);
                } else {
                    self.compiler.set_out1(helper, term.0);
                }
                if end != term.1 {
                    self.compiler.connect(term.1, helper);
                }
                end = helper;
            }
            Some(opt) => {
                let real_end = self.compiler.push_split();
                for _ in 0..opt {
                    if !mem::take(&mut pending) {
                        term = self.reparse(&saved)?;
                    }
                    let helper = self.compiler.push_split();
                    self.compiler.connect(end, helper);
                    if greedy {
                        self.compiler.set_out(helper, term.0);
                    } else {
                        self.compiler.set_out1(helper, term.0);
                    }
                    self.compiler.connect(helper, real_end);

                    end = self.compiler.push_split();
                    self.compiler.connect(term.1, end);
                }
                self.compiler.connect(end, real_end);
                end = real_end;
            }
        }

        self.cursor = after;
        Ok((start, end))
    }

    fn reparse(&mut self, saved: &Saved<'a>) -> Result<Frag> {
        self.cursor = saved.cursor;
        self.compiler.set_caps(saved.caps);
        self.flags.replace(saved.flags);
        self.term()
    }

    /// `{n}`, `{n,}` or `{n,m}` as (required, optional) counts, `None`
    /// optional meaning unbounded.
    fn repetition(&mut self) -> Result<(usize, Option<usize>)> {
        let start = self.cursor.position();
        let raw = self.cursor.literal("{", "}")?;

        let count = |digits: &str| {
            digits
                .parse::<usize>()
                .map_err(|_| self.cursor.error_from(start, ErrorKind::InvalidRepetitionRange))
        };
        let (req, opt) = match raw.split_once(',') {
            None => (count(raw)?, Some(0)),
            Some((min, "")) => (count(min)?, None),
            Some((min, max)) => {
                let (min, max) = (count(min)?, count(max)?);
                if max < min {
                    return Err(self
                        .cursor
                        .error_from(start, ErrorKind::InvalidRepetitionRange));
                }
                (min, Some(max - min))
            }
        };
        if req == 0 && opt == Some(0) {
            return Err(self
                .cursor
                .error_from(start, ErrorKind::InvalidRepetitionRange));
        }
        Ok((req, opt))
    }

    fn term(&mut self) -> Result<Frag> {
        let c = match self.cursor.curr() {
            Some(c) => c,
            None => return Err(self.cursor.error(ErrorKind::UnexpectedEof)),
        };
        match c {
            '*' | '+' | '?' | '{' | ')' | '}' | ']' => {
                Err(self.cursor.error(ErrorKind::UnexpectedToken(c)))
            }
            '(' => self.group(),
            '^' => {
                self.cursor.next_ch();
                Ok(self.boundary(if self.flag(Flags::MULTI_LINE) {
                    Boundary::BeginLine
                } else {
                    Boundary::BeginText
                }))
            }
            '$' => {
                self.cursor.next_ch();
                Ok(self.boundary(if self.flag(Flags::MULTI_LINE) {
                    Boundary::EndLine
                } else {
                    Boundary::EndText
                }))
            }
            '\\' => {
                let boundary = match self.cursor.peek() {
                    Some('Q') => return self.quoted(),
                    Some('A') => Boundary::BeginText,
                    Some('z') => Boundary::EndText,
                    Some('b') => Boundary::WordBoundary,
                    Some('B') => Boundary::NotWordBoundary,
                    _ => return self.code_point(),
                };
                self.cursor.next_ch();
                self.cursor.next_ch();
                Ok(self.boundary(boundary))
            }
            _ => self.code_point(),
        }
    }

    /// Everything after `(` up to and including the matching `)`.
    fn group(&mut self) -> Result<Frag> {
        let open = self.cursor.position();
        self.cursor.next_ch();

        let mut capture = true;
        let mut name = None;
        let mut flags = self.flags.current();
        if self.cursor.curr() == Some('?') {
            self.cursor.next_ch();
            if self.cursor.curr() == Some('P') {
                self.cursor.next_ch();
                name = Some(self.cursor.literal("<", ">")?.to_string());
            } else {
                capture = false;
                let mut on = true;
                loop {
                    match self.cursor.curr() {
                        None => {
                            return Err(self.cursor.error_from(open, ErrorKind::UnclosedGroup))
                        }
                        Some(':') => {
                            self.cursor.next_ch();
                            break;
                        }
                        // `(?flags)` changes the enclosing scope and matches
                        // nothing, but still leaves an instruction behind.
                        Some(')') => {
                            self.cursor.next_ch();
                            self.flags.replace(flags);
                            let noop = self.compiler.push_split();
                            return Ok((noop, noop));
                        }
                        Some('-') => on = false,
                        Some(flag) if Flags::in_range(flag) => flags.set(flag, on),
                        Some(flag) => return Err(self.cursor.error(ErrorKind::InvalidFlag(flag))),
                    }
                    self.cursor.next_ch();
                }
            }
        }

        self.flags.push(flags);
        let frag = self.alt(name, capture);
        self.flags.pop();
        let frag = frag?;

        if self.cursor.curr() != Some(')') {
            return Err(self.cursor.error_from(open, ErrorKind::UnclosedGroup));
        }
        self.cursor.next_ch();
        Ok(frag)
    }

    fn boundary(&mut self, boundary: Boundary) -> Frag {
        let pc = self.compiler.push(InstKind::Boundary(boundary));
        (pc, pc)
    }

    /// `\Q…\E`, one instruction per code point.
    fn quoted(&mut self) -> Result<Frag> {
        let literal = self.cursor.literal(r"\Q", r"\E")?;
        let fold = self.flag(Flags::CASE_INSENSITIVE);

        let start = self.compiler.push_split();
        let mut end = start;
        for c in literal.chars() {
            let mut filter = Filter::literal(c);
            if fold {
                filter = filter.ignore_case();
            }
            let pc = self.compiler.push(InstKind::CodePoint(filter));
            self.compiler.connect(end, pc);
            end = pc;
        }
        Ok((start, end))
    }

    fn code_point(&mut self) -> Result<Frag> {
        let mut filter = self.class(false)?;
        if self.flag(Flags::CASE_INSENSITIVE) {
            filter = filter.ignore_case();
        }
        let pc = self.compiler.push(InstKind::CodePoint(filter));
        Ok((pc, pc))
    }

    /// One class: `.`, `[…]`, `[:name:]`, `\p…`, a Perl class, a single code
    /// point or, `within` a bracket, a range.
    fn class(&mut self, within: bool) -> Result<Filter> {
        let start = self.cursor.position();
        let (filter, negate) = match (self.cursor.curr(), self.cursor.peek()) {
            (Some('.'), _) => {
                self.cursor.next_ch();
                let filter = if self.flag(Flags::DOT_ALL) {
                    Filter::Any
                } else {
                    Filter::any_but_newline()
                };
                (filter, false)
            }
            (Some('['), Some(':')) => {
                let name = self.cursor.literal("[:", ":]")?;
                let (negate, name) = match name.strip_prefix('^') {
                    Some(name) => (true, name),
                    None => (false, name),
                };
                let filter = Filter::posix(name).ok_or_else(|| {
                    self.cursor
                        .error_from(start, ErrorKind::UnknownClass(name.to_string()))
                })?;
                (filter, negate)
            }
            (Some('['), _) => {
                if within {
                    return Err(self.cursor.error(ErrorKind::NestedBracket));
                }
                self.bracket()?
            }
            (Some('\\'), Some(p @ ('p' | 'P'))) => {
                self.cursor.next_ch();
                let name = match self.cursor.next_ch() {
                    Some('{') => self.cursor.literal("{", "}")?,
                    Some(_) => {
                        let from = self.cursor.position();
                        self.cursor.next_ch();
                        self.cursor.slice(from)
                    }
                    None => return Err(self.cursor.error(ErrorKind::UnexpectedEof)),
                };
                let filter = Filter::named(name).ok_or_else(|| {
                    self.cursor
                        .error_from(start, ErrorKind::UnknownClass(name.to_string()))
                })?;
                (filter, p == 'P')
            }
            (Some('\\'), Some(letter)) => match Filter::perl(letter.to_ascii_lowercase()) {
                Some(filter) => {
                    self.cursor.next_ch();
                    self.cursor.next_ch();
                    (filter, letter.is_ascii_uppercase())
                }
                None => (self.range(within)?, false),
            },
            _ => (self.range(within)?, false),
        };
        Ok(if negate { filter.negate() } else { filter })
    }

    /// `[…]` or `[^…]`, negation applying to the union of everything inside.
    fn bracket(&mut self) -> Result<(Filter, bool)> {
        let start = self.cursor.position();
        let mut negate = false;
        if self.cursor.next_ch() == Some('^') {
            negate = true;
            self.cursor.next_ch();
        }

        let mut filters = vec![];
        loop {
            match self.cursor.curr() {
                Some(']') => break,
                None => {
                    return Err(self
                        .cursor
                        .error_from(start, ErrorKind::UnterminatedLiteral { delimiter: "]" }))
                }
                Some(_) => filters.push(self.class(true)?),
            }
        }
        self.cursor.next_ch();
        Ok((Filter::Union(filters), negate))
    }

    /// A code point, or `lo-hi` inside a bracket. Right before the closing
    /// `]`, or at the end of the pattern, a `-` is left to be read as a
    /// literal.
    fn range(&mut self, within: bool) -> Result<Filter> {
        let start = self.cursor.position();
        let lo = self.single_rune()?;
        if self.cursor.curr() != Some('-') {
            return Ok(Filter::literal(lo));
        }
        match (within, self.cursor.peek()) {
            (false, None) | (true, Some(']')) => return Ok(Filter::literal(lo)),
            (false, Some(hi)) => {
                self.cursor.next_ch();
                self.cursor.next_ch();
                return Err(self
                    .cursor
                    .error_from(start, ErrorKind::RangeOutsideClass { lo, hi }));
            }
            (true, _) => {}
        }

        self.cursor.next_ch();
        let hi = self.single_rune()?;
        if hi < lo {
            return Err(self
                .cursor
                .error_from(start, ErrorKind::InvalidRange { lo, hi }));
        }
        Ok(Filter::range(lo, hi))
    }

    /// A plain code point or an escape standing for one.
    fn single_rune(&mut self) -> Result<char> {
        let start = self.cursor.position();
        match self.cursor.curr() {
            None => return Err(self.cursor.error(ErrorKind::UnexpectedEof)),
            Some('\\') => {}
            Some(c) => {
                self.cursor.next_ch();
                return Ok(c);
            }
        }

        let invalid = |cursor: &Cursor<'_>| cursor.error_from(start, ErrorKind::InvalidEscape);
        let escaped = match self.cursor.next_ch() {
            Some(c) => c,
            None => return Err(invalid(&self.cursor)),
        };

        match escaped {
            'x' => {
                let hex = match self.cursor.next_ch() {
                    Some('{') => self.cursor.literal("{", "}")?,
                    Some(_) => {
                        let from = self.cursor.position();
                        self.cursor.next_ch();
                        self.cursor.next_ch();
                        let hex = self.cursor.slice(from);
                        if hex.chars().count() != 2 {
                            return Err(invalid(&self.cursor));
                        }
                        hex
                    }
                    None => return Err(invalid(&self.cursor)),
                };
                if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(invalid(&self.cursor));
                }
                u32::from_str_radix(hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| invalid(&self.cursor))
            }
            'a' | 't' | 'n' | 'v' | 'f' | 'r' => {
                self.cursor.next_ch();
                Ok(match escaped {
                    'a' => '\x07',
                    't' => '\t',
                    'n' => '\n',
                    'v' => '\x0B',
                    'f' => '\x0C',
                    _ => '\r',
                })
            }
            c if tables::contains(tables::PUNCT, c) => {
                self.cursor.next_ch();
                Ok(c)
            }
            c if c.is_ascii_digit() => {
                let from = self.cursor.position();
                let mut digits = 0;
                while digits < 3 && self.cursor.curr().map_or(false, |c| c.is_ascii_digit()) {
                    self.cursor.next_ch();
                    digits += 1;
                }
                u32::from_str_radix(self.cursor.slice(from), 8)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| invalid(&self.cursor))
            }
            _ => Err(invalid(&self.cursor)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::parse;
    use crate::automata::program::Program;
    use crate::errors::ErrorKind;
    use crate::syntax::Flags;
    use pretty_assertions::assert_eq;

    fn p(pattern: &str) -> Program {
        parse(pattern, Flags::default()).unwrap()
    }

    fn err(pattern: &str) -> ErrorKind {
        parse(pattern, Flags::default()).unwrap_err().kind().clone()
    }

    #[test]
    fn single_literal() {
        let prog = p("a");
        assert_eq!(
            concat!(
                "0 {0 Split out=2}\n",
                "1 {1 Capture cid=0 out=8}\n",
                "2 {2 Split out=1 out1=3}\n",
                "3 {3 CodePoint any out=2}\n",
                "4 {4 Capture cid=1 out=6}\n",
                "5 {5 Match}\n",
                "6 {6 Split out=5 out1=7}\n",
                "7 {7 CodePoint any out=6}\n",
                "8 {8 CodePoint 'a' out=4}\n",
            ),
            prog.to_string()
        );
        assert_eq!(2, prog.start);
        assert_eq!(1, prog.caps);
    }

    #[test]
    fn groups() {
        assert_eq!(1, p("").caps);
        assert_eq!(3, p("(a)(b)").caps);
        assert_eq!(2, p("(a(?:b))").caps);
        assert_eq!(1, p("(?i)a(?s:.)").caps);
        assert_eq!(2, p("(a){2,4}").caps);
        assert_eq!(3, p("(a|(b))+c").caps);
        assert_eq!(
            vec![None, Some("year"), None],
            p(r"(?P<year>\d+)-(\d+)").capture_names()
        );
    }

    #[test]
    fn flag_only_group() {
        // Its no-op instruction is bypassed by cleanup.
        assert_eq!(p("ab").len(), p("a(?i)b").len());
    }

    #[test]
    fn syntax_errors() {
        use ErrorKind::*;
        assert_eq!(UnclosedGroup, err("a(b"));
        assert_eq!(UnclosedGroup, err("(?i"));
        assert_eq!(TrailingInput, err("a)"));
        assert_eq!(UnexpectedToken('*'), err("*a"));
        assert_eq!(UnexpectedToken('*'), err("a**"));
        assert_eq!(UnexpectedToken('}'), err("}"));
        assert_eq!(UnexpectedToken(']'), err("a]"));
        assert_eq!(UnexpectedEof, err("[a-"));
        assert_eq!(UnterminatedLiteral { delimiter: "]" }, err("[ab"));
        assert_eq!(UnterminatedLiteral { delimiter: "}" }, err("a{2"));
        assert_eq!(UnterminatedLiteral { delimiter: r"\E" }, err(r"\Qab"));
        assert_eq!(UnterminatedLiteral { delimiter: ":]" }, err("[:alpha"));
        assert_eq!(UnterminatedLiteral { delimiter: ">" }, err("(?P<name"));
        assert_eq!(InvalidFlag('é'), err("(?é)"));
        assert_eq!(RangeOutsideClass { lo: 'a', hi: 'z' }, err("a-z"));
        assert_eq!(RangeOutsideClass { lo: 'x', hi: '-' }, err("x--"));
    }

    #[test]
    fn class_errors() {
        use ErrorKind::*;
        assert_eq!(InvalidRange { lo: 'z', hi: 'a' }, err("[z-a]"));
        assert_eq!(NestedBracket, err("[a[b]]"));
        assert_eq!(UnknownClass("nope".to_string()), err("[:nope:]"));
        assert_eq!(UnknownClass("Nope".to_string()), err(r"\p{Nope}"));
        assert_eq!(UnknownClass("l".to_string()), err(r"\pl"));
        assert_eq!(UnknownClass("greek".to_string()), err(r"\p{greek}"));
        assert_eq!(UnknownClass("Script=Greek".to_string()), err(r"\p{Script=Greek}"));
        assert_eq!(InvalidEscape, err(r"\q"));
        assert_eq!(InvalidEscape, err(r"\xZZ"));
        assert_eq!(InvalidEscape, err(r"\x{110000}"));
        assert_eq!(InvalidEscape, err(r"\9"));
        assert_eq!(InvalidEscape, err("a\\"));
    }

    #[test]
    fn repetition_errors() {
        use ErrorKind::*;
        assert_eq!(InvalidRepetitionRange, err("a{3,2}"));
        assert_eq!(InvalidRepetitionRange, err("a{x}"));
        assert_eq!(InvalidRepetitionRange, err("a{,2}"));
        assert_eq!(InvalidRepetitionRange, err("a{0}"));
        assert_eq!(InvalidRepetitionRange, err("a{0,0}"));
    }

    #[test]
    fn accepted() {
        for pattern in [
            "",
            "a|b|",
            r"\Q.*\E+",
            r"\Q\E*",
            "(?:)*",
            "[]",
            "[a-]",
            "a-",
            "-a",
            r"\d-",
            r"[\d\s_-]",
            r"\x41\x{1F600}\101\0",
            r"\.\*\[",
            "[:^digit:]",
            r"\P{Greek}\pL\D",
            "(?i-s:a.)",
            "a{2}b{1,}c{1,3}?",
            r"^\A\b\B\z$",
        ] {
            assert!(parse(pattern, Flags::default()).is_ok(), "{}", pattern);
        }
    }

    #[test]
    fn error_position() {
        let e = parse("ab[z-a]", Flags::default()).unwrap_err();
        assert_eq!(3, e.span().start.offset);
        assert_eq!(6, e.span().end.offset);
    }
}
