use crate::{
    automata::{
        cleanup,
        program::{Inst, InstKind, InstPtr, Program},
    },
    class::Filter,
};

/// Append-only instruction arena the parser builds into.
///
/// Every instruction starts out as an unconnected `Split`; the parser then
/// retypes it and wires its edges with [`Compiler::connect`].
#[derive(Debug)]
pub struct Compiler {
    insts: Vec<Inst>,
    /// Paired groups allocated so far. Group 0 is the whole match.
    caps: usize,
}

impl Compiler {
    pub fn new() -> Compiler {
        Compiler {
            insts: Vec::with_capacity(16),
            caps: 1,
        }
    }

    pub fn caps(&self) -> usize {
        self.caps
    }

    /// Rewind the group counter, so a reparsed term reuses its group ids.
    pub fn set_caps(&mut self, caps: usize) {
        self.caps = caps;
    }

    /// Allocate the ids for a new group, returning its opening slot.
    pub fn next_group(&mut self) -> usize {
        let cid = self.caps * 2;
        self.caps += 1;
        cid
    }

    pub fn push(&mut self, kind: InstKind) -> InstPtr {
        let idx = self.insts.len();
        self.insts.push(Inst::new(idx, kind));
        idx
    }

    pub fn push_split(&mut self) -> InstPtr {
        self.push(InstKind::Split)
    }

    pub fn set_kind(&mut self, pc: InstPtr, kind: InstKind) {
        self.insts[pc].kind = kind;
    }

    /// Point the first free edge of `from` at `to`. Only a `Split` has a
    /// second edge.
    pub fn connect(&mut self, from: InstPtr, to: InstPtr) {
        let inst = &mut self.insts[from];
        if inst.out.is_none() {
            inst.out = Some(to);
        } else if inst.is_split() && inst.out1.is_none() {
            inst.out1 = Some(to);
        } else {
            unreachable!("can't connect {} to {}: edges are full", inst, to);
        }
    }

    /// Set the primary edge of the split `from` directly, leaving `out1`
    /// for whatever [`Compiler::connect`] supplies next.
    pub fn set_out(&mut self, from: InstPtr, to: InstPtr) {
        self.insts[from].out = Some(to);
    }

    pub fn set_out1(&mut self, from: InstPtr, to: InstPtr) {
        self.insts[from].out1 = Some(to);
    }

    /// Lazy `.*?` over every code point, from `begin` to `end`. Both
    /// instructions are free for the caller to retype.
    pub fn dot_star_lazy(&mut self) -> (InstPtr, InstPtr) {
        let begin = self.push_split();
        let end = self.push_split();

        let choice = self.push_split();
        self.connect(begin, choice);
        self.connect(choice, end);

        let any = self.push(InstKind::CodePoint(Filter::Any));
        self.connect(choice, any);
        self.connect(any, choice);

        (begin, end)
    }

    /// Clean up the instructions and seal them into a [`Program`].
    pub fn finish(self) -> Program {
        let before = self.insts.len();
        let insts = cleanup::cleanup(self.insts);
        log::debug!(
            "compiled {} instructions down to {} with {} groups",
            before,
            insts.len(),
            self.caps
        );

        // Instruction 0 never branches, so matching starts where it leads.
        let start = match (insts[0].out, insts[0].out1) {
            (Some(out), None) => out,
            _ => 0,
        };
        Program {
            insts,
            start,
            caps: self.caps,
        }
    }
}
