//! Pike VM over a compiled [`Program`].
//!
//! All live threads advance together one code point at a time, so the run
//! is linear in the input length times the program size. Threads are kept in
//! priority order: the epsilon closure visits `out` before `out1`, and the
//! first thread to claim an instruction in a step owns it. When a thread
//! reaches `Match`, every thread behind it is dropped, which gives
//! leftmost-first results.

use std::mem;

use crate::automata::program::{InstKind, InstPtr, Program};

/// Capture slots by slot index, byte offsets into the input.
pub type Slots = Vec<Option<usize>>;

pub struct Executor<'a> {
    program: &'a Program,
}

/// Deferred work for the epsilon closure.
#[derive(Clone, Copy, Debug)]
enum Frame {
    Explore(InstPtr),
    /// Undo a capture once everything reached through it has been explored.
    RestoreCapture { slot: usize, offset: Option<usize> },
}

/// Instructions in insertion order, with constant time membership and clear.
#[derive(Debug)]
struct SparseSet {
    dense: Vec<InstPtr>,
    sparse: Vec<usize>,
}

impl SparseSet {
    fn new(capacity: usize) -> SparseSet {
        SparseSet {
            dense: Vec::with_capacity(capacity),
            sparse: vec![0; capacity],
        }
    }

    fn contains(&self, pc: InstPtr) -> bool {
        let i = self.sparse[pc];
        i < self.dense.len() && self.dense[i] == pc
    }

    /// False if `pc` was already present.
    fn insert(&mut self, pc: InstPtr) -> bool {
        if self.contains(pc) {
            return false;
        }
        self.sparse[pc] = self.dense.len();
        self.dense.push(pc);
        true
    }

    fn len(&self) -> usize {
        self.dense.len()
    }

    fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    fn clear(&mut self) {
        self.dense.clear();
    }
}

/// One step's worth of threads and the capture slots each one carries.
#[derive(Debug)]
struct Threads {
    set: SparseSet,
    slots: Slots,
    width: usize,
}

impl Threads {
    fn new(program: &Program) -> Threads {
        let width = program.slots();
        Threads {
            set: SparseSet::new(program.len()),
            slots: vec![None; program.len() * width],
            width,
        }
    }

    fn caps(&self, pc: InstPtr) -> &[Option<usize>] {
        &self.slots[pc * self.width..(pc + 1) * self.width]
    }

    fn caps_mut(&mut self, pc: InstPtr) -> &mut [Option<usize>] {
        &mut self.slots[pc * self.width..(pc + 1) * self.width]
    }
}

/// Where a closure is being computed: the offset and the code points either
/// side of it.
#[derive(Clone, Copy, Debug)]
struct At {
    offset: usize,
    left: Option<char>,
    right: Option<char>,
}

impl<'a> Executor<'a> {
    pub fn new(program: &'a Program) -> Executor<'a> {
        Executor { program }
    }

    /// Whether the program matches anywhere in `input`.
    pub fn matches(&self, input: &str) -> bool {
        self.run(input, true).is_some()
    }

    /// Slots of the leftmost-first match, or `None` if there is none.
    pub fn captures(&self, input: &str) -> Option<Slots> {
        self.run(input, false)
    }

    fn run(&self, input: &str, earliest: bool) -> Option<Slots> {
        let mut clist = Threads::new(self.program);
        let mut nlist = Threads::new(self.program);
        let mut stack = vec![];
        let mut scratch: Slots = vec![None; self.program.slots()];
        let mut matched = None;

        let mut at = At {
            offset: 0,
            left: None,
            right: input.chars().next(),
        };
        self.add(&mut clist, &mut stack, self.program.start, at, &mut scratch);

        while !clist.set.is_empty() {
            let next = match at.right {
                Some(c) => {
                    let offset = at.offset + c.len_utf8();
                    At {
                        offset,
                        left: Some(c),
                        right: input[offset..].chars().next(),
                    }
                }
                None => at,
            };

            for i in 0..clist.set.len() {
                let pc = clist.set.dense[i];
                let inst = &self.program.insts[pc];
                match &inst.kind {
                    InstKind::Match => {
                        matched = Some(clist.caps(pc).to_vec());
                        if earliest {
                            return matched;
                        }
                        // Everything after this thread has lower priority.
                        break;
                    }
                    InstKind::CodePoint(filter) => {
                        let (Some(c), Some(out)) = (at.right, inst.out) else {
                            continue;
                        };
                        if filter.matches(c) {
                            scratch.copy_from_slice(clist.caps(pc));
                            self.add(&mut nlist, &mut stack, out, next, &mut scratch);
                        }
                    }
                    InstKind::Split | InstKind::Capture { .. } | InstKind::Boundary(_) => {}
                }
            }

            if at.right.is_none() {
                break;
            }
            mem::swap(&mut clist, &mut nlist);
            nlist.set.clear();
            at = next;
        }
        matched
    }

    /// Follow every non-consuming instruction reachable from `pc`, adding
    /// what is reached to `list` in priority order. `slots` are the captures
    /// of the thread getting here, and are left as they were on return.
    fn add(
        &self,
        list: &mut Threads,
        stack: &mut Vec<Frame>,
        pc: InstPtr,
        at: At,
        slots: &mut [Option<usize>],
    ) {
        stack.push(Frame::Explore(pc));
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Explore(pc) => self.explore(list, stack, pc, at, slots),
                Frame::RestoreCapture { slot, offset } => slots[slot] = offset,
            }
        }
    }

    fn explore(
        &self,
        list: &mut Threads,
        stack: &mut Vec<Frame>,
        mut pc: InstPtr,
        at: At,
        slots: &mut [Option<usize>],
    ) {
        loop {
            if !list.set.insert(pc) {
                return;
            }
            let inst = &self.program.insts[pc];
            let next = match &inst.kind {
                InstKind::Split => {
                    if let Some(out1) = inst.out1 {
                        stack.push(Frame::Explore(out1));
                    }
                    inst.out
                }
                InstKind::Capture { cid, .. } => {
                    stack.push(Frame::RestoreCapture {
                        slot: *cid,
                        offset: slots[*cid],
                    });
                    slots[*cid] = Some(at.offset);
                    inst.out
                }
                InstKind::Boundary(boundary) => {
                    if !boundary.matches(at.left, at.right) {
                        return;
                    }
                    inst.out
                }
                InstKind::CodePoint(_) | InstKind::Match => {
                    list.caps_mut(pc).copy_from_slice(slots);
                    return;
                }
            };
            match next {
                Some(next) => pc = next,
                None => return,
            }
        }
    }
}
