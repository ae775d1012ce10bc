//! Post-processing of freshly built instructions.
//!
//! 1. Cycles made purely of `Split`s are broken. They show up for loops over
//!    terms that consume nothing, e.g. `\Q\E*` or `(?:)*`.
//! 2. Every `Split` with a single effective destination is bypassed.
//! 3. The list is compacted to the instructions reachable from instruction
//!    0 and renumbered. Instruction 0 is the entry point and always stays.

use crate::automata::program::{Inst, InstPtr};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    OnPath,
    Done,
}

pub(crate) fn cleanup(mut insts: Vec<Inst>) -> Vec<Inst> {
    break_cycles(&mut insts);
    let removed = remove_single_splits(&mut insts);
    compact(insts, &removed)
}

/// Depth first walk from the entry, cutting every edge that closes a cycle
/// whose instructions are all `Split`s. A cycle is only cut where the loop
/// can be entered solely through the instruction the edge returns to, so no
/// thread loses a way out of the loop.
fn break_cycles(insts: &mut [Inst]) {
    let mut preds = vec![vec![]; insts.len()];
    for (pc, inst) in insts.iter().enumerate() {
        for next in inst.edges() {
            preds[next].push(pc);
        }
    }

    let mut visit = vec![Visit::New; insts.len()];
    let mut depth = vec![0; insts.len()];
    // (instruction, edges followed so far, non-split instructions on the path
    // up to and including this one)
    let mut path: Vec<(InstPtr, usize, usize)> = vec![];

    visit[0] = Visit::OnPath;
    path.push((0, 0, usize::from(!insts[0].is_split())));

    while let Some(&(pc, followed, barriers)) = path.last() {
        let edge = match followed {
            0 => insts[pc].out,
            1 => insts[pc].out1,
            _ => {
                visit[pc] = Visit::Done;
                path.pop();
                continue;
            }
        };
        let top = path.len() - 1;
        path[top].1 += 1;

        let Some(next) = edge else {
            continue;
        };
        match visit[next] {
            Visit::New => {
                visit[next] = Visit::OnPath;
                depth[next] = path.len();
                path.push((next, 0, barriers + usize::from(!insts[next].is_split())));
            }
            Visit::OnPath => {
                let head = depth[next];
                let before = match head {
                    0 => 0,
                    d => path[d - 1].2,
                };
                let inside = |p: InstPtr| visit[p] == Visit::OnPath && depth[p] >= head;
                let closed = path[head + 1..]
                    .iter()
                    .all(|&(pc, _, _)| preds[pc].iter().all(|&p| inside(p)));
                if barriers == before && closed {
                    log::trace!("breaking split cycle at {} -> {}", pc, next);
                    if followed == 0 {
                        insts[pc].out = None;
                    } else {
                        insts[pc].out1 = None;
                    }
                }
            }
            Visit::Done => {}
        }
    }
}

/// Bypass every `Split` past the entry whose edges are equal or of which
/// one is absent. Returns which instructions were dropped.
fn remove_single_splits(insts: &mut [Inst]) -> Vec<bool> {
    let mut removed = vec![false; insts.len()];
    // Bypassing one split can leave another with a single edge, so repeat
    // until nothing changes.
    let mut changed = true;
    while changed {
        changed = false;
        for i in 1..insts.len() {
            if removed[i] || !insts[i].is_split() {
                continue;
            }
            let dest = match (insts[i].out, insts[i].out1) {
                (out, out1) if out == out1 => out,
                (Some(out), None) | (None, Some(out)) => Some(out),
                _ => continue,
            };
            if dest == Some(i) {
                continue;
            }
            log::trace!("removing single split {}", i);
            removed[i] = true;
            changed = true;

            for j in 0..insts.len() {
                if removed[j] {
                    continue;
                }
                if insts[j].out == Some(i) {
                    insts[j].out = dest;
                }
                if insts[j].out1 == Some(i) {
                    insts[j].out1 = dest;
                }
            }
        }
    }
    removed
}

/// Keep what the entry reaches, in their existing order, renumbered densely.
fn compact(insts: Vec<Inst>, removed: &[bool]) -> Vec<Inst> {
    let mut reachable = vec![false; insts.len()];
    let mut stack = vec![0];
    while let Some(pc) = stack.pop() {
        if reachable[pc] || removed[pc] {
            continue;
        }
        reachable[pc] = true;
        stack.extend(insts[pc].edges());
    }

    let mut renumber = vec![None; insts.len()];
    let mut next = 0;
    for (pc, keep) in reachable.iter().enumerate() {
        if *keep {
            renumber[pc] = Some(next);
            next += 1;
        }
    }

    let relink = |edge: Option<InstPtr>| {
        edge.map(|pc| match renumber[pc] {
            Some(new) => new,
            None => unreachable!("edge to dropped instruction {}", pc),
        })
    };
    insts
        .into_iter()
        .zip(renumber.iter())
        .filter_map(|(inst, idx)| {
            idx.map(|idx| Inst {
                idx,
                out: relink(inst.out),
                out1: relink(inst.out1),
                kind: inst.kind,
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::cleanup;
    use crate::automata::program::{Inst, InstKind};
    use crate::class::Filter;
    use pretty_assertions::assert_eq;

    fn inst(idx: usize, kind: InstKind, out: Option<usize>, out1: Option<usize>) -> Inst {
        Inst {
            idx,
            kind,
            out,
            out1,
        }
    }

    fn split(idx: usize, out: Option<usize>, out1: Option<usize>) -> Inst {
        inst(idx, InstKind::Split, out, out1)
    }

    fn code_point(idx: usize, c: char, out: Option<usize>) -> Inst {
        inst(idx, InstKind::CodePoint(Filter::literal(c)), out, None)
    }

    fn matched(idx: usize) -> Inst {
        inst(idx, InstKind::Match, None, None)
    }

    #[test]
    fn bypass_single_splits() {
        let prog = vec![
            split(0, Some(1), None),
            split(1, Some(2), None),
            code_point(2, 'a', Some(3)),
            split(3, Some(4), Some(4)),
            matched(4),
        ];
        assert_eq!(
            cleanup(prog),
            vec![split(0, Some(1), None), code_point(1, 'a', Some(2)), matched(2)]
        );
    }

    #[test]
    fn keep_real_branches() {
        let prog = vec![
            split(0, Some(1), None),
            split(1, Some(2), Some(3)),
            code_point(2, 'a', Some(1)),
            matched(3),
        ];
        assert_eq!(cleanup(prog.clone()), prog);
    }

    #[test]
    fn drop_unreachable() {
        let prog = vec![
            split(0, Some(2), None),
            code_point(1, 'x', Some(3)),
            code_point(2, 'a', Some(3)),
            matched(3),
        ];
        assert_eq!(
            cleanup(prog),
            vec![split(0, Some(1), None), code_point(1, 'a', Some(2)), matched(2)]
        );
    }

    #[test]
    fn break_split_cycle() {
        // 1 loops back onto itself through 2 without consuming anything.
        let prog = vec![
            split(0, Some(1), None),
            split(1, Some(2), Some(3)),
            split(2, Some(1), None),
            matched(3),
        ];
        assert_eq!(
            cleanup(prog),
            vec![split(0, Some(1), None), matched(1)]
        );
    }

    #[test]
    fn keep_loop_exit_after_consuming() {
        // `(?:a*)*`: 4 closes a split-only loop back to 1, but it is also
        // the only way from 'a' back to the exit at 5.
        let prog = vec![
            split(0, Some(1), None),
            split(1, Some(2), Some(5)),
            split(2, Some(3), Some(4)),
            code_point(3, 'a', Some(2)),
            split(4, Some(1), None),
            matched(5),
        ];
        assert_eq!(
            cleanup(prog),
            vec![
                split(0, Some(1), None),
                split(1, Some(2), Some(4)),
                split(2, Some(3), Some(1)),
                code_point(3, 'a', Some(2)),
                matched(4),
            ]
        );
    }

    #[test]
    fn loop_without_exit_stays_linked() {
        // 2 and 3 loop into each other and 'a' enters at 3, so the loop is
        // kept and bypassing 2 leaves 3 pointing at itself.
        let prog = vec![
            split(0, Some(2), Some(1)),
            code_point(1, 'a', Some(3)),
            split(2, Some(3), None),
            split(3, Some(2), None),
        ];
        assert_eq!(
            cleanup(prog),
            vec![
                split(0, Some(2), Some(1)),
                code_point(1, 'a', Some(2)),
                split(2, Some(2), None),
            ]
        );
    }

    #[test]
    fn keep_consuming_cycle() {
        let prog = vec![
            split(0, Some(1), None),
            split(1, Some(2), Some(4)),
            code_point(2, 'a', Some(3)),
            split(3, Some(1), None),
            matched(4),
        ];
        assert_eq!(
            cleanup(prog),
            vec![
                split(0, Some(1), None),
                split(1, Some(2), Some(3)),
                code_point(2, 'a', Some(1)),
                matched(3),
            ]
        );
    }
}
