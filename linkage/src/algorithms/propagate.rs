use crate::config::PropagationPolicy;
use crate::geometry::angle::project_at_length;
use crate::model::{MoveReport, Vec2};
use crate::Linkage;
use std::collections::HashSet;

// One point being used as a pivot; `next` indexes its incident-segment list.
struct Frame {
    point: u32,
    next: usize,
}

/// Depth-first pull of fixed-length neighbours.
///
/// `locked` plays the role of a per-point "being moved" flag. It belongs to
/// this traversal only, so nothing stays locked once it returns.
struct Traversal {
    policy: PropagationPolicy,
    locked: HashSet<u32>,
    stack: Vec<Frame>,
    report: MoveReport,
}

impl Traversal {
    fn new(policy: PropagationPolicy) -> Self {
        Traversal {
            policy,
            locked: HashSet::new(),
            stack: Vec::new(),
            report: MoveReport::default(),
        }
    }

    fn enter(&mut self, g: &mut Linkage, id: u32, to: Vec2) {
        g.place(id, to);
        self.locked.insert(id);
        self.report.moved.push(id);
        self.stack.push(Frame { point: id, next: 0 });
    }

    fn leave(&mut self) {
        if let Some(frame) = self.stack.pop() {
            if self.policy == PropagationPolicy::PathLocked {
                self.locked.remove(&frame.point);
            }
        }
    }

    fn run(&mut self, g: &mut Linkage) {
        while let Some(top) = self.stack.last_mut() {
            let pivot = top.point;
            let (pivot_pos, sid) = match g.live_point(pivot) {
                Some(p) => match p.segments.get(top.next) {
                    Some(&sid) => (p.pos, sid),
                    None => {
                        self.leave();
                        continue;
                    }
                },
                None => {
                    self.leave();
                    continue;
                }
            };
            top.next += 1;
            let (op, len) = match g.live_segment(sid) {
                Some(s) if s.fix_length => (s.other(pivot), s.length),
                _ => continue,
            };
            if self.locked.contains(&op) {
                continue;
            }
            let target = match g.live_point(op) {
                Some(p) if !p.fixed => project_at_length(pivot_pos, p.pos, len),
                _ => continue,
            };
            log::trace!(
                "pull {} from pivot {} to ({:.4}, {:.4})",
                op,
                pivot,
                target.x,
                target.y
            );
            self.enter(g, op, target);
        }
    }
}

/// Moves `id` to `to` and restores every fixed-length segment reachable
/// from it, one radial projection per segment.
///
/// This is a single pass: on a cycle the last segment walked back into a
/// locked point is not revisited, so a closed ring may end with one link off
/// its length. Which points can be revisited is set by the graph's
/// [`PropagationPolicy`].
pub(crate) fn propagate(g: &mut Linkage, id: u32, to: Vec2) -> Option<MoveReport> {
    if !to.is_finite() {
        return None;
    }
    let root = g.live_point(id)?;
    if root.fixed {
        log::trace!("point {} is fixed; move ignored", id);
        return Some(MoveReport::default());
    }
    let mut t = Traversal::new(g.solver.policy);
    t.enter(g, id, to);
    t.run(g);
    debug_assert!(t.stack.is_empty());
    if t.policy == PropagationPolicy::PathLocked {
        debug_assert!(t.locked.is_empty());
    }
    g.bump();
    Some(t.report)
}
