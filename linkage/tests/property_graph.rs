use linkage::config::PropagationPolicy;
use linkage::geometry::tolerance::EPS_CONSTRAINT;
use linkage::Linkage;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    AddPoint { x: i16, y: i16 },
    AddSegment { a: u16, b: u16, fixed: bool },
    MovePoint { idx: u16, x: i16, y: i16 },
    Merge { a: u16, b: u16 },
    SetFixed { idx: u16, fixed: bool },
    Pan { dx: i8, dy: i8 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<i16>(), any::<i16>()).prop_map(|(x, y)| Op::AddPoint { x, y }),
        (any::<u16>(), any::<u16>(), any::<bool>()).prop_map(|(a, b, fixed)| Op::AddSegment {
            a,
            b,
            fixed,
        }),
        (any::<u16>(), any::<i16>(), any::<i16>()).prop_map(|(idx, x, y)| Op::MovePoint {
            idx,
            x,
            y,
        }),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Op::Merge { a, b }),
        (any::<u16>(), any::<bool>()).prop_map(|(idx, fixed)| Op::SetFixed { idx, fixed }),
        (any::<i8>(), any::<i8>()).prop_map(|(dx, dy)| Op::Pan { dx, dy }),
    ]
}

fn nth_point(g: &Linkage, idx: u16) -> Option<u32> {
    let ids = g.point_ids();
    if ids.is_empty() {
        return None;
    }
    Some(ids[(idx as usize) % ids.len()])
}

fn apply_op(g: &mut Linkage, op: Op) {
    match op {
        Op::AddPoint { x, y } => {
            let _ = g.add_point(x as f64 * 0.1, y as f64 * 0.1);
        }
        Op::AddSegment { a, b, fixed } => {
            if let (Some(a), Some(b)) = (nth_point(g, a), nth_point(g, b)) {
                let _ = g.add_segment(a, b, fixed);
            }
        }
        Op::MovePoint { idx, x, y } => {
            if let Some(id) = nth_point(g, idx) {
                let before = g.get_point(id);
                let fixed = g.is_fixed(id);
                assert!(g.move_point(id, x as f64 * 0.1, y as f64 * 0.1));
                if fixed {
                    assert_eq!(g.get_point(id), before, "fixed point {} moved", id);
                }
            }
        }
        Op::Merge { a, b } => {
            if let (Some(a), Some(b)) = (nth_point(g, a), nth_point(g, b)) {
                let merged = g.merge(a, b);
                assert_eq!(merged, a != b);
                if merged {
                    assert!(g.get_point(b).is_none());
                }
            }
        }
        Op::SetFixed { idx, fixed } => {
            if let Some(id) = nth_point(g, idx) {
                assert!(g.set_fixed(id, fixed));
            }
        }
        Op::Pan { dx, dy } => {
            let _ = g.pan(dx as f64, dy as f64);
        }
    }
}

fn assert_invariants(g: &Linkage) {
    // No dangling references
    let arrays = g.segment_arrays();
    for i in 0..arrays.ids.len() {
        let a = arrays.endpoints[2 * i];
        let b = arrays.endpoints[2 * i + 1];
        assert!(g.get_point(a).is_some(), "segment {} missing point {}", arrays.ids[i], a);
        assert!(g.get_point(b).is_some(), "segment {} missing point {}", arrays.ids[i], b);
    }
    // Incidence lists only name segments that touch the point
    for id in g.point_ids() {
        let (x, y) = g.get_point(id).unwrap();
        assert!(x.is_finite() && y.is_finite());
        for &sid in g.incident_segments(id).unwrap() {
            let s = g.segment(sid).expect("listed segment exists");
            assert!(s.a == id || s.b == id, "point {} lists foreign segment {}", id, sid);
        }
    }
}

fn sequence_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 5..40)
}

fn chain_strategy() -> impl Strategy<Value = (Vec<(i8, i8)>, Vec<(u8, i16, i16)>)> {
    (
        prop::collection::vec((any::<i8>(), any::<i8>()), 2..12),
        prop::collection::vec((any::<u8>(), any::<i16>(), any::<i16>()), 1..10),
    )
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 2_000, .. ProptestConfig::default() })]
    #[test]
    fn graph_edit_invariants(seq in sequence_strategy()) {
        let mut graph = Linkage::new();
        for op in seq {
            apply_op(&mut graph, op);
        }
        assert_invariants(&graph);
    }

    #[test]
    fn open_chains_keep_lengths(
        (offsets, moves) in chain_strategy(),
        path_locked in any::<bool>(),
    ) {
        let mut g = Linkage::new();
        if path_locked {
            g.set_policy(PropagationPolicy::PathLocked);
        }
        let mut x = 0.0;
        let mut y = 0.0;
        let mut pts = vec![g.add_point(x, y)];
        for (dx, dy) in offsets {
            x += dx as f64 + 0.5;
            y += dy as f64;
            pts.push(g.add_point(x, y));
        }
        let segs: Vec<u32> = pts.windows(2).map(|w| g.add_segment(w[0], w[1], true).unwrap()).collect();
        let stored: Vec<f64> = segs.iter().map(|&s| g.segment(s).unwrap().length).collect();
        for (idx, mx, my) in moves {
            let id = pts[(idx as usize) % pts.len()];
            let report = g.move_point_report(id, mx as f64 * 0.01, my as f64 * 0.01).unwrap();
            prop_assert_eq!(report.moved.len(), pts.len());
        }
        for (i, &s) in segs.iter().enumerate() {
            let seg = g.segment(s).unwrap();
            prop_assert_eq!(seg.length, stored[i]);
            let live = g.current_length(s).unwrap();
            let tol = EPS_CONSTRAINT * (1.0 + stored[i]);
            prop_assert!((live - stored[i]).abs() <= tol, "segment {} live {} stored {}", i, live, stored[i]);
        }
    }

    #[test]
    fn pan_preserves_every_length(seq in sequence_strategy(), dx in -50.0f64..50.0, dy in -50.0f64..50.0) {
        let mut g = Linkage::new();
        for op in seq {
            apply_op(&mut g, op);
        }
        let ids = g.segment_arrays().ids;
        let before: Vec<f64> = ids.iter().map(|&s| g.current_length(s).unwrap()).collect();
        g.pan(dx, dy);
        for (i, &s) in ids.iter().enumerate() {
            prop_assert!((g.current_length(s).unwrap() - before[i]).abs() < 1e-6);
        }
    }
}
