use crate::Linkage;

/// Fuses `b` into `a`: every segment touching `b` is re-pointed at `a` and
/// appended to `a`'s incidence list, then `b` is removed.
///
/// Stored lengths are left alone and nothing is deduplicated. A segment that
/// joined `a` and `b` becomes a self-loop on `a` and appears twice in `a`'s
/// list. Callers normally drag `b` onto `a` first so the fused position is
/// unambiguous.
pub fn merge_points(g: &mut Linkage, a: u32, b: u32) -> bool {
    if a == b || g.live_point(a).is_none() || g.live_point(b).is_none() {
        return false;
    }
    let moved = match g.points.get_mut(b as usize).and_then(|p| p.take()) {
        Some(p) => p.segments,
        None => return false,
    };
    for &sid in &moved {
        if let Some(Some(s)) = g.segments.get_mut(sid as usize) {
            s.replace_endpoint(b, a);
        }
    }
    if let Some(Some(pa)) = g.points.get_mut(a as usize) {
        pa.segments.extend_from_slice(&moved);
    }
    for &sid in &moved {
        g.refresh_segment(sid);
    }
    log::debug!("merged point {} into {} ({} segments re-pointed)", b, a, moved.len());
    g.dirty.points_removed.insert(b);
    g.bump();
    true
}
