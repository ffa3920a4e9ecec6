use crate::geometry::math::distance_sq;
use crate::model::Vec2;
use crate::Linkage;

/// Nearest live point within `radius` of `(x, y)`, skipping `exclude`.
/// Ties go to the lower id.
pub fn pick_point_impl(g: &Linkage, x: f64, y: f64, radius: f64, exclude: Option<u32>) -> Option<u32> {
    if !x.is_finite() || !y.is_finite() || !radius.is_finite() || radius < 0.0 { return None; }
    let at = Vec2::new(x, y);
    let r2 = radius*radius;
    let mut best: Option<(u32,f64)> = None;
    for (i, p) in g.points.iter().enumerate() {
        let id = i as u32;
        if Some(id) == exclude { continue; }
        if let Some(p) = p {
            let d2 = distance_sq(p.pos, at);
            if d2 <= r2 && best.map_or(true, |(_,bd)| d2 < bd) { best = Some((id, d2)); }
        }
    }
    best.map(|(id,_)| id)
}
