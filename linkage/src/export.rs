use crate::Linkage;

/// Live points in id order, divided by `scale` and truncated toward zero.
/// With the layout scale this turns screen pixels back into link units.
pub fn outline_impl(g: &Linkage, scale: f64) -> Vec<(i64, i64)> {
    if !scale.is_finite() || scale <= 0.0 {
        return Vec::new();
    }
    g.points
        .iter()
        .flatten()
        .map(|p| ((p.pos.x / scale) as i64, (p.pos.y / scale) as i64))
        .collect()
}

/// OpenSCAD source extruding the outline as a polygon. Only meaningful once
/// the chain has been closed.
pub fn to_openscad_impl(g: &Linkage, scale: f64, height: f64) -> String {
    let pts: Vec<String> = outline_impl(g, scale)
        .into_iter()
        .map(|(x, y)| format!("[{},{}]", x, y))
        .collect();
    format!("linear_extrude({}) {{ polygon( points = [{}] ); }}", height, pts.join(", "))
}

#[cfg(test)]
mod tests {
    use crate::Linkage;

    #[test]
    fn outline_truncates_toward_zero() {
        let mut g = Linkage::new();
        g.add_point(10.9, -10.9);
        g.add_point(25.0, 4.0);
        assert_eq!(g.outline(2.0), vec![(5, -5), (12, 2)]);
        assert!(g.outline(0.0).is_empty());
    }

    #[test]
    fn openscad_text() {
        let mut g = Linkage::new();
        let a = g.add_point(0.0, 0.0);
        g.add_point(30.0, 0.0);
        g.add_point(0.0, 40.0);
        assert_eq!(
            g.to_openscad(10.0, 3.0),
            "linear_extrude(3) { polygon( points = [[0,0], [3,0], [0,4]] ); }"
        );
        let b = g.add_point(0.0, 0.0);
        g.add_segment(a, b, true);
        assert!(g.merge(a, b));
        assert_eq!(g.outline(10.0).len(), 3);
    }
}
