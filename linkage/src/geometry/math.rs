use crate::model::Vec2;

#[inline]
pub fn distance_sq(a: Vec2, b: Vec2) -> f64 {
    let dx = b.x - a.x; let dy = b.y - a.y;
    dx*dx + dy*dy
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f64 { distance_sq(a, b).sqrt() }

#[inline]
pub fn translate(p: Vec2, dx: f64, dy: f64) -> Vec2 { Vec2::new(p.x + dx, p.y + dy) }
