use super::tolerance::EPS_DX;
use crate::model::{Angle, Vec2};
use std::f64::consts::PI;

/// Direction of the vector `from -> to` against the positive x axis,
/// normalised into `[0, 2π)`.
///
/// An exactly vertical vector has its `dx` replaced by [`EPS_DX`], so the
/// result is always finite and lands just off `π/2` or `3π/2`.
pub fn direction_angle(from: Vec2, to: Vec2) -> Angle {
    let mut dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0.0 {
        dx = EPS_DX;
    }
    let mut rad = dy.atan2(dx);
    if rad < 0.0 {
        rad += 2.0 * PI;
    }
    Angle { rad, deg: rad.to_degrees() }
}

/// Turn from `a` to `b`.
///
/// With `smallest == false` this is the raw `b - a`, unnormalised. With
/// `smallest == true` a turn over 180° is reported as its complement and a
/// negative turn is negated, so 330° reads as 30°.
pub fn angle_between(a: Angle, b: Angle, smallest: bool) -> Angle {
    let diff = Angle { rad: b.rad - a.rad, deg: b.deg - a.deg };
    if !smallest {
        return diff;
    }
    if diff.deg > 180.0 {
        Angle { rad: 2.0 * PI - diff.rad, deg: 360.0 - diff.deg }
    } else if diff.deg < 0.0 {
        Angle { rad: -diff.rad, deg: -diff.deg }
    } else {
        diff
    }
}

/// Third vertex of a triangle: `len` away from `b`, turned `turn_deg`
/// degrees from the direction of `a -> b`.
pub fn triangle_point(a: Vec2, b: Vec2, len: f64, turn_deg: f64) -> Vec2 {
    let ab = direction_angle(a, b);
    let c = (ab.deg + turn_deg).to_radians();
    Vec2::new(b.x + len * c.cos(), b.y + len * c.sin())
}

/// Point `len` away from `pivot` along the current direction towards `toward`.
#[inline]
pub fn project_at_length(pivot: Vec2, toward: Vec2, len: f64) -> Vec2 {
    let ang = direction_angle(pivot, toward);
    Vec2::new(pivot.x + len * ang.rad.cos(), pivot.y + len * ang.rad.sin())
}
