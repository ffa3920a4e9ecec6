// Centralized tolerances and helpers for linkage geometry

pub const EPS_POS: f64 = 1e-6;            // point coincidence threshold (px)
pub const EPS_DX: f64 = 0.000001;         // substituted for an exactly vertical dx
pub const EPS_CONSTRAINT: f64 = 1e-6;     // fixed-length tolerance for tests/invariants

#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }
#[inline] pub fn near_zero(x: f64, eps: f64) -> bool { x.abs() <= eps }
