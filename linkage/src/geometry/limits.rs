// Centralized ingestion limits to harden against untrusted input (JSON)

// Scene size caps; ids are arena slots so these also bound the largest id
pub const MAX_POINTS: usize = 200_000;
pub const MAX_SEGMENTS: usize = 300_000;

// Numeric bounds
pub const COORD_MIN: f64 = -10_000_000.0;
pub const COORD_MAX: f64 =  10_000_000.0;
pub const WIDTH_MAX: f32 = 10_000.0;
pub const LABEL_MAX: usize = 256;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_width_bounds(w: f32) -> bool { w.is_finite() && w > 0.0 && w <= WIDTH_MAX }

#[inline]
pub fn in_length_bounds(l: f64) -> bool { l.is_finite() && l >= 0.0 && l <= COORD_MAX - COORD_MIN }
