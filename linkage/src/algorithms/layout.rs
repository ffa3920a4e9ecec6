//! Building a chain from link lengths and closing it into a polygon.

use crate::config::{CloseConfig, LayoutConfig};
use crate::geometry::math::distance;
use crate::model::Vec2;
use crate::Linkage;
use std::f64::consts::PI;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum LayoutError {
    Empty,
    InvalidLength { index: usize, value: f64 },
    InvalidViewport,
    TooFewSides { got: usize },
    NotClosable { longest: f64, rest: f64 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Empty => write!(f, "no link lengths given"),
            LayoutError::InvalidLength { index, value } => {
                write!(f, "link {} has invalid length {}", index, value)
            }
            LayoutError::InvalidViewport => write!(f, "viewport and fill must be positive"),
            LayoutError::TooFewSides { got } => {
                write!(f, "a polygon needs at least 3 sides, got {}", got)
            }
            LayoutError::NotClosable { longest, rest } => write!(
                f,
                "longest side {} is not shorter than the other sides together ({})",
                longest, rest
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

/// Points of a freshly laid out chain, first to last, and the screen scale
/// (pixels per length unit) used to place them.
#[derive(Clone, Debug, PartialEq)]
pub struct Chain {
    pub points: Vec<u32>,
    pub scale: f64,
}

impl Chain {
    pub fn first(&self) -> Option<u32> {
        self.points.first().copied()
    }
    pub fn last(&self) -> Option<u32> {
        self.points.last().copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloseOutcome {
    pub iterations: u32,
    pub closed: bool,
}

fn check_lengths(lengths: &[f64]) -> Result<f64, LayoutError> {
    if lengths.is_empty() {
        return Err(LayoutError::Empty);
    }
    let mut total = 0.0;
    for (index, &value) in lengths.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(LayoutError::InvalidLength { index, value });
        }
        total += value;
    }
    Ok(total)
}

/// Scale that makes the chain, bent into a circle, span `fill` of the
/// shorter viewport side.
pub fn fit_scale(lengths: &[f64], width: f64, height: f64, fill: f64) -> Option<f64> {
    let total = check_lengths(lengths).ok()?;
    if !(width > 0.0 && height > 0.0 && fill > 0.0) {
        return None;
    }
    let diameter = total / PI;
    Some(width.min(height) * fill / diameter)
}

/// Whether the lengths can form a closed polygon: at least three sides and
/// the longest strictly shorter than all the others together.
pub fn check_closable(lengths: &[f64]) -> Result<(), LayoutError> {
    let total = check_lengths(lengths)?;
    if lengths.len() < 3 {
        return Err(LayoutError::TooFewSides { got: lengths.len() });
    }
    let longest = lengths.iter().cloned().fold(0.0, f64::max);
    let rest = total - longest;
    if rest <= longest {
        return Err(LayoutError::NotClosable { longest, rest });
    }
    Ok(())
}

/// Appends a straight horizontal chain to `g`: one point at
/// `(margin, margin)` and one more per length, joined by fixed-length
/// segments coloured from the palette.
pub fn lay_out_chain(g: &mut Linkage, lengths: &[f64], cfg: &LayoutConfig) -> Result<Chain, LayoutError> {
    check_lengths(lengths)?;
    let scale = fit_scale(lengths, cfg.viewport_width, cfg.viewport_height, cfg.fill)
        .ok_or(LayoutError::InvalidViewport)?;
    let mut x = cfg.margin;
    let y = cfg.margin;
    let mut points = Vec::with_capacity(lengths.len() + 1);
    let first = g.add_point(x, y);
    g.set_point_color(first, cfg.point_color);
    points.push(first);
    for (i, len) in lengths.iter().enumerate() {
        x += len * scale;
        let p = g.add_point(x, y);
        g.set_point_color(p, cfg.point_color);
        let prev = points[points.len() - 1];
        if let Some(sid) = g.add_segment(prev, p, true) {
            g.set_segment_style(sid, cfg.segment_color(i), cfg.line_width);
        }
        points.push(p);
    }
    log::debug!("laid out {} links at scale {:.4}", lengths.len(), scale);
    Ok(Chain { points, scale })
}

/// Drags `last` to `staging`, then onto `first` again and again until the two
/// meet, and fuses `first` into `last`.
///
/// Each drag pulls the chain after it, `first` included, so the gap shrinks
/// over several rounds. If it does not close within `max_iterations` the
/// points are left unmerged and `closed` is false.
pub fn auto_close(
    g: &mut Linkage,
    first: u32,
    last: u32,
    staging: Vec2,
    cfg: &CloseConfig,
) -> Option<CloseOutcome> {
    if first == last {
        return None;
    }
    g.live_point(first)?;
    if !g.move_point(last, staging.x, staging.y) {
        return None;
    }
    let gap = |g: &Linkage| -> Option<f64> {
        Some(distance(g.live_point(first)?.pos, g.live_point(last)?.pos))
    };
    let mut iterations = 0;
    while gap(g)? > cfg.tolerance && iterations < cfg.max_iterations {
        let target = g.live_point(first)?.pos;
        g.move_point(last, target.x, target.y);
        iterations += 1;
    }
    let closed = gap(g)? <= cfg.tolerance;
    if closed {
        g.merge(last, first);
        log::debug!("closed chain after {} iterations", iterations);
    } else {
        log::warn!(
            "chain did not close after {} iterations (gap {:.6})",
            iterations,
            gap(g).unwrap_or(f64::NAN)
        );
    }
    Some(CloseOutcome { iterations, closed })
}
