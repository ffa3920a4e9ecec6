use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Angle measured against the positive x axis, kept in both units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Angle {
    pub rad: f64,
    pub deg: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Point {
    pub pos: Vec2,
    pub fixed: bool,
    pub color: Color,
    pub label: String,
    // Incident segment ids in attach order; propagation walks them in this order.
    pub segments: Vec<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Segment {
    pub a: u32,
    pub b: u32,
    pub fix_length: bool,
    // Target length for fixed segments; live distance otherwise.
    pub length: f64,
    pub angle: Angle,
    pub color: Color,
    pub width: f32,
}

impl Segment {
    /// Endpoint on the far side of `p`. A self-loop answers `p` itself.
    pub fn other(&self, p: u32) -> u32 {
        if self.a == p {
            self.b
        } else {
            self.a
        }
    }

    pub(crate) fn replace_endpoint(&mut self, from: u32, to: u32) {
        if self.a == from {
            self.a = to;
        }
        if self.b == from {
            self.b = to;
        }
    }
}

pub struct PointArrays {
    pub ids: Vec<u32>,
    pub positions: Vec<f64>,
    pub rgb: Vec<u8>,
    pub fixed: Vec<u8>,
}

pub struct SegmentArrays {
    pub ids: Vec<u32>,
    pub endpoints: Vec<u32>,
    pub rgb: Vec<u8>,
    pub widths: Vec<f32>,
    pub fix_length: Vec<u8>,
}

/// Keys held during a frame, in the order the pan offset is resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoveReport {
    /// Points whose coordinate was written, in traversal order. May repeat
    /// under the path-locked policy.
    pub moved: Vec<u32>,
}

impl MoveReport {
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty()
    }
}
