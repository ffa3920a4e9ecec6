use crate::model::Color;
use serde::{Deserialize, Serialize};

/// How far a single `move_point` call lets propagation revisit points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationPolicy {
    /// Only points on the current traversal path are locked. A point is
    /// released once its own neighbours are done, so a later sibling branch
    /// can pull it again.
    #[default]
    PathLocked,
    /// A moved point stays locked until the call returns. Every point moves
    /// at most once per call.
    VisitOnce,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub policy: PropagationPolicy,
}

/// Initial layout of a chain built from link lengths.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
    // share of the shorter viewport side the closed chain should span
    pub fill: f64,
    pub margin: f64,
    pub pan_step: f64,
    pub point_radius: f64,
    pub line_width: f32,
    pub point_color: Color,
    pub selected_color: Color,
    pub palette: Vec<Color>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            fill: 0.8,
            margin: 50.0,
            pan_step: 5.0,
            point_radius: 10.0,
            line_width: 5.0,
            point_color: Color::rgb(200, 200, 200),
            selected_color: Color::rgb(200, 0, 0),
            palette: vec![
                Color::rgb(255, 255, 255),
                Color::rgb(0, 255, 0),
                Color::rgb(0, 0, 255),
                Color::rgb(255, 255, 0),
                Color::rgb(0, 255, 255),
                Color::rgb(192, 192, 192),
                Color::rgb(128, 128, 128),
                Color::rgb(128, 0, 0),
                Color::rgb(128, 128, 0),
                Color::rgb(0, 128, 0),
                Color::rgb(128, 0, 128),
                Color::rgb(0, 128, 128),
                Color::rgb(0, 0, 128),
            ],
        }
    }
}

impl LayoutConfig {
    /// Colour of the `i`th segment; cycles through the palette.
    pub fn segment_color(&self, i: usize) -> Color {
        if self.palette.is_empty() {
            return Color::rgb(0, 255, 0);
        }
        self.palette[i % self.palette.len()]
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloseConfig {
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl Default for CloseConfig {
    fn default() -> Self {
        CloseConfig { max_iterations: 10_000, tolerance: crate::geometry::tolerance::EPS_POS }
    }
}
