pub mod config;
pub mod model;
pub mod geometry {
    pub mod angle;
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod layout;
    pub mod merge;
    pub mod picking;
    pub mod propagate;
}
pub mod export;
mod json;

pub use json::JsonError;

use config::{LayoutConfig, PropagationPolicy, SolverConfig};
use geometry::angle::{angle_between, direction_angle};
use geometry::math::distance;
use model::{
    Angle, Color, MoveReport, PanKeys, Point, PointArrays, Segment, SegmentArrays, Vec2,
};
use std::collections::HashSet;

#[derive(Clone, Debug, Default)]
pub struct DirtyState {
    pub since_ver: u64,
    pub points_added: HashSet<u32>,
    pub points_removed: HashSet<u32>,
    pub points_moved: HashSet<u32>,
    pub segments_added: HashSet<u32>,
    pub segments_modified: HashSet<u32>,
}

/// A graph of points joined by (optionally) fixed-length segments.
///
/// Points and segments live in arenas indexed by their `u32` id. Removing a
/// point (through [`Linkage::merge`]) clears its slot; ids are never reused.
#[derive(Clone, Debug)]
pub struct Linkage {
    pub(crate) points: Vec<Option<Point>>,     // id is index
    pub(crate) segments: Vec<Option<Segment>>, // id is index
    pub(crate) solver: SolverConfig,
    pub(crate) geom_ver: u64,
    pub(crate) dirty: DirtyState,
}

impl Default for Linkage {
    fn default() -> Self {
        Self::new()
    }
}

impl Linkage {
    pub fn new() -> Self {
        Self::with_solver(SolverConfig::default())
    }
    pub fn with_solver(solver: SolverConfig) -> Self {
        Linkage {
            points: Vec::new(),
            segments: Vec::new(),
            solver,
            geom_ver: 1,
            dirty: DirtyState {
                since_ver: 1,
                ..Default::default()
            },
        }
    }

    /// Chain of `lengths.len()` fixed-length links laid out on a horizontal
    /// line; see [`algorithms::layout::lay_out_chain`].
    pub fn from_lengths(
        lengths: &[f64],
        cfg: &LayoutConfig,
    ) -> Result<(Self, algorithms::layout::Chain), algorithms::layout::LayoutError> {
        let mut g = Linkage::new();
        let chain = algorithms::layout::lay_out_chain(&mut g, lengths, cfg)?;
        Ok((g, chain))
    }

    pub fn geom_version(&self) -> u64 {
        self.geom_ver
    }
    pub fn solver(&self) -> SolverConfig {
        self.solver
    }
    pub fn set_policy(&mut self, policy: PropagationPolicy) {
        self.solver.policy = policy;
    }
    pub fn dirty(&self) -> &DirtyState {
        &self.dirty
    }
    pub fn dirty_reset(&mut self) {
        self.dirty = DirtyState {
            since_ver: self.geom_ver,
            ..Default::default()
        };
    }

    pub(crate) fn bump(&mut self) {
        self.geom_ver = self.geom_ver.wrapping_add(1);
    }

    pub(crate) fn live_point(&self, id: u32) -> Option<&Point> {
        self.points.get(id as usize).and_then(|p| p.as_ref())
    }
    pub(crate) fn live_segment(&self, id: u32) -> Option<&Segment> {
        self.segments.get(id as usize).and_then(|s| s.as_ref())
    }

    // Writes a coordinate and brings the derived values of incident segments up to date.
    pub(crate) fn place(&mut self, id: u32, pos: Vec2) {
        let incident = match self.points.get_mut(id as usize).and_then(|p| p.as_mut()) {
            Some(p) => {
                p.pos = pos;
                p.segments.clone()
            }
            None => return,
        };
        self.dirty.points_moved.insert(id);
        for sid in incident {
            self.refresh_segment(sid);
        }
    }

    pub(crate) fn refresh_segment(&mut self, sid: u32) {
        let (a, b) = match self.live_segment(sid) {
            Some(s) => (s.a, s.b),
            None => return,
        };
        let (pa, pb) = match (self.live_point(a), self.live_point(b)) {
            (Some(pa), Some(pb)) => (pa.pos, pb.pos),
            _ => return,
        };
        if let Some(Some(s)) = self.segments.get_mut(sid as usize) {
            s.angle = direction_angle(pa, pb);
            if !s.fix_length {
                s.length = distance(pa, pb);
            }
        }
        self.dirty.segments_modified.insert(sid);
    }

    // Points
    /// Appends a point and returns its id. Coordinates are stored as given,
    /// unlike `move_point` and `force_move` which reject non-finite input;
    /// use [`Linkage::try_add_point`] for untrusted values.
    pub fn add_point(&mut self, x: f64, y: f64) -> u32 {
        let id = self.points.len() as u32;
        self.points.push(Some(Point {
            pos: Vec2::new(x, y),
            fixed: false,
            color: Color::rgb(255, 255, 255),
            label: String::new(),
            segments: Vec::new(),
        }));
        self.dirty.points_added.insert(id);
        self.bump();
        id
    }
    /// `add_point` for untrusted input: `None` for a NaN or infinite coordinate.
    pub fn try_add_point(&mut self, x: f64, y: f64) -> Option<u32> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some(self.add_point(x, y))
    }
    pub fn get_point(&self, id: u32) -> Option<(f64, f64)> {
        self.live_point(id).map(|p| (p.pos.x, p.pos.y))
    }
    pub fn point(&self, id: u32) -> Option<&Point> {
        self.live_point(id)
    }
    pub fn point_ids(&self) -> Vec<u32> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_some())
            .map(|(i, _)| i as u32)
            .collect()
    }
    pub fn point_count(&self) -> u32 {
        self.points.iter().filter(|p| p.is_some()).count() as u32
    }
    pub fn set_fixed(&mut self, id: u32, fixed: bool) -> bool {
        match self.points.get_mut(id as usize).and_then(|p| p.as_mut()) {
            Some(p) => {
                p.fixed = fixed;
                true
            }
            None => false,
        }
    }
    pub fn is_fixed(&self, id: u32) -> bool {
        self.live_point(id).map_or(false, |p| p.fixed)
    }
    pub fn set_point_color(&mut self, id: u32, color: Color) -> bool {
        match self.points.get_mut(id as usize).and_then(|p| p.as_mut()) {
            Some(p) => {
                p.color = color;
                true
            }
            None => false,
        }
    }
    pub fn set_point_label(&mut self, id: u32, label: &str) -> bool {
        match self.points.get_mut(id as usize).and_then(|p| p.as_mut()) {
            Some(p) => {
                p.label = label.to_string();
                true
            }
            None => false,
        }
    }
    pub fn incident_segments(&self, id: u32) -> Option<&[u32]> {
        self.live_point(id).map(|p| p.segments.as_slice())
    }

    // Segments
    /// Joins `a` and `b`. The current distance becomes the segment length;
    /// with `fix_length` it is kept from then on.
    pub fn add_segment(&mut self, a: u32, b: u32, fix_length: bool) -> Option<u32> {
        if a == b {
            return None;
        }
        let pa = self.live_point(a)?.pos;
        let pb = self.live_point(b)?.pos;
        let id = self.segments.len() as u32;
        self.segments.push(Some(Segment {
            a,
            b,
            fix_length,
            length: distance(pa, pb),
            angle: direction_angle(pa, pb),
            color: Color::rgb(0, 255, 0),
            width: 1.0,
        }));
        for end in [a, b] {
            if let Some(Some(p)) = self.points.get_mut(end as usize) {
                p.segments.push(id);
            }
        }
        self.dirty.segments_added.insert(id);
        self.bump();
        Some(id)
    }
    pub fn segment(&self, id: u32) -> Option<&Segment> {
        self.live_segment(id)
    }
    /// Endpoint coordinates of a segment, `a` first.
    pub fn get_segment(&self, id: u32) -> Option<((f64, f64), (f64, f64))> {
        let s = self.live_segment(id)?;
        let a = self.live_point(s.a)?.pos;
        let b = self.live_point(s.b)?.pos;
        Some(((a.x, a.y), (b.x, b.y)))
    }
    pub fn segment_count(&self) -> u32 {
        self.segments.iter().filter(|s| s.is_some()).count() as u32
    }
    pub fn set_segment_style(&mut self, id: u32, color: Color, width: f32) -> bool {
        if !width.is_finite() || width <= 0.0 {
            return false;
        }
        match self.segments.get_mut(id as usize).and_then(|s| s.as_mut()) {
            Some(s) => {
                s.color = color;
                s.width = width;
                true
            }
            None => false,
        }
    }
    /// Live distance between the endpoints, as opposed to the stored length.
    pub fn current_length(&self, id: u32) -> Option<f64> {
        let s = self.live_segment(id)?;
        Some(distance(self.live_point(s.a)?.pos, self.live_point(s.b)?.pos))
    }
    pub fn angle_between_segments(&self, s1: u32, s2: u32, smallest: bool) -> Option<Angle> {
        let a = self.live_segment(s1)?.angle;
        let b = self.live_segment(s2)?.angle;
        Some(angle_between(a, b, smallest))
    }

    // Constrained edits
    /// Drags `id` to `(x, y)` and pulls every point reachable through
    /// fixed-length segments back onto its link length.
    ///
    /// Returns `false` for an unknown id or a non-finite coordinate. A fixed
    /// point is left where it is and the call still returns `true`.
    pub fn move_point(&mut self, id: u32, x: f64, y: f64) -> bool {
        self.move_point_report(id, x, y).is_some()
    }
    pub fn move_point_report(&mut self, id: u32, x: f64, y: f64) -> Option<MoveReport> {
        algorithms::propagate::propagate(self, id, Vec2::new(x, y))
    }

    /// Shifts one point by an offset, ignoring `fixed` and every length
    /// constraint. Nothing propagates.
    pub fn force_move(&mut self, id: u32, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        let pos = match self.live_point(id) {
            Some(p) => p.pos,
            None => return false,
        };
        self.place(id, geometry::math::translate(pos, dx, dy));
        self.bump();
        true
    }

    /// Rigid translation of the whole scene.
    pub fn pan(&mut self, dx: f64, dy: f64) -> u32 {
        let mut count = 0;
        for id in self.point_ids() {
            if self.force_move(id, dx, dy) {
                count += 1;
            }
        }
        count
    }

    /// Pans by `step` in the direction of the held keys. Down beats up and
    /// right beats left when both are held.
    pub fn pan_keys(&mut self, keys: PanKeys, step: f64) -> u32 {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if keys.up {
            dy = -step;
        }
        if keys.down {
            dy = step;
        }
        if keys.left {
            dx = -step;
        }
        if keys.right {
            dx = step;
        }
        if dx == 0.0 && dy == 0.0 {
            return 0;
        }
        self.pan(dx, dy)
    }

    /// Fuses `b` into `a`; see [`algorithms::merge::merge_points`].
    pub fn merge(&mut self, a: u32, b: u32) -> bool {
        algorithms::merge::merge_points(self, a, b)
    }

    pub fn pick_point(&self, x: f64, y: f64, radius: f64, exclude: Option<u32>) -> Option<u32> {
        algorithms::picking::pick_point_impl(self, x, y, radius, exclude)
    }

    // Snapshot for renderers
    pub fn point_arrays(&self) -> PointArrays {
        let mut ids = Vec::new();
        let mut positions = Vec::new();
        let mut rgb = Vec::new();
        let mut fixed = Vec::new();
        for (i, p) in self.points.iter().enumerate() {
            if let Some(p) = p {
                ids.push(i as u32);
                positions.push(p.pos.x);
                positions.push(p.pos.y);
                rgb.extend_from_slice(&[p.color.r, p.color.g, p.color.b]);
                fixed.push(p.fixed as u8);
            }
        }
        PointArrays { ids, positions, rgb, fixed }
    }
    pub fn segment_arrays(&self) -> SegmentArrays {
        let mut ids = Vec::new();
        let mut endpoints = Vec::new();
        let mut rgb = Vec::new();
        let mut widths = Vec::new();
        let mut fix_length = Vec::new();
        for (i, s) in self.segments.iter().enumerate() {
            if let Some(s) = s {
                ids.push(i as u32);
                endpoints.push(s.a);
                endpoints.push(s.b);
                rgb.extend_from_slice(&[s.color.r, s.color.g, s.color.b]);
                widths.push(s.width);
                fix_length.push(s.fix_length as u8);
            }
        }
        SegmentArrays { ids, endpoints, rgb, widths, fix_length }
    }

    /// One line per segment with its stored length, also written to the log
    /// at debug level.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (i, s) in self.segments.iter().enumerate() {
            if let Some(s) = s {
                let line = format!(
                    "segment {} ({} -> {}) length {:.4}{}",
                    i,
                    s.a,
                    s.b,
                    s.length,
                    if s.fix_length { " fixed" } else { "" }
                );
                log::debug!("{}", line);
                lines.push(line);
            }
        }
        lines
    }

    // JSON
    pub fn to_json_value(&self) -> serde_json::Value {
        json::to_json_impl(self)
    }
    /// Lenient load: segments pointing at missing points are dropped.
    pub fn from_json_value(&mut self, v: serde_json::Value) -> bool {
        json::from_json_impl(self, v)
    }
    pub fn from_json_value_strict(&mut self, v: serde_json::Value) -> Result<(), JsonError> {
        json::from_json_impl_strict(self, v)
    }

    // Export
    pub fn outline(&self, scale: f64) -> Vec<(i64, i64)> {
        export::outline_impl(self, scale)
    }
    pub fn to_openscad(&self, scale: f64, height: f64) -> String {
        export::to_openscad_impl(self, scale, height)
    }

    /// Removes every point and segment. Slots are emptied rather than
    /// dropped, so ids handed out afterwards do not repeat earlier ones.
    pub fn clear(&mut self) {
        for (i, slot) in self.points.iter_mut().enumerate() {
            if slot.take().is_some() {
                let id = i as u32;
                self.dirty.points_added.remove(&id);
                self.dirty.points_moved.remove(&id);
                self.dirty.points_removed.insert(id);
            }
        }
        for slot in self.segments.iter_mut() {
            slot.take();
        }
        self.dirty.segments_added.clear();
        self.dirty.segments_modified.clear();
        self.bump();
    }
}
