use crate::geometry::angle::direction_angle;
use crate::geometry::limits;
use crate::geometry::math::distance;
use crate::model::{Color, Point, Segment, Vec2};
use crate::Linkage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

pub const DOC_VERSION: u32 = 1;

/// Reason a strict load was rejected. `code()` is a stable short name for
/// hosts that surface it to users.
#[derive(Clone, Debug, PartialEq)]
pub enum JsonError {
    Parse(String),
    UnsupportedVersion(u32),
    CapsExceeded(String),
    OutOfBounds(&'static str),
    InvalidStructure(String),
}

impl JsonError {
    pub fn code(&self) -> &'static str {
        match self {
            JsonError::Parse(_) => "json_parse",
            JsonError::UnsupportedVersion(_) => "unsupported_version",
            JsonError::CapsExceeded(_) => "caps_exceeded",
            JsonError::OutOfBounds(_) => "out_of_bounds",
            JsonError::InvalidStructure(_) => "invalid_structure",
        }
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonError::Parse(m) => write!(f, "malformed document: {}", m),
            JsonError::UnsupportedVersion(v) => write!(f, "unsupported document version {}", v),
            JsonError::CapsExceeded(m) => write!(f, "document too large: {}", m),
            JsonError::OutOfBounds(what) => write!(f, "{} out of bounds", what),
            JsonError::InvalidStructure(m) => write!(f, "invalid structure: {}", m),
        }
    }
}

impl std::error::Error for JsonError {}

#[derive(Serialize, Deserialize)]
struct PointDoc {
    id: u32,
    x: f64,
    y: f64,
    #[serde(default)]
    fixed: bool,
    color: Option<Color>,
    #[serde(default)]
    label: String,
    // incidence order; rebuilt from segment ids when absent
    segments: Option<Vec<u32>>,
}

#[derive(Serialize, Deserialize)]
struct SegmentDoc {
    id: u32,
    a: u32,
    b: u32,
    #[serde(default)]
    fix_length: bool,
    length: Option<f64>,
    color: Option<Color>,
    width: Option<f32>,
}

#[derive(Serialize, Deserialize)]
struct Doc {
    version: u32,
    points: Vec<PointDoc>,
    segments: Vec<SegmentDoc>,
}

pub fn to_json_impl(g: &Linkage) -> Value {
    let mut points = Vec::new();
    for (i, p) in g.points.iter().enumerate() {
        if let Some(p) = p {
            points.push(PointDoc {
                id: i as u32,
                x: p.pos.x,
                y: p.pos.y,
                fixed: p.fixed,
                color: Some(p.color),
                label: p.label.clone(),
                segments: Some(p.segments.clone()),
            });
        }
    }
    let mut segments = Vec::new();
    for (i, s) in g.segments.iter().enumerate() {
        if let Some(s) = s {
            segments.push(SegmentDoc {
                id: i as u32,
                a: s.a,
                b: s.b,
                fix_length: s.fix_length,
                length: Some(s.length),
                color: Some(s.color),
                width: Some(s.width),
            });
        }
    }
    let doc = Doc { version: DOC_VERSION, points, segments };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

// Arenas decoded from a document, swapped into the graph only once complete.
struct Decoded {
    points: Vec<Option<Point>>,
    segments: Vec<Option<Segment>>,
}

// `lenient` drops segments whose endpoints are missing instead of failing.
fn decode(v: Value, lenient: bool) -> Result<Decoded, JsonError> {
    let doc: Doc = serde_json::from_value(v).map_err(|e| JsonError::Parse(e.to_string()))?;
    if doc.version != DOC_VERSION {
        return Err(JsonError::UnsupportedVersion(doc.version));
    }
    if doc.points.len() > limits::MAX_POINTS {
        return Err(JsonError::CapsExceeded(format!("points>{}", limits::MAX_POINTS)));
    }
    if doc.segments.len() > limits::MAX_SEGMENTS {
        return Err(JsonError::CapsExceeded(format!("segments>{}", limits::MAX_SEGMENTS)));
    }
    for p in &doc.points {
        if p.id as usize >= limits::MAX_POINTS {
            return Err(JsonError::CapsExceeded(format!("point id>={}", limits::MAX_POINTS)));
        }
        if !limits::in_coord_bounds(p.x) || !limits::in_coord_bounds(p.y) {
            return Err(JsonError::OutOfBounds("point coordinate"));
        }
        if p.label.len() > limits::LABEL_MAX {
            return Err(JsonError::OutOfBounds("label"));
        }
    }
    for s in &doc.segments {
        if s.id as usize >= limits::MAX_SEGMENTS {
            return Err(JsonError::CapsExceeded(format!("segment id>={}", limits::MAX_SEGMENTS)));
        }
        if let Some(w) = s.width {
            if !limits::in_width_bounds(w) {
                return Err(JsonError::OutOfBounds("width"));
            }
        }
        if let Some(l) = s.length {
            if !limits::in_length_bounds(l) {
                return Err(JsonError::OutOfBounds("length"));
            }
        }
    }

    let max_point = doc.points.iter().map(|p| p.id as usize + 1).max().unwrap_or(0);
    let max_segment = doc.segments.iter().map(|s| s.id as usize + 1).max().unwrap_or(0);
    let mut points: Vec<Option<Point>> = vec![None; max_point];
    let mut segments: Vec<Option<Segment>> = vec![None; max_segment];
    let mut orders: Vec<(u32, Option<Vec<u32>>)> = Vec::new();
    for p in doc.points {
        if points[p.id as usize].is_some() {
            return Err(JsonError::InvalidStructure(format!("duplicate point id {}", p.id)));
        }
        points[p.id as usize] = Some(Point {
            pos: Vec2::new(p.x, p.y),
            fixed: p.fixed,
            color: p.color.unwrap_or(Color::rgb(255, 255, 255)),
            label: p.label,
            segments: Vec::new(),
        });
        orders.push((p.id, p.segments));
    }
    for s in doc.segments {
        let pa = points.get(s.a as usize).and_then(|p| p.as_ref()).map(|p| p.pos);
        let pb = points.get(s.b as usize).and_then(|p| p.as_ref()).map(|p| p.pos);
        let (pa, pb) = match (pa, pb) {
            (Some(pa), Some(pb)) => (pa, pb),
            _ if lenient => continue,
            _ => {
                return Err(JsonError::InvalidStructure(format!(
                    "segment {} references a missing point",
                    s.id
                )))
            }
        };
        if segments[s.id as usize].is_some() {
            return Err(JsonError::InvalidStructure(format!("duplicate segment id {}", s.id)));
        }
        segments[s.id as usize] = Some(Segment {
            a: s.a,
            b: s.b,
            fix_length: s.fix_length,
            length: s.length.filter(|_| s.fix_length).unwrap_or_else(|| distance(pa, pb)),
            angle: direction_angle(pa, pb),
            color: s.color.unwrap_or(Color::rgb(0, 255, 0)),
            width: s.width.unwrap_or(1.0),
        });
    }

    // Incidence lists: the saved order must name exactly the incident segments.
    for (pid, order) in orders {
        let full = incident_in_id_order(&segments, pid);
        let list = match order {
            Some(order) => {
                let mut saved = order.clone();
                saved.sort_unstable();
                if saved == full {
                    order
                } else if lenient {
                    reconcile(order, &full)
                } else {
                    return Err(JsonError::InvalidStructure(format!(
                        "point {} lists segments {:?}, but {:?} touch it",
                        pid, order, full
                    )));
                }
            }
            None => full,
        };
        if let Some(Some(p)) = points.get_mut(pid as usize) {
            p.segments = list;
        }
    }
    Ok(Decoded { points, segments })
}

// Sorted by segment id; a self-loop is listed once per endpoint.
fn incident_in_id_order(segments: &[Option<Segment>], pid: u32) -> Vec<u32> {
    let mut list = Vec::new();
    for (i, s) in segments.iter().enumerate() {
        if let Some(s) = s {
            if s.a == pid {
                list.push(i as u32);
            }
            if s.b == pid {
                list.push(i as u32);
            }
        }
    }
    list
}

// Keeps the saved entries that are real incidences, in saved order, then
// appends whatever is missing in segment id order.
fn reconcile(saved: Vec<u32>, full: &[u32]) -> Vec<u32> {
    let mut left: HashMap<u32, usize> = HashMap::new();
    for &sid in full {
        *left.entry(sid).or_insert(0) += 1;
    }
    let mut list = Vec::with_capacity(full.len());
    for sid in saved.into_iter().chain(full.iter().copied()) {
        if let Some(n) = left.get_mut(&sid) {
            if *n > 0 {
                *n -= 1;
                list.push(sid);
            }
        }
    }
    list
}

fn install(g: &mut Linkage, d: Decoded) {
    g.points = d.points;
    g.segments = d.segments;
    g.dirty_reset();
    g.bump();
}

pub fn from_json_impl(g: &mut Linkage, v: Value) -> bool {
    match decode(v, true) {
        Ok(d) => {
            install(g, d);
            true
        }
        Err(e) => {
            log::warn!("rejected linkage document: {}", e);
            false
        }
    }
}

pub fn from_json_impl_strict(g: &mut Linkage, v: Value) -> Result<(), JsonError> {
    let d = decode(v, false)?;
    install(g, d);
    Ok(())
}
