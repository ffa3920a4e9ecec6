use crate::error;
use crate::interop::{arr_f32, arr_f64, arr_u32, arr_u8, new_obj, set_kv};
use crate::Linkage;
use linkage::algorithms::layout::{auto_close, check_closable, CloseOutcome};
use linkage::config::{CloseConfig, LayoutConfig, PropagationPolicy};
use linkage::geometry::limits;
use linkage::model::{Color, PanKeys, Vec2};
use serde::Serialize;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Routes core log output to the browser console. `level` is one of
/// off, error, warn, info, debug, trace.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> bool {
    match level.parse::<log::LevelFilter>() {
        Ok(filter) => {
            crate::console::init(filter);
            true
        }
        Err(_) => false,
    }
}

fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    // plain objects rather than ES Maps, so the output round-trips through JSON
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible()).unwrap_or(JsValue::NULL)
}

fn check_xy(x: f64, y: f64) -> Option<JsValue> {
    if !x.is_finite() {
        return Some(error::non_finite("x"));
    }
    if !y.is_finite() {
        return Some(error::non_finite("y"));
    }
    if !limits::in_coord_bounds(x) {
        return Some(error::out_of_range("x", limits::COORD_MIN, limits::COORD_MAX, x));
    }
    if !limits::in_coord_bounds(y) {
        return Some(error::out_of_range("y", limits::COORD_MIN, limits::COORD_MAX, y));
    }
    None
}

fn outcome_obj(out: &CloseOutcome) -> JsValue {
    let obj = new_obj();
    set_kv(&obj, "iterations", &JsValue::from_f64(out.iterations as f64));
    set_kv(&obj, "closed", &JsValue::from_bool(out.closed));
    obj.into()
}

#[wasm_bindgen]
impl Linkage {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Linkage {
        crate::Linkage::rs_new()
    }
    pub fn geom_version(&self) -> u64 {
        self.rs_geom_version()
    }

    // Points
    pub fn add_point(&mut self, x: f64, y: f64) -> u32 {
        self.inner.add_point(x, y)
    }
    pub fn add_point_res(&mut self, x: f64, y: f64) -> JsValue {
        if let Some(e) = check_xy(x, y) {
            return e;
        }
        match self.inner.try_add_point(x, y) {
            Some(id) => error::ok(JsValue::from_f64(id as f64)),
            None => error::non_finite("x"),
        }
    }
    pub fn get_point(&self, id: u32) -> JsValue {
        match self.inner.get_point(id) {
            Some((x, y)) => to_js(&[x, y]),
            None => JsValue::NULL,
        }
    }
    pub fn get_point_res(&self, id: u32) -> JsValue {
        match self.inner.get_point(id) {
            Some((x, y)) => error::ok(to_js(&[x, y])),
            None => error::invalid_id("point", id),
        }
    }
    pub fn point_count(&self) -> u32 {
        self.inner.point_count()
    }
    pub fn set_fixed(&mut self, id: u32, fixed: bool) -> bool {
        self.inner.set_fixed(id, fixed)
    }
    pub fn set_fixed_res(&mut self, id: u32, fixed: bool) -> JsValue {
        if self.inner.get_point(id).is_none() {
            return error::invalid_id("point", id);
        }
        error::ok(JsValue::from_bool(self.inner.set_fixed(id, fixed)))
    }
    pub fn set_point_color(&mut self, id: u32, r: u8, g: u8, b: u8) -> bool {
        self.inner.set_point_color(id, Color::rgb(r, g, b))
    }
    pub fn set_point_label(&mut self, id: u32, label: &str) -> bool {
        self.inner.set_point_label(id, label)
    }
    pub fn set_point_label_res(&mut self, id: u32, label: &str) -> JsValue {
        if self.inner.get_point(id).is_none() {
            return error::invalid_id("point", id);
        }
        if label.len() > limits::LABEL_MAX {
            return error::out_of_range("label", 0.0, limits::LABEL_MAX as f64, label.len() as f64);
        }
        error::ok(JsValue::from_bool(self.inner.set_point_label(id, label)))
    }

    // Segments
    pub fn add_segment(&mut self, a: u32, b: u32, fix_length: bool) -> Option<u32> {
        self.inner.add_segment(a, b, fix_length)
    }
    pub fn add_segment_res(&mut self, a: u32, b: u32, fix_length: bool) -> JsValue {
        if self.inner.get_point(a).is_none() {
            return error::invalid_id("point", a);
        }
        if self.inner.get_point(b).is_none() {
            return error::invalid_id("point", b);
        }
        if a == b {
            return error::err("invalid_segment", "segment endpoints cannot be the same point", None);
        }
        match self.inner.add_segment(a, b, fix_length) {
            Some(sid) => error::ok(JsValue::from_f64(sid as f64)),
            None => error::err("invalid_segment", "failed to add segment", None),
        }
    }
    pub fn segment_count(&self) -> u32 {
        self.inner.segment_count()
    }
    pub fn set_segment_style(&mut self, id: u32, r: u8, g: u8, b: u8, width: f32) -> bool {
        self.inner.set_segment_style(id, Color::rgb(r, g, b), width)
    }
    pub fn set_segment_style_res(&mut self, id: u32, r: u8, g: u8, b: u8, width: f32) -> JsValue {
        if self.inner.segment(id).is_none() {
            return error::invalid_id("segment", id);
        }
        if !width.is_finite() {
            return error::non_finite("width");
        }
        if !limits::in_width_bounds(width) {
            return error::out_of_range("width", 0.0, limits::WIDTH_MAX as f64, width as f64);
        }
        error::ok(JsValue::from_bool(self.inner.set_segment_style(id, Color::rgb(r, g, b), width)))
    }
    pub fn get_segment(&self, id: u32) -> JsValue {
        match self.inner.get_segment(id) {
            Some(((ax, ay), (bx, by))) => to_js(&[ax, ay, bx, by]),
            None => JsValue::NULL,
        }
    }
    pub fn get_segment_res(&self, id: u32) -> JsValue {
        match self.inner.get_segment(id) {
            Some(((ax, ay), (bx, by))) => error::ok(to_js(&[ax, ay, bx, by])),
            None => error::invalid_id("segment", id),
        }
    }
    pub fn segment_length(&self, id: u32) -> JsValue {
        match self.inner.segment(id) {
            Some(s) => JsValue::from_f64(s.length),
            None => JsValue::NULL,
        }
    }
    /// Angle between two segments in degrees; `smallest` folds it into [0, 180].
    pub fn angle_between(&self, s1: u32, s2: u32, smallest: bool) -> JsValue {
        match self.inner.angle_between_segments(s1, s2, smallest) {
            Some(a) => JsValue::from_f64(a.deg),
            None => JsValue::NULL,
        }
    }

    // Moves
    pub fn move_point(&mut self, id: u32, x: f64, y: f64) -> bool {
        self.inner.move_point(id, x, y)
    }
    pub fn move_point_res(&mut self, id: u32, x: f64, y: f64) -> JsValue {
        if let Some(e) = check_xy(x, y) {
            return e;
        }
        match self.inner.move_point_report(id, x, y) {
            Some(report) => error::ok(arr_u32(&report.moved).into()),
            None => error::invalid_id("point", id),
        }
    }
    pub fn force_move(&mut self, id: u32, dx: f64, dy: f64) -> bool {
        self.inner.force_move(id, dx, dy)
    }
    pub fn pan(&mut self, dx: f64, dy: f64) -> u32 {
        self.inner.pan(dx, dy)
    }
    pub fn pan_res(&mut self, dx: f64, dy: f64) -> JsValue {
        if !dx.is_finite() {
            return error::non_finite("dx");
        }
        if !dy.is_finite() {
            return error::non_finite("dy");
        }
        error::ok(JsValue::from_f64(self.inner.pan(dx, dy) as f64))
    }
    /// One frame of keyboard panning at the configured step.
    pub fn pan_keys(&mut self, up: bool, down: bool, left: bool, right: bool) -> u32 {
        let keys = PanKeys { up, down, left, right };
        self.inner.pan_keys(keys, self.layout.pan_step)
    }

    // Merge
    pub fn merge(&mut self, a: u32, b: u32) -> bool {
        self.inner.merge(a, b)
    }
    pub fn merge_res(&mut self, a: u32, b: u32) -> JsValue {
        if self.inner.get_point(a).is_none() {
            return error::invalid_id("point", a);
        }
        if self.inner.get_point(b).is_none() {
            return error::invalid_id("point", b);
        }
        if a == b {
            return error::invalid_merge(a, b);
        }
        error::ok(JsValue::from_bool(self.inner.merge(a, b)))
    }

    // Typed arrays getters
    pub fn get_point_data(&self) -> JsValue {
        let pa = self.inner.point_arrays();
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&pa.ids).into());
        set_kv(&obj, "positions", &arr_f64(&pa.positions).into());
        set_kv(&obj, "rgb", &arr_u8(&pa.rgb).into());
        set_kv(&obj, "fixed", &arr_u8(&pa.fixed).into());
        obj.into()
    }
    pub fn get_segment_data(&self) -> JsValue {
        let sa = self.inner.segment_arrays();
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&sa.ids).into());
        set_kv(&obj, "endpoints", &arr_u32(&sa.endpoints).into());
        set_kv(&obj, "rgb", &arr_u8(&sa.rgb).into());
        set_kv(&obj, "widths", &arr_f32(&sa.widths).into());
        set_kv(&obj, "fix_length", &arr_u8(&sa.fix_length).into());
        obj.into()
    }

    // Picking
    pub fn pick_point(&self, x: f64, y: f64, radius: f64) -> JsValue {
        match self.inner.pick_point(x, y, radius, None) {
            Some(id) => JsValue::from_f64(id as f64),
            None => JsValue::NULL,
        }
    }
    pub fn pick_point_res(&self, x: f64, y: f64, radius: f64) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        if !radius.is_finite() {
            return error::non_finite("radius");
        }
        if radius < 0.0 {
            return error::out_of_range("radius", 0.0, f64::INFINITY, radius);
        }
        error::ok(self.pick_point(x, y, radius))
    }
    /// Point under the cursor other than `active`, within the configured
    /// point radius; the drop target when a dragged point is released.
    pub fn pick_merge_target(&self, active: u32, x: f64, y: f64) -> JsValue {
        match self.inner.pick_point(x, y, self.layout.point_radius, Some(active)) {
            Some(id) => JsValue::from_f64(id as f64),
            None => JsValue::NULL,
        }
    }

    // Layout
    pub fn set_layout_config(&mut self, cfg: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<LayoutConfig>(cfg) {
            Ok(c) => {
                self.layout = c;
                true
            }
            Err(e) => {
                log::warn!("rejected layout config: {}", e);
                false
            }
        }
    }
    pub fn get_layout_config(&self) -> JsValue {
        to_js(&self.layout)
    }
    pub fn set_path_locked(&mut self, on: bool) {
        let policy = if on { PropagationPolicy::PathLocked } else { PropagationPolicy::VisitOnce };
        self.inner.set_policy(policy);
    }
    /// Replaces the graph with a straight chain of `lengths`; returns the
    /// chain's point ids, first to last.
    pub fn lay_out(&mut self, lengths: &[f64]) -> JsValue {
        let v = self.lay_out_res(lengths);
        js_sys::Reflect::get(&v, &JsValue::from_str("value")).unwrap_or(JsValue::NULL)
    }
    pub fn lay_out_res(&mut self, lengths: &[f64]) -> JsValue {
        let solver = self.inner.solver();
        match linkage::Linkage::from_lengths(lengths, &self.layout) {
            Ok((mut g, chain)) => {
                g.set_policy(solver.policy);
                let ids = arr_u32(&chain.points);
                self.inner = g;
                self.chain = Some(chain);
                error::ok(ids.into())
            }
            Err(e) => error::layout(&e),
        }
    }
    pub fn check_closable_res(&self, lengths: &[f64]) -> JsValue {
        match check_closable(lengths) {
            Ok(()) => error::ok(JsValue::from_bool(true)),
            Err(e) => error::layout(&e),
        }
    }
    pub fn chain_scale(&self) -> JsValue {
        match &self.chain {
            Some(c) => JsValue::from_f64(c.scale),
            None => JsValue::NULL,
        }
    }
    /// Closes the last laid out chain into a ring, staging its free end at
    /// `(staging_x, staging_y)` first.
    pub fn auto_close(&mut self, staging_x: f64, staging_y: f64) -> JsValue {
        if let Some(e) = check_xy(staging_x, staging_y) {
            return e;
        }
        let (first, last) = match self.chain.as_ref().and_then(|c| Some((c.first()?, c.last()?))) {
            Some(ends) => ends,
            None => return error::no_chain(),
        };
        let staging = Vec2::new(staging_x, staging_y);
        match auto_close(&mut self.inner, first, last, staging, &CloseConfig::default()) {
            Some(out) => {
                if out.closed {
                    self.chain = None;
                }
                error::ok(outcome_obj(&out))
            }
            None => error::no_chain(),
        }
    }

    // JSON + export
    pub fn to_json(&self) -> JsValue {
        to_js(&self.inner.to_json_value())
    }
    pub fn from_json(&mut self, v: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<serde_json::Value>(v) {
            Ok(val) => {
                let ok = self.inner.from_json_value(val);
                if ok {
                    self.chain = None;
                }
                ok
            }
            Err(_) => false,
        }
    }
    pub fn from_json_res(&mut self, v: JsValue) -> JsValue {
        match serde_wasm_bindgen::from_value::<serde_json::Value>(v) {
            Ok(val) => match self.inner.from_json_value_strict(val) {
                Ok(()) => {
                    self.chain = None;
                    error::ok(JsValue::from_bool(true))
                }
                Err(e) => error::err(e.code(), e.to_string(), None),
            },
            Err(e) => error::err("json_parse", format!("{}", e), None),
        }
    }
    pub fn to_openscad(&self, scale: f64, height: f64) -> String {
        self.inner.to_openscad(scale, height)
    }
    pub fn summary(&self) -> JsValue {
        to_js(&self.inner.summary())
    }
    pub fn clear(&mut self) {
        self.inner.clear();
        self.chain = None;
    }
}

impl Default for Linkage {
    fn default() -> Self {
        Self::new()
    }
}
