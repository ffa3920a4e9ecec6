use crate::interop::{new_obj, set_kv};
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn out_of_range(param: &str, min: f64, max: f64, got: f64) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "min", &JsValue::from_f64(min));
    set_kv(&d, "max", &JsValue::from_f64(max));
    set_kv(&d, "got", &JsValue::from_f64(got));
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(kind: &str, id: u32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "id", &JsValue::from_f64(id as f64));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

#[inline]
pub fn invalid_merge(a: u32, b: u32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "a", &JsValue::from_f64(a as f64));
    set_kv(&d, "b", &JsValue::from_f64(b as f64));
    err("invalid_merge", "cannot merge a point into itself", Some(d.into()))
}

pub fn layout(e: &linkage::algorithms::layout::LayoutError) -> JsValue {
    use linkage::algorithms::layout::LayoutError;
    let code = match e {
        LayoutError::TooFewSides { .. } | LayoutError::NotClosable { .. } => "not_closable",
        LayoutError::InvalidViewport => "invalid_config",
        LayoutError::Empty | LayoutError::InvalidLength { .. } => "invalid_length",
    };
    err(code, e.to_string(), None)
}

#[inline]
pub fn no_chain() -> JsValue {
    err("no_chain", "no chain has been laid out", None)
}
