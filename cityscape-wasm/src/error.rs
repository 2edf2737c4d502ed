use cityscape::{ConfigError, SplitError};
use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;

fn set_kv(obj: &Object, k: &str, v: &JsValue) { let _ = Reflect::set(obj, &JsValue::from_str(k), v); }

fn new_obj() -> Object { Object::new() }

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

/// Envelope for an operation that already produced its error envelope on failure.
#[inline]
pub fn wrap(r: Result<JsValue, JsValue>) -> JsValue {
    match r {
        Ok(v) => ok(v),
        Err(e) => e,
    }
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
pub fn too_large(param: &str, cap: usize, got: usize) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "cap", &JsValue::from_f64(cap as f64));
    set_kv(&d, "got", &JsValue::from_f64(got as f64));
    err("too_large", format!("parameter '{}' exceeds {} items", param, cap), Some(d.into()))
}

#[inline]
pub fn invalid_array(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("invalid_array", format!("'{}' must hold x,y pairs", param), Some(d.into()))
}

#[inline]
pub fn invalid_input(param: &str, message: impl std::fmt::Display) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("invalid_input", format!("'{}': {}", param, message), Some(d.into()))
}

pub fn config(param: &str, e: &ConfigError) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    let code = match e {
        ConfigError::Json(_) => "json_parse",
        ConfigError::OutOfRange { .. } | ConfigError::NotPositive { .. } => "invalid_config",
    };
    err(code, e.to_string(), Some(d.into()))
}

pub fn split(e: &SplitError) -> JsValue {
    let data = match e {
        SplitError::MultipleCrossings(n) => {
            let d = new_obj(); set_kv(&d, "crossings", &JsValue::from_f64(*n as f64));
            Some(d.into())
        }
        _ => None,
    };
    err(e.code(), e.to_string(), data)
}

#[inline]
pub fn serialize(e: impl std::fmt::Display) -> JsValue {
    err("serialize", e.to_string(), None)
}
