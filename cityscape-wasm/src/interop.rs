use cityscape::geometry::limits::{point_in_bounds, COORD_MAX, COORD_MIN};
use cityscape::Point;
use js_sys::Float64Array;
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::JsValue;

use crate::error;

/// Flat `[x0, y0, x1, y1, ...]` to points, rejecting odd lengths, oversize
/// input and anything outside the coordinate range.
pub fn read_points(param: &str, arr: &Float64Array, cap: usize) -> Result<Vec<Point>, JsValue> {
    let len = arr.length() as usize;
    if len % 2 == 1 {
        return Err(error::invalid_array(param));
    }
    if len / 2 > cap {
        return Err(error::too_large(param, cap, len / 2));
    }
    let mut buf = vec![0.0f64; len];
    arr.copy_to(&mut buf);
    if buf.iter().any(|v| !v.is_finite()) {
        return Err(error::non_finite(param));
    }
    let pts: Vec<Point> = buf.chunks(2).map(|c| Point::new(c[0], c[1])).collect();
    check_points(param, &pts)?;
    Ok(pts)
}

pub fn check_points(param: &str, pts: &[Point]) -> Result<(), JsValue> {
    match pts.iter().find(|p| !point_in_bounds(p)) {
        None => Ok(()),
        Some(p) if !p.is_finite() => Err(error::non_finite(param)),
        Some(p) => {
            let got = if (COORD_MIN..=COORD_MAX).contains(&p.x) { p.y } else { p.x };
            Err(error::out_of_range(param, COORD_MIN, COORD_MAX, got))
        }
    }
}

pub fn write_points(pts: &[Point]) -> Float64Array {
    let flat: Vec<f64> = pts.iter().flat_map(|p| [p.x, p.y]).collect();
    let arr = Float64Array::new_with_length(flat.len() as u32);
    arr.copy_from(&flat);
    arr
}

pub fn from_js<T: DeserializeOwned>(param: &str, v: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(v).map_err(|e| error::invalid_input(param, e))
}

pub fn to_js<T: Serialize>(v: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(v).map_err(error::serialize)
}

/// `undefined` and `null` both mean "use the default".
pub fn is_absent(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}
