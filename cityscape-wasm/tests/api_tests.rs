#![cfg(target_arch = "wasm32")]

use cityscape_wasm::*;
use js_sys::{Array, Float64Array, Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn get(v: &JsValue, k: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(k)).unwrap_or(JsValue::UNDEFINED)
}
fn is_ok(v: &JsValue) -> bool { get(v, "ok").as_bool().unwrap_or(false) }
fn err_code(v: &JsValue) -> Option<String> {
    if is_ok(v) { return None; }
    get(&get(v, "error"), "code").as_string()
}
fn flat(coords: &[f64]) -> Float64Array {
    let a = Float64Array::new_with_length(coords.len() as u32);
    a.copy_from(coords);
    a
}
fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Float64Array {
    flat(&[x0, y0, x1, y0, x1, y1, x0, y1])
}
fn area_of(arr: &Float64Array) -> f64 {
    signed_area(arr).abs()
}
fn point_obj(x: f64, y: f64) -> JsValue {
    let o = Object::new();
    let _ = Reflect::set(&o, &"x".into(), &x.into());
    let _ = Reflect::set(&o, &"y".into(), &y.into());
    o.into()
}

#[wasm_bindgen_test]
fn snap_session_round_trip() {
    let mut s = SnapSession::new(JsValue::UNDEFINED);
    assert!(s.set_polyline_layer("roads", "main", "road", &flat(&[0.0, 100.0, 200.0, 100.0]), false));
    assert_eq!(s.segment_count(), 1);

    let res = s.find_snap_point(-3.0, 96.0);
    let best = get(&res, "best");
    assert_eq!(get(&best, "kind").as_string().as_deref(), Some("vertex"));
    assert_eq!(get(&best, "x").as_f64(), Some(0.0));
    assert_eq!(get(&best, "geometryId").as_string().as_deref(), Some("main"));

    assert!(get(&s.find_snap_point(100.0, 200.0), "best").is_null());
    let cur = s.snap_or_cursor(100.0, 200.0).to_vec();
    assert_eq!(cur, vec![100.0, 200.0]);

    assert!(s.remove_layer("roads"));
    assert_eq!(s.segment_count(), 0);
}

#[wasm_bindgen_test]
fn snap_config_is_validated() {
    let mut s = SnapSession::new(JsValue::NULL);
    let cfg = Object::new();
    let _ = Reflect::set(&cfg, &"threshold".into(), &(-1.0).into());
    assert_eq!(err_code(&s.set_config_res(cfg.into())).as_deref(), Some("invalid_config"));
    assert_eq!(err_code(&s.set_config_json_res("{ nope")).as_deref(), Some("json_parse"));
    assert!(is_ok(&s.set_config_json_res(r#"{"threshold": 40, "midpoint": false}"#)));
    assert_eq!(get(&s.config(), "threshold").as_f64(), Some(40.0));
    assert_eq!(err_code(&s.find_snap_point_res(f64::NAN, 0.0)).as_deref(), Some("non_finite"));
}

#[wasm_bindgen_test]
fn add_and_remove_segments() {
    let mut s = SnapSession::new(JsValue::UNDEFINED);
    let seg = Object::new();
    let _ = Reflect::set(&seg, &"a".into(), &point_obj(0.0, 0.0));
    let _ = Reflect::set(&seg, &"b".into(), &point_obj(50.0, 0.0));
    let _ = Reflect::set(&seg, &"geometryId".into(), &"r1".into());
    let _ = Reflect::set(&seg, &"geometryType".into(), &"road".into());
    let list = Array::of1(&seg);
    let r = s.add_segments_res(list.into());
    assert!(is_ok(&r));
    assert_eq!(s.segment_count(), 1);
    assert_eq!(s.remove_geometry("r1"), 1);
    assert_eq!(err_code(&s.add_segments_res(JsValue::from_str("nope"))).as_deref(), Some("invalid_input"));
}

#[wasm_bindgen_test]
fn commit_operations() {
    let district = square(0.0, 0.0, 100.0, 100.0);
    let bitten = subtract_region(&district, &square(60.0, 60.0, 120.0, 120.0));
    assert!((area_of(&bitten) - 8400.0).abs() < 1e-6);

    let clipped = clip_to_bounds(&district, 50.0, -10.0, 200.0, 200.0);
    assert!((area_of(&clipped) - 5000.0).abs() < 1e-6);

    let pieces = split_with_line_res(&district, -10.0, 50.0, 110.0, 50.0);
    assert!(is_ok(&pieces));
    let first = Array::from(&get(&get(&pieces, "value"), "first"));
    assert!(first.length() >= 3);

    let ribbon = river_to_polygon(&flat(&[0.0, 0.0, 100.0, 0.0]), 10.0, None);
    assert_eq!(ribbon.length(), 8);
    assert!(point_in_polygon(50.0, 0.0, &ribbon));
}

#[wasm_bindgen_test]
fn typed_errors() {
    let district = square(0.0, 0.0, 100.0, 100.0);
    let r = split_with_line_res(&district, -10.0, 500.0, 110.0, 500.0);
    assert_eq!(err_code(&r).as_deref(), Some("no_intersection"));
    assert!(split_with_line(&district, -10.0, 500.0, 110.0, 500.0).is_null());

    assert_eq!(err_code(&subtract_region_res(&flat(&[0.0, 0.0, 1.0]), &district)).as_deref(), Some("invalid_array"));
    assert_eq!(err_code(&signed_area_res(&flat(&[0.0, f64::INFINITY, 1.0, 1.0]))).as_deref(), Some("non_finite"));
    assert_eq!(err_code(&clip_to_bounds_res(&district, 0.0, 0.0, 1.0e12, 1.0)).as_deref(), Some("out_of_range"));
    assert_eq!(
        err_code(&river_to_polygon_res(&flat(&[0.0, 0.0, 1.0, 0.0]), -2.0, None)).as_deref(),
        Some("out_of_range")
    );
    assert!(polygon_bounds(&flat(&[])).is_null());
}

#[wasm_bindgen_test]
fn clip_and_validate_report() {
    let region = Object::new();
    let _ = Reflect::set(&region, &"id".into(), &"lake".into());
    let _ = Reflect::set(&region, &"kind".into(), &"lake".into());
    let poly = Array::new();
    for (x, y) in [(30.0, -10.0), (200.0, -10.0), (200.0, 200.0), (30.0, 200.0)] {
        poly.push(&point_obj(x, y));
    }
    let _ = Reflect::set(&region, &"polygon".into(), &poly);
    let rules = Object::new();
    let _ = Reflect::set(&rules, &"minDimensionMeters".into(), &50.0.into());

    let r = clip_and_validate_res(&square(0.0, 0.0, 100.0, 100.0), Array::of1(&region).into(), "residential", rules.into());
    assert!(is_ok(&r));
    let verdict = get(&get(&r, "value"), "verdict");
    assert_eq!(get(&verdict, "status").as_string().as_deref(), Some("tooSmall"));
}
