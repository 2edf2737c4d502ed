use crate::interop::{check_points, from_js, is_absent, read_points, to_js, write_points};
use crate::{error, SnapSession};
use cityscape::geometry::limits::{
    in_coord_bounds, in_width_bounds, MAX_CENTERLINE_POINTS, MAX_POLYGON_POINTS, MAX_REGIONS, MAX_SEGMENTS,
    WIDTH_MAX,
};
use cityscape::{Bounds, LineSegment, Point, Polygon, Region, SegmentLayer, SnapConfig, ValidationRules};
use js_sys::Float64Array;
use log::warn;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn finite(param: &str, v: f64) -> Result<f64, JsValue> {
    if v.is_finite() { Ok(v) } else { Err(error::non_finite(param)) }
}

fn coord(param: &str, v: f64) -> Result<f64, JsValue> {
    let v = finite(param, v)?;
    if in_coord_bounds(v) {
        Ok(v)
    } else {
        Err(error::out_of_range(
            param,
            cityscape::geometry::limits::COORD_MIN,
            cityscape::geometry::limits::COORD_MAX,
            v,
        ))
    }
}

fn read_config(v: JsValue) -> Result<SnapConfig, JsValue> {
    if is_absent(&v) {
        return Ok(SnapConfig::default());
    }
    let cfg: SnapConfig = from_js("config", v)?;
    cfg.validate().map_err(|e| error::config("config", &e))?;
    Ok(cfg)
}

fn read_rules(v: JsValue) -> Result<ValidationRules, JsValue> {
    if is_absent(&v) {
        return Ok(ValidationRules::default());
    }
    let rules: ValidationRules = from_js("rules", v)?;
    rules.validate().map_err(|e| error::config("rules", &e))?;
    Ok(rules)
}

fn read_segments(v: JsValue) -> Result<Vec<LineSegment>, JsValue> {
    let segs: Vec<LineSegment> = from_js("segments", v)?;
    if segs.len() > MAX_SEGMENTS {
        return Err(error::too_large("segments", MAX_SEGMENTS, segs.len()));
    }
    for s in &segs {
        check_points("segments", &[s.a, s.b])?;
    }
    Ok(segs)
}

fn read_regions(v: JsValue) -> Result<Vec<Region>, JsValue> {
    let regions: Vec<Region> = from_js("regions", v)?;
    if regions.len() > MAX_REGIONS {
        return Err(error::too_large("regions", MAX_REGIONS, regions.len()));
    }
    for r in &regions {
        if r.polygon.len() > MAX_POLYGON_POINTS {
            return Err(error::too_large("regions", MAX_POLYGON_POINTS, r.polygon.len()));
        }
        check_points("regions", &r.polygon)?;
    }
    Ok(regions)
}

#[wasm_bindgen]
impl SnapSession {
    /// `config` may be omitted; an invalid one falls back to the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> SnapSession {
        let cfg = read_config(config).unwrap_or_else(|_| {
            warn!("SnapSession: invalid config, using defaults");
            SnapConfig::default()
        });
        SnapSession::rs_new(cfg, cityscape::DEFAULT_CELL_SIZE)
    }
    pub fn with_cell_size(config: JsValue, cell_size: f64) -> SnapSession {
        let cfg = read_config(config).unwrap_or_default();
        SnapSession::rs_new(cfg, cell_size)
    }

    pub fn config(&self) -> JsValue {
        to_js(self.inner.config()).unwrap_or(JsValue::NULL)
    }
    pub fn set_config(&mut self, config: JsValue) -> bool {
        match read_config(config) {
            Ok(cfg) => { self.inner.set_config(cfg); true }
            Err(_) => false,
        }
    }
    pub fn set_config_res(&mut self, config: JsValue) -> JsValue {
        error::wrap(read_config(config).map(|cfg| {
            self.inner.set_config(cfg);
            JsValue::from_bool(true)
        }))
    }
    /// Same as `set_config` from a JSON string (e.g. persisted editor settings).
    pub fn set_config_json_res(&mut self, json: &str) -> JsValue {
        match SnapConfig::from_json(json) {
            Ok(cfg) => { self.inner.set_config(cfg); error::ok(JsValue::from_bool(true)) }
            Err(e) => error::config("config", &e),
        }
    }

    // Layers
    pub fn set_layer(&mut self, key: &str, segments: JsValue) -> bool {
        self.set_layer_inner(key, segments).is_ok()
    }
    pub fn set_layer_res(&mut self, key: &str, segments: JsValue) -> JsValue {
        error::wrap(self.set_layer_inner(key, segments))
    }
    pub fn set_polyline_layer(
        &mut self,
        key: &str,
        geometry_id: &str,
        geometry_type: &str,
        points: &Float64Array,
        closed: bool,
    ) -> bool {
        self.set_polyline_layer_inner(key, geometry_id, geometry_type, points, closed).is_ok()
    }
    pub fn set_polyline_layer_res(
        &mut self,
        key: &str,
        geometry_id: &str,
        geometry_type: &str,
        points: &Float64Array,
        closed: bool,
    ) -> JsValue {
        error::wrap(self.set_polyline_layer_inner(key, geometry_id, geometry_type, points, closed))
    }
    pub fn remove_layer(&mut self, key: &str) -> bool {
        self.inner.unregister_provider(key)
    }
    pub fn layer_keys(&self) -> JsValue {
        let keys: Vec<&str> = self.inner.provider_keys().collect();
        to_js(&keys).unwrap_or(JsValue::NULL)
    }

    // Incremental edits between rebuilds
    pub fn add_segments(&mut self, segments: JsValue) -> bool {
        match read_segments(segments) {
            Ok(segs) => { self.inner.add_segments(segs); true }
            Err(_) => false,
        }
    }
    pub fn add_segments_res(&mut self, segments: JsValue) -> JsValue {
        error::wrap(read_segments(segments).map(|segs| {
            let n = segs.len();
            self.inner.add_segments(segs);
            JsValue::from_f64(n as f64)
        }))
    }
    pub fn remove_geometry(&mut self, geometry_id: &str) -> u32 {
        self.inner.remove_geometry(geometry_id) as u32
    }
    pub fn clear(&mut self) {
        self.inner.clear();
    }
    pub fn segment_count(&self) -> u32 {
        self.rs_segment_count() as u32
    }

    // Queries
    pub fn find_snap_point(&self, x: f64, y: f64) -> JsValue {
        if !x.is_finite() || !y.is_finite() {
            return JsValue::NULL;
        }
        to_js(&self.inner.find_snap_point(x, y)).unwrap_or(JsValue::NULL)
    }
    pub fn find_snap_point_res(&self, x: f64, y: f64) -> JsValue {
        error::wrap((|| -> Result<JsValue, JsValue> {
            finite("x", x)?;
            finite("y", y)?;
            to_js(&self.inner.find_snap_point(x, y))
        })())
    }
    /// `[x, y]` of the best snap, or of the cursor when nothing is in range.
    pub fn snap_or_cursor(&self, x: f64, y: f64) -> Float64Array {
        if !x.is_finite() || !y.is_finite() {
            return write_points(&[Point::new(x, y)]);
        }
        write_points(&[self.inner.snap_or_cursor(x, y)])
    }
}

impl SnapSession {
    fn set_layer_inner(&mut self, key: &str, segments: JsValue) -> Result<JsValue, JsValue> {
        let segs = read_segments(segments)?;
        let n = segs.len();
        self.inner.register_provider(key, Box::new(SegmentLayer::new(segs)));
        Ok(JsValue::from_f64(n as f64))
    }
    fn set_polyline_layer_inner(
        &mut self,
        key: &str,
        geometry_id: &str,
        geometry_type: &str,
        points: &Float64Array,
        closed: bool,
    ) -> Result<JsValue, JsValue> {
        let pts = read_points("points", points, MAX_POLYGON_POINTS)?;
        let layer = if closed {
            SegmentLayer::from_ring(geometry_id, geometry_type, &pts)
        } else {
            SegmentLayer::from_polyline(geometry_id, geometry_type, &pts)
        };
        let n = layer.len();
        self.inner.register_provider(key, Box::new(layer));
        Ok(JsValue::from_f64(n as f64))
    }
}

// Commit-time operations. Each has a plain variant returning an empty/NULL
// sentinel on bad input and a `_res` variant returning the ok/err envelope.

fn polygon_out(p: Polygon) -> Result<Float64Array, JsValue> {
    Ok(write_points(&p))
}

fn empty() -> Float64Array {
    Float64Array::new_with_length(0)
}

fn clip_polygon_inner(subject: &Float64Array, clip: &Float64Array) -> Result<Float64Array, JsValue> {
    let s = read_points("subject", subject, MAX_POLYGON_POINTS)?;
    let c = read_points("clip", clip, MAX_POLYGON_POINTS)?;
    polygon_out(cityscape::clip(&s, &c))
}
#[wasm_bindgen]
pub fn clip_polygon(subject: &Float64Array, clip: &Float64Array) -> Float64Array {
    clip_polygon_inner(subject, clip).unwrap_or_else(|_| empty())
}
#[wasm_bindgen]
pub fn clip_polygon_res(subject: &Float64Array, clip: &Float64Array) -> JsValue {
    error::wrap(clip_polygon_inner(subject, clip).map(JsValue::from))
}

fn clip_to_bounds_inner(subject: &Float64Array, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Float64Array, JsValue> {
    let s = read_points("subject", subject, MAX_POLYGON_POINTS)?;
    let b = Bounds::new(coord("minX", min_x)?, coord("minY", min_y)?, coord("maxX", max_x)?, coord("maxY", max_y)?);
    polygon_out(cityscape::clip_to_bounds(&s, &b))
}
#[wasm_bindgen]
pub fn clip_to_bounds(subject: &Float64Array, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Float64Array {
    clip_to_bounds_inner(subject, min_x, min_y, max_x, max_y).unwrap_or_else(|_| empty())
}
#[wasm_bindgen]
pub fn clip_to_bounds_res(subject: &Float64Array, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> JsValue {
    error::wrap(clip_to_bounds_inner(subject, min_x, min_y, max_x, max_y).map(JsValue::from))
}

fn subtract_region_inner(subject: &Float64Array, region: &Float64Array) -> Result<Float64Array, JsValue> {
    let s = read_points("subject", subject, MAX_POLYGON_POINTS)?;
    let r = read_points("region", region, MAX_POLYGON_POINTS)?;
    polygon_out(cityscape::subtract_region(&s, &r))
}
#[wasm_bindgen]
pub fn subtract_region(subject: &Float64Array, region: &Float64Array) -> Float64Array {
    subtract_region_inner(subject, region).unwrap_or_else(|_| empty())
}
#[wasm_bindgen]
pub fn subtract_region_res(subject: &Float64Array, region: &Float64Array) -> JsValue {
    error::wrap(subtract_region_inner(subject, region).map(JsValue::from))
}

fn subtract_regions_inner(subject: &Float64Array, regions: JsValue) -> Result<Float64Array, JsValue> {
    let s = read_points("subject", subject, MAX_POLYGON_POINTS)?;
    let regions = read_regions(regions)?;
    polygon_out(cityscape::subtract_regions(&s, &regions))
}
#[wasm_bindgen]
pub fn subtract_regions(subject: &Float64Array, regions: JsValue) -> Float64Array {
    subtract_regions_inner(subject, regions).unwrap_or_else(|_| empty())
}
#[wasm_bindgen]
pub fn subtract_regions_res(subject: &Float64Array, regions: JsValue) -> JsValue {
    error::wrap(subtract_regions_inner(subject, regions).map(JsValue::from))
}

fn clip_and_validate_inner(subject: &Float64Array, regions: JsValue, shape_type: &str, rules: JsValue) -> Result<JsValue, JsValue> {
    let s = read_points("subject", subject, MAX_POLYGON_POINTS)?;
    let regions = read_regions(regions)?;
    let rules = read_rules(rules)?;
    to_js(&cityscape::clip_and_validate(&s, &regions, shape_type, &rules))
}
/// `{ polygon: [{x, y}...], verdict: { status, ... } }`, or NULL on bad input.
#[wasm_bindgen]
pub fn clip_and_validate(subject: &Float64Array, regions: JsValue, shape_type: &str, rules: JsValue) -> JsValue {
    clip_and_validate_inner(subject, regions, shape_type, rules).unwrap_or(JsValue::NULL)
}
#[wasm_bindgen]
pub fn clip_and_validate_res(subject: &Float64Array, regions: JsValue, shape_type: &str, rules: JsValue) -> JsValue {
    error::wrap(clip_and_validate_inner(subject, regions, shape_type, rules))
}

#[derive(Serialize)]
struct SplitPieces {
    first: Polygon,
    second: Polygon,
}

fn split_inner(polygon: &Float64Array, ax: f64, ay: f64, bx: f64, by: f64) -> Result<JsValue, JsValue> {
    let p = read_points("polygon", polygon, MAX_POLYGON_POINTS)?;
    let a = Point::new(coord("ax", ax)?, coord("ay", ay)?);
    let b = Point::new(coord("bx", bx)?, coord("by", by)?);
    let (first, second) = cityscape::split_with_line(&p, a, b).map_err(|e| error::split(&e))?;
    to_js(&SplitPieces { first, second })
}
/// `{ first, second }` point lists, or NULL when the line does not split the polygon.
#[wasm_bindgen]
pub fn split_with_line(polygon: &Float64Array, ax: f64, ay: f64, bx: f64, by: f64) -> JsValue {
    split_inner(polygon, ax, ay, bx, by).unwrap_or(JsValue::NULL)
}
#[wasm_bindgen]
pub fn split_with_line_res(polygon: &Float64Array, ax: f64, ay: f64, bx: f64, by: f64) -> JsValue {
    error::wrap(split_inner(polygon, ax, ay, bx, by))
}

fn river_inner(centerline: &Float64Array, width: f64, widths: Option<Float64Array>) -> Result<Float64Array, JsValue> {
    let line = read_points("centerline", centerline, MAX_CENTERLINE_POINTS)?;
    let width = finite("width", width)?;
    if !in_width_bounds(width) {
        return Err(error::out_of_range("width", 0.0, WIDTH_MAX, width));
    }
    let taper: Option<Vec<f64>> = match widths {
        Some(arr) => {
            let mut buf = vec![0.0f64; arr.length() as usize];
            arr.copy_to(&mut buf);
            if let Some(w) = buf.iter().find(|w| !in_width_bounds(**w)) {
                return Err(if w.is_finite() {
                    error::out_of_range("widths", 0.0, WIDTH_MAX, *w)
                } else {
                    error::non_finite("widths")
                });
            }
            Some(buf)
        }
        None => None,
    };
    polygon_out(cityscape::river_to_polygon(&line, width, taper.as_deref()))
}
#[wasm_bindgen]
pub fn river_to_polygon(centerline: &Float64Array, width: f64, widths: Option<Float64Array>) -> Float64Array {
    river_inner(centerline, width, widths).unwrap_or_else(|_| empty())
}
#[wasm_bindgen]
pub fn river_to_polygon_res(centerline: &Float64Array, width: f64, widths: Option<Float64Array>) -> JsValue {
    error::wrap(river_inner(centerline, width, widths).map(JsValue::from))
}

// Primitives

#[wasm_bindgen]
pub fn point_in_polygon(x: f64, y: f64, polygon: &Float64Array) -> bool {
    match read_points("polygon", polygon, MAX_POLYGON_POINTS) {
        Ok(p) => cityscape::point_in_polygon(Point::new(x, y), &p),
        Err(_) => false,
    }
}
#[wasm_bindgen]
pub fn point_in_polygon_res(x: f64, y: f64, polygon: &Float64Array) -> JsValue {
    error::wrap((|| -> Result<JsValue, JsValue> {
        let q = Point::new(finite("x", x)?, finite("y", y)?);
        let p = read_points("polygon", polygon, MAX_POLYGON_POINTS)?;
        Ok(JsValue::from_bool(cityscape::point_in_polygon(q, &p)))
    })())
}

#[wasm_bindgen]
pub fn signed_area(polygon: &Float64Array) -> f64 {
    read_points("polygon", polygon, MAX_POLYGON_POINTS).map_or(0.0, |p| cityscape::signed_area(&p))
}
#[wasm_bindgen]
pub fn signed_area_res(polygon: &Float64Array) -> JsValue {
    error::wrap(
        read_points("polygon", polygon, MAX_POLYGON_POINTS)
            .map(|p| JsValue::from_f64(cityscape::signed_area(&p))),
    )
}

/// `{ minX, minY, maxX, maxY }`, or NULL for an empty polygon.
#[wasm_bindgen]
pub fn polygon_bounds(polygon: &Float64Array) -> JsValue {
    polygon_bounds_inner(polygon).unwrap_or(JsValue::NULL)
}
#[wasm_bindgen]
pub fn polygon_bounds_res(polygon: &Float64Array) -> JsValue {
    error::wrap(polygon_bounds_inner(polygon))
}
fn polygon_bounds_inner(polygon: &Float64Array) -> Result<JsValue, JsValue> {
    let p = read_points("polygon", polygon, MAX_POLYGON_POINTS)?;
    match cityscape::polygon_bounds(&p) {
        Some(b) => to_js(&b),
        None => Ok(JsValue::NULL),
    }
}
