// Centralized tolerances and helpers for robust geometry

use crate::model::Point;

pub const EPS_POS: f64 = 1e-4;            // point coincidence threshold (world units)
pub const EPS_PARALLEL: f64 = 1e-4;       // |cross| below this = parallel
pub const EPS_LEN: f64 = 1e-9;            // zero-length vector threshold

// Extra half width added on each side of a river ribbon
pub const RIBBON_BUFFER: f64 = 0.5;

// Projections closer than this (in segment parameter) to an endpoint are left to vertex snapping
pub const NEAREST_END_EXCLUSION: f64 = 0.01;

// Split line is treated as infinite within this many line lengths either side
pub const LINE_PARAM_LIMIT: f64 = 1e6;

#[inline] pub fn clamp01(x: f64) -> f64 { x.max(0.0).min(1.0) }
#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }

#[inline]
pub fn points_coincide(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x, EPS_POS) && approx_eq(a.y, b.y, EPS_POS)
}

#[inline]
pub fn norm2(mut x: f64, mut y: f64) -> ((f64, f64), f64) {
    let len = (x * x + y * y).sqrt();
    if len > EPS_LEN { x /= len; y /= len; ((x, y), len) } else { ((0.0, 0.0), 0.0) }
}

/// Drop consecutive near-duplicate points and a closing vertex equal to the first.
pub fn dedup_ring(points: &mut Vec<Point>) {
    points.dedup_by(|b, a| points_coincide(*a, *b));
    while points.len() > 1 {
        match (points.first(), points.last()) {
            (Some(f), Some(l)) if points_coincide(*f, *l) => { points.pop(); }
            _ => break,
        }
    }
}

/// Remove zero-area spikes: vertices where the ring doubles back on itself.
pub fn drop_spikes(points: &mut Vec<Point>) {
    let mut i = 0;
    while points.len() >= 3 && i < points.len() {
        let n = points.len();
        let cur = points[i];
        let a = points[(i + n - 1) % n].sub(cur);
        let b = points[(i + 1) % n].sub(cur);
        if a.dot(b) > 0.0 && a.cross(b).abs() <= EPS_POS * a.length().max(b.length()) {
            points.remove(i);
            dedup_ring(points);
            // neighbours may form a new spike
            i = 0;
        } else {
            i += 1;
        }
    }
}
