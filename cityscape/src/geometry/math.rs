use crate::geometry::tolerance::clamp01;
use crate::model::Point;

/// Squared distance from `p` to segment `a`-`b` and the clamped parameter of the foot point.
pub fn seg_distance_sq(p: Point, a: Point, b: Point) -> (f64, f64) {
    let v = b.sub(a);
    let w = p.sub(a);
    let vv = v.dot(v);
    let t = if vv > 0.0 { clamp01(w.dot(v) / vv) } else { 0.0 };
    let proj = a.lerp(b, t);
    let d = p.sub(proj);
    (d.dot(d), t)
}

/// Foot point of `p` on segment `a`-`b`, its parameter and squared distance.
pub fn project_onto_segment(p: Point, a: Point, b: Point) -> (Point, f64, f64) {
    let (d2, t) = seg_distance_sq(p, a, b);
    (a.lerp(b, t), t, d2)
}
