// Segment/segment and line/segment intersection in world units.
// Parallel pairs (|cross| < EPS_PARALLEL) are reported as misses, never as overlaps.

use super::tolerance::EPS_PARALLEL;
use crate::model::Point;

/// Hit between segment `a1`-`a2` and segment `b1`-`b2`.
/// `t` is the parameter along the first segment, `u` along the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    pub t: f64,
    pub u: f64,
    pub point: Point,
}

/// Solve both parametric equations; `None` when parallel or either parameter leaves `[0, 1]`.
pub fn segment_hit(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<SegmentHit> {
    let r = a2.sub(a1);
    let s = b2.sub(b1);
    let denom = r.cross(s);
    if denom.abs() < EPS_PARALLEL {
        return None;
    }
    let qp = b1.sub(a1);
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }
    Some(SegmentHit { t, u, point: a1.lerp(a2, t) })
}

pub fn segment_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    segment_hit(a1, a2, b1, b2).map(|h| h.point)
}

/// Infinite line through `line_a`-`line_b` against segment `s1`-`s2`.
///
/// `t` is the parameter along the line (bounded to `±t_limit`), `u` along the
/// segment in the half-open range `[0, 1)` so a shared vertex counts once.
pub fn line_segment_hit(line_a: Point, line_b: Point, s1: Point, s2: Point, t_limit: f64) -> Option<SegmentHit> {
    let r = line_b.sub(line_a);
    let s = s2.sub(s1);
    let denom = r.cross(s);
    if denom.abs() < EPS_PARALLEL {
        return None;
    }
    let qp = s1.sub(line_a);
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    if t.abs() > t_limit || !(0.0..1.0).contains(&u) {
        return None;
    }
    Some(SegmentHit { t, u, point: s1.lerp(s2, u) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point { Point::new(x, y) }

    #[test]
    fn proper_cross() {
        let h = segment_hit(p(0.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(2.0, 0.0)).expect("hit");
        assert!((h.t - 0.5).abs() < 1e-12 && (h.u - 0.5).abs() < 1e-12);
        assert!((h.point.x - 1.0).abs() < 1e-12 && (h.point.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn endpoint_touch_counts() {
        let hit = segment_intersection(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 0.0), p(1.0, 1.0));
        assert_eq!(hit, Some(p(1.0, 0.0)));
    }

    #[test]
    fn parallel_and_collinear_miss() {
        assert!(segment_intersection(p(0.0, 0.0), p(3.0, 0.0), p(0.0, 1.0), p(3.0, 1.0)).is_none());
        assert!(segment_intersection(p(0.0, 0.0), p(3.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)).is_none());
    }

    #[test]
    fn out_of_range_parameters_miss() {
        assert!(segment_intersection(p(0.0, 0.0), p(1.0, 0.0), p(2.0, -1.0), p(2.0, 1.0)).is_none());
    }

    #[test]
    fn line_hit_is_half_open_on_segment() {
        let a = p(-10.0, 0.0);
        let b = p(10.0, 0.0);
        assert!(line_segment_hit(a, b, p(0.0, 0.0), p(0.0, 5.0), LIMIT).is_some());
        assert!(line_segment_hit(a, b, p(0.0, 5.0), p(0.0, 0.0), LIMIT).is_none());
    }

    #[test]
    fn line_hit_extends_beyond_endpoints() {
        let h = line_segment_hit(p(0.0, 0.0), p(1.0, 0.0), p(50.0, -1.0), p(50.0, 1.0), LIMIT).expect("hit");
        assert!((h.t - 50.0).abs() < 1e-9);
    }

    const LIMIT: f64 = 1e6;
}
