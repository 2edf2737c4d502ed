//! Point containment, area and bounds of simple polygons.
//!
//! Uses horizontal ray casting for containment (even-odd rule) and the
//! shoelace sum for signed area. All functions accept any winding and treat
//! polygons with fewer than three vertices as empty instead of failing.

use crate::geometry::math::seg_distance_sq;
use crate::model::{Bounds, Point};

/// Number of polygon edges crossed by the horizontal ray from `p` going right.
pub fn crossing_number(p: Point, polygon: &[Point]) -> usize {
    if polygon.len() < 3 {
        return 0;
    }

    let mut crossings = 0usize;
    let n = polygon.len();

    for i in 0..n {
        let p1 = polygon[i];
        let p2 = polygon[(i + 1) % n];

        // Half-open in y so a vertex on the ray is counted once
        let y_crosses = (p1.y <= p.y && p2.y > p.y) || (p2.y <= p.y && p1.y > p.y);

        if y_crosses {
            let t = (p.y - p1.y) / (p2.y - p1.y);
            let x_intersect = p1.x + t * (p2.x - p1.x);
            if p.x < x_intersect {
                crossings += 1;
            }
        }
    }

    crossings
}

/// Even-odd containment test. Always `false` for fewer than three vertices.
#[inline]
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    crossing_number(p, polygon) % 2 == 1
}

/// `true` when `p` lies within `eps` of any polygon edge.
pub fn point_on_boundary(p: Point, polygon: &[Point], eps: f64) -> bool {
    let n = polygon.len();
    (0..n).any(|i| seg_distance_sq(p, polygon[i], polygon[(i + 1) % n]).0 <= eps * eps)
}

/// Shoelace area with sign encoding winding: positive is counter-clockwise
/// with y pointing up (clockwise on a y-down screen).
pub fn signed_area(polygon: &[Point]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        acc += a.x * b.y - b.x * a.y;
    }
    acc * 0.5
}

#[inline]
pub fn polygon_area(polygon: &[Point]) -> f64 {
    signed_area(polygon).abs()
}

/// Min/max reduce. A single point yields a zero-area box; `None` only for an empty slice.
pub fn polygon_bounds(polygon: &[Point]) -> Option<Bounds> {
    Bounds::from_points(polygon)
}

/// Axis-aligned overlap pre-filter used before O(n·m) polygon work.
#[inline]
pub fn bounds_overlap(a: &Bounds, b: &Bounds) -> bool {
    a.overlaps(b)
}

/// Area centroid; falls back to the vertex average when the area vanishes.
pub fn polygon_centroid(polygon: &[Point]) -> Option<Point> {
    if polygon.is_empty() {
        return None;
    }
    let a = signed_area(polygon);
    if a.abs() <= f64::EPSILON {
        let n = polygon.len() as f64;
        let sum = polygon.iter().fold(Point::default(), |acc, p| acc.add(*p));
        return Some(sum.scale(1.0 / n));
    }
    let n = polygon.len();
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let p = polygon[i];
        let q = polygon[(i + 1) % n];
        let f = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * f;
        cy += (p.y + q.y) * f;
    }
    Some(Point::new(cx / (6.0 * a), cy / (6.0 * a)))
}

/// +1 for counter-clockwise (y up), -1 for clockwise, 0 when degenerate.
pub fn winding_sign(polygon: &[Point]) -> i8 {
    let a = signed_area(polygon);
    if a > 0.0 {
        1
    } else if a < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn square_containment() {
        let sq = square();
        assert!(point_in_polygon(Point::new(5.0, 5.0), &sq));
        assert!(!point_in_polygon(Point::new(15.0, 5.0), &sq));
        assert!(!point_in_polygon(Point::new(-5.0, 5.0), &sq));
    }

    #[test]
    fn boundary_points_within_tolerance() {
        let sq = square();
        assert!(point_on_boundary(Point::new(10.0, 4.0), &sq, 1e-4));
        assert!(point_on_boundary(Point::new(0.0, 0.0), &sq, 1e-4));
        assert!(point_on_boundary(Point::new(5.0, 10.00005), &sq, 1e-4));
        assert!(!point_on_boundary(Point::new(5.0, 5.0), &sq, 1e-4));
    }

    #[test]
    fn concave_notch_is_outside() {
        // U shape opening upward
        let u = vec![
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 30.0),
            Point::new(20.0, 30.0),
            Point::new(20.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 30.0),
            Point::new(0.0, 30.0),
        ];
        assert!(!point_in_polygon(Point::new(15.0, 20.0), &u));
        assert!(point_in_polygon(Point::new(5.0, 20.0), &u));
        assert!(point_in_polygon(Point::new(15.0, 5.0), &u));
    }

    #[test]
    fn centroid_of_square() {
        let c = polygon_centroid(&square()).expect("centroid");
        assert!((c.x - 5.0).abs() < 1e-9 && (c.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn winding_sign_flips_on_reverse() {
        let mut sq = square();
        assert_eq!(winding_sign(&sq), 1);
        sq.reverse();
        assert_eq!(winding_sign(&sq), -1);
        assert_eq!(winding_sign(&sq[..2]), 0);
    }
}
