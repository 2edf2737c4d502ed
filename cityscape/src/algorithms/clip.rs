//! Sutherland–Hodgman clipping against a convex polygon.
//!
//! Only convex clip polygons give guaranteed results; the world-bounds
//! rectangle is the canonical one. Concave regions (water bodies) go through
//! [`crate::algorithms::difference`] instead.

use crate::algorithms::winding::winding_sign;
use crate::geometry::tolerance::dedup_ring;
use crate::model::{Bounds, Point, Polygon};

/// Clip `subject` to the convex `clip_polygon`. Either winding is accepted for both.
pub fn clip(subject: &[Point], clip_polygon: &[Point]) -> Polygon {
    if subject.len() < 3 || clip_polygon.len() < 3 {
        return Vec::new();
    }
    // Interior lies to the left of each edge for counter-clockwise rings
    let orient = match winding_sign(clip_polygon) {
        0 => return Vec::new(),
        s => s as f64,
    };

    let mut output: Vec<Point> = subject.to_vec();
    let m = clip_polygon.len();
    for j in 0..m {
        if output.is_empty() {
            break;
        }
        let ea = clip_polygon[j];
        let eb = clip_polygon[(j + 1) % m];
        let edge = eb.sub(ea);
        let side = |p: Point| orient * edge.cross(p.sub(ea));

        let input = std::mem::take(&mut output);
        let n = input.len();
        for i in 0..n {
            let cur = input[i];
            let prev = input[(i + n - 1) % n];
            let s_cur = side(cur);
            let s_prev = side(prev);
            if s_cur >= 0.0 {
                if s_prev < 0.0 {
                    output.push(crossing(prev, cur, s_prev, s_cur));
                }
                output.push(cur);
            } else if s_prev >= 0.0 {
                output.push(crossing(prev, cur, s_prev, s_cur));
            }
        }
    }

    dedup_ring(&mut output);
    if output.len() < 3 {
        return Vec::new();
    }
    output
}

/// Point where `p`-`q` crosses the clip line, from the signed side values at both ends.
#[inline]
fn crossing(p: Point, q: Point, sp: f64, sq: f64) -> Point {
    let t = sp / (sp - sq);
    p.lerp(q, t)
}

/// Clip to the world bounds rectangle.
pub fn clip_to_bounds(subject: &[Point], bounds: &Bounds) -> Polygon {
    clip(subject, &bounds.to_polygon())
}
