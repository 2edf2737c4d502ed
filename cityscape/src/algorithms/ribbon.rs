//! River centerlines to closed ribbon polygons.

use crate::geometry::tolerance::{norm2, RIBBON_BUFFER};
use crate::model::{Point, Polygon, RiverFeature};

/// Offset the centerline by half the width on both sides and close the ribbon.
///
/// `widths` replaces `width` when it has one entry per centerline vertex,
/// which lets rivers taper. Each side gets an extra [`RIBBON_BUFFER`] so thin
/// rivers never collapse to a sliver. Interior joints use the averaged normal
/// of both neighbouring segments, which rounds the bend instead of mitering.
pub fn river_to_polygon(centerline: &[Point], width: f64, widths: Option<&[f64]>) -> Polygon {
    let n = centerline.len();
    if n < 2 {
        return Vec::new();
    }
    let taper = widths.filter(|w| w.len() == n);

    let seg_normals: Vec<Option<Point>> = centerline.windows(2).map(|w| segment_normal(w[0], w[1])).collect();

    let mut left: Vec<Point> = Vec::with_capacity(n);
    let mut right: Vec<Point> = Vec::with_capacity(n);
    for (i, p) in centerline.iter().enumerate() {
        let before = if i > 0 { seg_normals[i - 1] } else { None };
        let after = seg_normals.get(i).copied().flatten();
        let normal = match (before, after) {
            (Some(a), Some(b)) => {
                let ((x, y), len) = norm2(a.x + b.x, a.y + b.y);
                if len > 0.0 { Point::new(x, y) } else { a }
            }
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => nearest_normal(&seg_normals, i).unwrap_or(Point::new(0.0, 1.0)),
        };
        let w = taper.map_or(width, |t| t[i]);
        let half = w * 0.5 + RIBBON_BUFFER;
        left.push(p.add(normal.scale(half)));
        right.push(p.sub(normal.scale(half)));
    }

    left.extend(right.into_iter().rev());
    left
}

/// Left-hand unit normal of `a -> b`; `None` for a zero-length segment.
fn segment_normal(a: Point, b: Point) -> Option<Point> {
    let ((dx, dy), len) = norm2(b.x - a.x, b.y - a.y);
    if len > 0.0 {
        Some(Point::new(-dy, dx))
    } else {
        None
    }
}

/// Closest non-degenerate segment normal to vertex `i`, for runs of repeated points.
fn nearest_normal(seg_normals: &[Option<Point>], i: usize) -> Option<Point> {
    let after = seg_normals.iter().skip(i).flatten().next();
    let before = seg_normals[..i.min(seg_normals.len())].iter().rev().flatten().next();
    after.or(before).copied()
}

impl RiverFeature {
    pub fn to_polygon(&self) -> Polygon {
        river_to_polygon(&self.centerline, self.width, self.widths.as_deref())
    }
}
