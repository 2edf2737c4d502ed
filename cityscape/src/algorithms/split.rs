//! Cutting a polygon in two along a straight line.

use thiserror::Error;

use crate::geometry::intersect::line_segment_hit;
use crate::geometry::tolerance::{dedup_ring, points_coincide, LINE_PARAM_LIMIT};
use crate::model::{Point, Polygon};

/// Why a cut was refused. The editor shows these to the user.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("the cut line does not cross the polygon")]
    NoIntersection,
    #[error("the cut line only touches the polygon once")]
    SingleTouch,
    #[error("the cut line crosses the polygon {0} times; exactly two are needed")]
    MultipleCrossings(usize),
    #[error("one side of the cut would have fewer than three vertices")]
    DegenerateResult,
    #[error("the polygon has fewer than three vertices")]
    InvalidPolygon,
    #[error("the cut line endpoints coincide")]
    DegenerateLine,
}

impl SplitError {
    /// Stable identifier for the browser bridge.
    pub fn code(&self) -> &'static str {
        match self {
            SplitError::NoIntersection => "no_intersection",
            SplitError::SingleTouch => "single_touch",
            SplitError::MultipleCrossings(_) => "multiple_crossings",
            SplitError::DegenerateResult => "degenerate_result",
            SplitError::InvalidPolygon => "invalid_polygon",
            SplitError::DegenerateLine => "degenerate_line",
        }
    }
}

/// Split `polygon` along the infinite line through `line_a` and `line_b`.
///
/// The line must cross the boundary exactly twice. With crossings on edges
/// `i1 <= i2` the pieces are `[c1, p[i1+1..=i2], c2]` and
/// `[c2, p[i2+1..], p[..=i1], c1]`.
pub fn split_with_line(polygon: &[Point], line_a: Point, line_b: Point) -> Result<(Polygon, Polygon), SplitError> {
    let n = polygon.len();
    if n < 3 {
        return Err(SplitError::InvalidPolygon);
    }
    if points_coincide(line_a, line_b) {
        return Err(SplitError::DegenerateLine);
    }

    let mut crossings: Vec<(usize, Point)> = Vec::with_capacity(2);
    for i in 0..n {
        if let Some(h) = line_segment_hit(line_a, line_b, polygon[i], polygon[(i + 1) % n], LINE_PARAM_LIMIT) {
            crossings.push((i, h.point));
        }
    }

    let ((i1, c1), (i2, c2)) = match crossings.as_slice() {
        [] => return Err(SplitError::NoIntersection),
        [_] => return Err(SplitError::SingleTouch),
        [a, b] => (*a, *b),
        more => return Err(SplitError::MultipleCrossings(more.len())),
    };

    let mut first: Polygon = Vec::with_capacity(i2 - i1 + 2);
    first.push(c1);
    first.extend_from_slice(&polygon[i1 + 1..=i2]);
    first.push(c2);

    let mut second: Polygon = Vec::with_capacity(n - (i2 - i1) + 2);
    second.push(c2);
    second.extend_from_slice(&polygon[i2 + 1..]);
    second.extend_from_slice(&polygon[..=i1]);
    second.push(c1);

    dedup_ring(&mut first);
    dedup_ring(&mut second);
    if first.len() < 3 || second.len() < 3 {
        return Err(SplitError::DegenerateResult);
    }
    Ok((first, second))
}
