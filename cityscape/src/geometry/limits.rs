// Centralized ingestion limits to harden against untrusted input from the editor

use crate::model::Point;

// Geometry size caps
pub const MAX_POLYGON_POINTS: usize = 100_000;
pub const MAX_CENTERLINE_POINTS: usize = 50_000;
pub const MAX_SEGMENTS: usize = 2_000_000;
pub const MAX_REGIONS: usize = 10_000;

// Spatial grid: longer segments go to the overflow list instead of every cell
pub const MAX_CELLS_PER_SEGMENT: usize = 4_096;

// Numeric bounds
pub const COORD_MIN: f64 = -1.0e9;
pub const COORD_MAX: f64 = 1.0e9;
pub const WIDTH_MAX: f64 = 100_000.0;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_width_bounds(w: f64) -> bool { w.is_finite() && w >= 0.0 && w <= WIDTH_MAX }

#[inline]
pub fn point_in_bounds(p: &Point) -> bool { in_coord_bounds(p.x) && in_coord_bounds(p.y) }
