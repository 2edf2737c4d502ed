//! Geometry core of the city designer: polygon clipping against water and
//! world bounds, line splits, river ribbons, and cursor snapping backed by a
//! segment grid.
//!
//! Snapping ([`SnapEngine::find_snap_point`]) is cheap enough for every
//! pointer move. The polygon operations scan whole boundaries and belong on
//! shape commit.

pub mod config;
pub mod model;
pub mod geometry {
    pub mod intersect;
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod clip;
    pub mod difference;
    pub mod ribbon;
    pub mod snap;
    pub mod spatial;
    pub mod split;
    pub mod winding;
}

pub use algorithms::clip::{clip, clip_to_bounds};
pub use algorithms::difference::{
    clip_and_validate, subtract_region, subtract_regions, ClipReport, ClipVerdict,
};
pub use algorithms::ribbon::river_to_polygon;
pub use algorithms::snap::{GeometryProvider, SegmentLayer, SnapEngine};
pub use algorithms::spatial::{SegmentId, SpatialIndex};
pub use algorithms::split::{split_with_line, SplitError};
pub use algorithms::winding::{
    bounds_overlap, point_in_polygon, polygon_area, polygon_bounds, polygon_centroid, signed_area,
};
pub use config::{ConfigError, SnapConfig, ValidationRules, DEFAULT_CELL_SIZE, DEFAULT_SNAP_THRESHOLD};
pub use geometry::intersect::segment_intersection;
pub use model::{
    Bounds, LineSegment, Point, Polygon, Region, RegionKind, RiverFeature, SnapKind, SnapPoint,
    SnapResult,
};
