//! Cursor snapping to vertices, midpoints, edges and crossings of nearby geometry.
//!
//! Called on every pointer move, so all work is bounded by the segments the
//! grid returns for the snap radius, never by the total segment count.

use log::debug;
#[cfg(feature = "snap_prof")]
use std::time::Instant;

use crate::algorithms::spatial::{SegmentId, SpatialIndex};
use crate::config::{SnapConfig, DEFAULT_CELL_SIZE};
use crate::geometry::intersect::segment_intersection;
use crate::geometry::math::project_onto_segment;
use crate::geometry::tolerance::NEAREST_END_EXCLUSION;
use crate::model::{Bounds, LineSegment, Point, SnapKind, SnapPoint, SnapResult};

/// Source of snappable segments (roads, coastlines, rivers, ...).
pub trait GeometryProvider {
    fn line_segments(&self) -> Vec<LineSegment>;
    /// `None` when the provider currently has nothing to offer.
    fn bounding_box(&self) -> Option<Bounds>;
}

/// Fixed list of segments, e.g. one layer pushed from the editor.
#[derive(Clone, Debug, Default)]
pub struct SegmentLayer {
    segments: Vec<LineSegment>,
    bounds: Option<Bounds>,
}

impl SegmentLayer {
    pub fn new(segments: Vec<LineSegment>) -> Self {
        let bounds = segments.iter().map(LineSegment::bounds).reduce(|a, b| a.union(&b));
        SegmentLayer { segments, bounds }
    }

    /// Consecutive pairs of an open chain.
    pub fn from_polyline(geometry_id: &str, geometry_type: &str, points: &[Point]) -> Self {
        SegmentLayer::new(
            points
                .windows(2)
                .map(|w| LineSegment::new(w[0], w[1], geometry_id, geometry_type))
                .collect(),
        )
    }

    /// Closed ring: the last point connects back to the first.
    pub fn from_ring(geometry_id: &str, geometry_type: &str, points: &[Point]) -> Self {
        let mut layer = SegmentLayer::from_polyline(geometry_id, geometry_type, points);
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            if points.len() > 2 && first != last {
                layer.push(LineSegment::new(*last, *first, geometry_id, geometry_type));
            }
        }
        layer
    }

    pub fn push(&mut self, segment: LineSegment) {
        let b = segment.bounds();
        self.bounds = Some(self.bounds.map_or(b, |prev| prev.union(&b)));
        self.segments.push(segment);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl GeometryProvider for SegmentLayer {
    fn line_segments(&self) -> Vec<LineSegment> {
        self.segments.clone()
    }
    fn bounding_box(&self) -> Option<Bounds> {
        self.bounds
    }
}

/// Snap state for one editor session: the segment grid plus the providers feeding it.
pub struct SnapEngine {
    index: SpatialIndex,
    providers: Vec<(String, Box<dyn GeometryProvider>)>,
    config: SnapConfig,
}

impl Default for SnapEngine {
    fn default() -> Self {
        SnapEngine::new(SnapConfig::default())
    }
}

impl SnapEngine {
    pub fn new(config: SnapConfig) -> Self {
        SnapEngine::with_cell_size(config, DEFAULT_CELL_SIZE)
    }

    pub fn with_cell_size(config: SnapConfig, cell_size: f64) -> Self {
        SnapEngine { index: SpatialIndex::new(cell_size), providers: Vec::new(), config }
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SnapConfig) {
        self.config = config;
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn provider_keys(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|(k, _)| k.as_str())
    }

    /// Add or replace the provider stored under `key`, then rebuild the grid.
    pub fn register_provider(&mut self, key: impl Into<String>, provider: Box<dyn GeometryProvider>) {
        let key = key.into();
        match self.providers.iter().position(|(k, _)| *k == key) {
            Some(i) => self.providers[i].1 = provider,
            None => self.providers.push((key, provider)),
        }
        self.rebuild();
    }

    /// Returns `false` when no provider was registered under `key`.
    pub fn unregister_provider(&mut self, key: &str) -> bool {
        let before = self.providers.len();
        self.providers.retain(|(k, _)| k != key);
        if self.providers.len() == before {
            return false;
        }
        self.rebuild();
        true
    }

    /// Pull every provider's segments into a fresh grid.
    pub fn rebuild(&mut self) {
        #[cfg(feature = "snap_prof")]
        let t0 = Instant::now();
        self.index.clear();
        for (key, provider) in &self.providers {
            if provider.bounding_box().is_none() {
                continue;
            }
            let segs = provider.line_segments();
            debug!("snap rebuild: provider {} -> {} segments", key, segs.len());
            self.index.extend(segs);
        }
        #[cfg(feature = "snap_prof")]
        debug!(
            "snap rebuild segments={} cells={} ms={:.3}",
            self.index.len(),
            self.index.occupied_cells(),
            t0.elapsed().as_secs_f64() * 1000.0
        );
    }

    /// Insert one feature's segments without a rebuild. They are dropped on the
    /// next rebuild unless a provider also reports them.
    pub fn add_segments<I: IntoIterator<Item = LineSegment>>(&mut self, segments: I) {
        self.index.extend(segments);
    }

    pub fn remove_geometry(&mut self, geometry_id: &str) -> usize {
        self.index.remove_geometry(geometry_id)
    }

    pub fn clear(&mut self) {
        self.providers.clear();
        self.index.clear();
    }

    /// Best snap target near `(x, y)` and every candidate within the threshold, closest first.
    pub fn find_snap_point(&self, x: f64, y: f64) -> SnapResult {
        #[cfg(feature = "snap_prof")]
        let t0 = Instant::now();
        let cursor = Point::new(x, y);
        let cfg = &self.config;

        let segments: Vec<(SegmentId, &LineSegment)> = self
            .index
            .query_ids(cursor, cfg.threshold)
            .into_iter()
            .filter_map(|id| self.index.get(id).map(|s| (id, s)))
            .filter(|(_, s)| cfg.allows_type(&s.geometry_type))
            .collect();

        let mut candidates = Vec::new();
        for (_, seg) in &segments {
            collect_segment_candidates(cursor, seg, cfg, &mut candidates);
        }
        if cfg.is_enabled(SnapKind::Intersection) && segments.len() > 1 {
            collect_intersections(cursor, &segments, &mut candidates);
        }

        candidates.retain(|c| c.distance <= cfg.threshold);
        candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        let best = candidates.first().cloned();

        #[cfg(feature = "snap_prof")]
        debug!(
            "snap query segments={} candidates={} ms={:.4}",
            segments.len(),
            candidates.len(),
            t0.elapsed().as_secs_f64() * 1000.0
        );
        SnapResult { best, candidates }
    }

    /// Snapped position, or the cursor itself when nothing is in range.
    pub fn snap_or_cursor(&self, x: f64, y: f64) -> Point {
        self.find_snap_point(x, y).best.map_or(Point::new(x, y), |b| b.point())
    }
}

fn candidate(cursor: Point, at: Point, kind: SnapKind, seg: &LineSegment) -> SnapPoint {
    SnapPoint {
        x: at.x,
        y: at.y,
        kind,
        geometry_id: seg.geometry_id.clone(),
        geometry_type: seg.geometry_type.clone(),
        distance: cursor.distance(at),
    }
}

fn collect_segment_candidates(cursor: Point, seg: &LineSegment, cfg: &SnapConfig, out: &mut Vec<SnapPoint>) {
    if cfg.is_enabled(SnapKind::Vertex) {
        out.push(candidate(cursor, seg.a, SnapKind::Vertex, seg));
        out.push(candidate(cursor, seg.b, SnapKind::Vertex, seg));
    }
    if cfg.is_enabled(SnapKind::Midpoint) {
        out.push(candidate(cursor, seg.midpoint(), SnapKind::Midpoint, seg));
    }
    if cfg.is_enabled(SnapKind::Nearest) {
        let (foot, t, _) = project_onto_segment(cursor, seg.a, seg.b);
        // Near the ends the vertex candidate already covers it
        if t > NEAREST_END_EXCLUSION && t < 1.0 - NEAREST_END_EXCLUSION {
            out.push(candidate(cursor, foot, SnapKind::Nearest, seg));
        }
    }
}

fn collect_intersections(cursor: Point, segments: &[(SegmentId, &LineSegment)], out: &mut Vec<SnapPoint>) {
    for (i, (_, s1)) in segments.iter().enumerate() {
        for (_, s2) in &segments[i + 1..] {
            if s1.geometry_id == s2.geometry_id {
                continue;
            }
            let Some(p) = segment_intersection(s1.a, s1.b, s2.a, s2.b) else {
                continue;
            };
            let geometry_type = if s1.geometry_type == s2.geometry_type {
                s1.geometry_type.clone()
            } else {
                format!("{}|{}", s1.geometry_type, s2.geometry_type)
            };
            out.push(SnapPoint {
                x: p.x,
                y: p.y,
                kind: SnapKind::Intersection,
                geometry_id: format!("{}|{}", s1.geometry_id, s2.geometry_id),
                geometry_type,
                distance: cursor.distance(p),
            });
        }
    }
}
