//! Uniform grid over line segments for radius queries on pointer move.
//!
//! A segment is listed in every cell its bounding box touches. For diagonal
//! segments that over-approximates the cells it really crosses; queries
//! filter by distance later anyway.

use std::collections::HashMap;

use log::trace;

use crate::config::DEFAULT_CELL_SIZE;
use crate::geometry::limits::MAX_CELLS_PER_SEGMENT;
use crate::model::{Bounds, LineSegment, Point};

/// Handle of an inserted segment. Valid until that segment is removed; freed
/// slots are handed out again by later inserts.
pub type SegmentId = u32;

type CellKey = (i32, i32);

#[derive(Clone, Debug)]
pub struct SpatialIndex {
    cell: f64,
    segments: Vec<Option<LineSegment>>, // id is index
    free: Vec<SegmentId>,
    cells: HashMap<CellKey, Vec<SegmentId>>,
    per_segment_cells: HashMap<SegmentId, Vec<CellKey>>,
    by_geometry: HashMap<String, Vec<SegmentId>>,
    // Segments spanning more than MAX_CELLS_PER_SEGMENT cells; checked by every query
    oversized: Vec<SegmentId>,
    // Cell range ever occupied since the last clear (min_cx, min_cy, max_cx, max_cy)
    cell_extent: Option<(i32, i32, i32, i32)>,
    live: usize,
    bounds: Option<Bounds>,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        SpatialIndex::new(DEFAULT_CELL_SIZE)
    }
}

impl SpatialIndex {
    /// Non-positive or non-finite sizes fall back to [`DEFAULT_CELL_SIZE`].
    pub fn new(cell_size: f64) -> Self {
        let cell = if cell_size.is_finite() && cell_size > 0.0 { cell_size } else { DEFAULT_CELL_SIZE };
        SpatialIndex {
            cell,
            segments: Vec::new(),
            free: Vec::new(),
            cells: HashMap::new(),
            per_segment_cells: HashMap::new(),
            by_geometry: HashMap::new(),
            oversized: Vec::new(),
            cell_extent: None,
            live: 0,
            bounds: None,
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Running bounds of everything inserted since the last clear; `None` when empty.
    /// Removals do not shrink it.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, id: SegmentId) -> Option<&LineSegment> {
        self.segments.get(id as usize).and_then(|s| s.as_ref())
    }

    #[inline]
    fn cell_coord(&self, v: f64) -> i32 {
        // `as` saturates for out-of-range floats
        (v / self.cell).floor() as i32
    }

    fn cell_range(&self, b: &Bounds) -> (i32, i32, i32, i32) {
        (
            self.cell_coord(b.min_x),
            self.cell_coord(b.min_y),
            self.cell_coord(b.max_x),
            self.cell_coord(b.max_y),
        )
    }

    /// Number of cells in an inclusive range; saturates instead of overflowing.
    fn span((cx0, cy0, cx1, cy1): (i32, i32, i32, i32)) -> i64 {
        let w = cx1 as i64 - cx0 as i64 + 1;
        let h = cy1 as i64 - cy0 as i64 + 1;
        if w <= 0 || h <= 0 {
            return 0;
        }
        w.saturating_mul(h)
    }

    pub fn insert(&mut self, segment: LineSegment) -> SegmentId {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                self.segments.push(None);
                (self.segments.len() - 1) as SegmentId
            }
        };
        let b = segment.bounds();
        let range = self.cell_range(&b);

        if !segment.a.is_finite() || !segment.b.is_finite() || Self::span(range) > MAX_CELLS_PER_SEGMENT as i64 {
            self.oversized.push(id);
        } else {
            let (cx0, cy0, cx1, cy1) = range;
            let mut keys = Vec::with_capacity(Self::span(range) as usize);
            for cx in cx0..=cx1 {
                for cy in cy0..=cy1 {
                    self.cells.entry((cx, cy)).or_default().push(id);
                    keys.push((cx, cy));
                }
            }
            self.per_segment_cells.insert(id, keys);
            self.cell_extent = Some(match self.cell_extent {
                Some((x0, y0, x1, y1)) => (x0.min(cx0), y0.min(cy0), x1.max(cx1), y1.max(cy1)),
                None => range,
            });
        }

        if b.min_x.is_finite() && b.min_y.is_finite() && b.max_x.is_finite() && b.max_y.is_finite() {
            self.bounds = Some(match self.bounds {
                Some(prev) => prev.union(&b),
                None => b,
            });
        }
        self.by_geometry.entry(segment.geometry_id.clone()).or_default().push(id);
        self.segments[id as usize] = Some(segment);
        self.live += 1;
        id
    }

    pub fn extend<I: IntoIterator<Item = LineSegment>>(&mut self, segments: I) {
        for s in segments {
            self.insert(s);
        }
    }

    pub fn remove(&mut self, id: SegmentId) -> Option<LineSegment> {
        let seg = self.segments.get_mut(id as usize)?.take()?;
        match self.per_segment_cells.remove(&id) {
            Some(keys) => {
                for k in keys {
                    if let Some(list) = self.cells.get_mut(&k) {
                        list.retain(|&x| x != id);
                        if list.is_empty() {
                            self.cells.remove(&k);
                        }
                    }
                }
            }
            None => self.oversized.retain(|&x| x != id),
        }
        if let Some(ids) = self.by_geometry.get_mut(&seg.geometry_id) {
            ids.retain(|&x| x != id);
            if ids.is_empty() {
                self.by_geometry.remove(&seg.geometry_id);
            }
        }
        self.free.push(id);
        self.live -= 1;
        Some(seg)
    }

    /// Drop every segment owned by `geometry_id`; returns how many went.
    pub fn remove_geometry(&mut self, geometry_id: &str) -> usize {
        let Some(ids) = self.by_geometry.remove(geometry_id) else {
            return 0;
        };
        ids.into_iter().filter(|id| self.remove(*id).is_some()).count()
    }

    /// Slots held for reuse after removals.
    pub fn free_slots(&self) -> usize {
        self.free.len()
    }

    /// Ids of segments whose cells intersect the square `point ± radius`,
    /// each once, in ascending id order.
    pub fn query_ids(&self, point: Point, radius: f64) -> Vec<SegmentId> {
        if self.live == 0 || !point.is_finite() || !radius.is_finite() || radius < 0.0 {
            return Vec::new();
        }
        let mut ids: Vec<SegmentId> = self.oversized.clone();
        let q = Bounds::new(point.x - radius, point.y - radius, point.x + radius, point.y + radius);
        let (qx0, qy0, qx1, qy1) = self.cell_range(&q);
        // Nothing outside the occupied extent can match
        let range = match self.cell_extent {
            Some((x0, y0, x1, y1)) => (qx0.max(x0), qy0.max(y0), qx1.min(x1), qy1.min(y1)),
            None => (0, 0, -1, -1),
        };
        let span = Self::span(range);
        let (cx0, cy0, cx1, cy1) = range;

        if span == 0 {
            // only oversized segments
        } else if span > self.cells.len() as i64 {
            // Walking the occupied cells is cheaper than the range
            for ((cx, cy), list) in &self.cells {
                if (cx0..=cx1).contains(cx) && (cy0..=cy1).contains(cy) {
                    ids.extend_from_slice(list);
                }
            }
        } else {
            for cx in cx0..=cx1 {
                for cy in cy0..=cy1 {
                    if let Some(list) = self.cells.get(&(cx, cy)) {
                        ids.extend_from_slice(list);
                    }
                }
            }
        }
        ids.sort_unstable();
        ids.dedup();
        trace!("spatial query cells={} hits={}", span, ids.len());
        ids
    }

    pub fn query(&self, point: Point, radius: f64) -> Vec<&LineSegment> {
        self.query_ids(point, radius).into_iter().filter_map(|id| self.get(id)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &LineSegment)> {
        self.segments.iter().enumerate().filter_map(|(i, s)| s.as_ref().map(|s| (i as SegmentId, s)))
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.free.clear();
        self.cells.clear();
        self.per_segment_cells.clear();
        self.by_geometry.clear();
        self.oversized.clear();
        self.cell_extent = None;
        self.live = 0;
        self.bounds = None;
    }
}
