//! Subtracting (possibly concave) water regions from drawn districts.
//!
//! Every subject edge is cut where it touches the region boundary (the
//! "shore") and each piece is classified as covered by the region or not.
//! Pieces lying on the shore count as covered only when the subject edge runs
//! along a region edge with both interiors on the same side, so shared edges
//! and vertices snapped onto the shore classify consistently. Entries and
//! exits then alternate by construction. Between an entry and its exit the
//! output follows the shore, so the result stays one simple polygon instead
//! of jumping straight from entry to exit and self-intersecting.
//!
//! This runs on shape commit only; cost is O(subject edges × region edges).

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::algorithms::winding::{point_in_polygon, point_on_boundary, polygon_bounds, winding_sign};
use crate::config::ValidationRules;
use crate::geometry::intersect::segment_hit;
use crate::geometry::math::seg_distance_sq;
use crate::geometry::tolerance::{dedup_ring, drop_spikes, EPS_POS};
use crate::model::{Point, Polygon, Region};

// sin of the largest angle at which a subject edge still runs along a shore edge
const ALONG_SHORE_SIN: f64 = 1e-6;

#[derive(Clone, Copy, Debug)]
struct Crossing {
    /// Region edge the subject crosses (edge `j` runs `region[j] -> region[j+1]`)
    region_edge: usize,
    /// Parameter along that region edge; a region vertex `k` is always `(k, 0.0)`
    u: f64,
    point: Point,
}

/// Piece of a subject edge starting at parameter `t0` and running to the next contact.
#[derive(Clone, Copy, Debug)]
struct Fragment {
    t0: f64,
    start: Point,
    covered: bool,
}

/// Remove `region` from `subject`. An empty polygon means the subject was fully consumed.
///
/// A subject vertex counts as inside when a piece of boundary next to it is
/// covered by the region. Subjects with no vertex inside come back unchanged,
/// including the case where the region only grazes an edge or sits inside as
/// a hole.
pub fn subtract_region(subject: &[Point], region: &[Point]) -> Polygon {
    let mut ring = subject.to_vec();
    dedup_ring(&mut ring);
    let subject_sign = winding_sign(&ring);
    if ring.len() < 3 || subject_sign == 0 {
        return Vec::new();
    }
    let mut shore = region.to_vec();
    dedup_ring(&mut shore);
    let region_sign = winding_sign(&shore);
    if shore.len() < 3 || region_sign == 0 {
        return subject.to_vec();
    }

    let n = ring.len();
    let mut fragments: Vec<Fragment> = Vec::with_capacity(n * 2);
    let mut first_of_edge = Vec::with_capacity(n);
    for i in 0..n {
        first_of_edge.push(fragments.len());
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        let ts = contact_params(a, b, &shore);
        for w in ts.windows(2) {
            let mid = a.lerp(b, (w[0] + w[1]) * 0.5);
            fragments.push(Fragment {
                t0: w[0],
                start: a.lerp(b, w[0]),
                covered: covers(mid, b.sub(a), &shore, subject_sign * region_sign),
            });
        }
    }

    let nf = fragments.len();
    let inside: Vec<bool> = first_of_edge
        .iter()
        .map(|&f| fragments[f].covered || fragments[(f + nf - 1) % nf].covered)
        .collect();
    if !inside.iter().any(|v| *v) {
        return subject.to_vec();
    }
    if inside.iter().all(|v| *v) {
        return Vec::new();
    }

    // Begin just after an exit so every entry is seen before its exit
    let Some(start) = (0..nf).find(|&k| !fragments[k].covered && fragments[(k + nf - 1) % nf].covered) else {
        return give_up("no exit from the region", &ring, &inside);
    };
    debug!(
        "subtract_region: {} edges cut into {} pieces, {} covered",
        n,
        nf,
        fragments.iter().filter(|f| f.covered).count()
    );

    let mut out: Vec<Point> = Vec::with_capacity(n + shore.len());
    let mut open: Option<Crossing> = None;
    for step in 1..=nf {
        let k = (start + step) % nf;
        let f = fragments[k];
        let was_covered = fragments[(k + nf - 1) % nf].covered;
        match (was_covered, f.covered) {
            (false, false) => {
                if f.t0 == 0.0 {
                    out.push(f.start);
                }
            }
            (false, true) => {
                let Some(entry) = locate_on_shore(f.start, &shore) else {
                    return give_up("entry off the shore", &ring, &inside);
                };
                out.push(f.start);
                open = Some(entry);
            }
            (true, false) => {
                let Some(entry) = open.take() else {
                    return give_up("exit without an entry", &ring, &inside);
                };
                let Some(exit) = locate_on_shore(f.start, &shore) else {
                    return give_up("exit off the shore", &ring, &inside);
                };
                out.extend(trace_shore(&shore, &ring, &entry, &exit));
                out.push(f.start);
            }
            (true, true) => {}
        }
    }
    if open.is_some() {
        return give_up("unmatched entry crossing", &ring, &inside);
    }

    dedup_ring(&mut out);
    drop_spikes(&mut out);
    if out.len() < 3 {
        return Vec::new();
    }
    out
}

/// Sorted parameters along `a`-`b` where it meets the shore, first 0 and last 1.
fn contact_params(a: Point, b: Point, shore: &[Point]) -> Vec<f64> {
    let len = a.distance(b);
    let m = shore.len();
    let mut ts = vec![0.0, 1.0];
    for j in 0..m {
        let (r1, r2) = (shore[j], shore[(j + 1) % m]);
        if let Some(h) = segment_hit(a, b, r1, r2) {
            ts.push(h.t);
        }
        // Shore vertices resting on the edge; covers both ends of an overlapping shore edge
        let (d2, t) = seg_distance_sq(r1, a, b);
        if d2 <= EPS_POS * EPS_POS {
            ts.push(t);
        }
    }
    ts.sort_by(f64::total_cmp);
    ts.dedup_by(|later, kept| (*later - *kept) * len <= EPS_POS);
    if ts.len() < 2 {
        ts.push(1.0);
    } else if let Some(last) = ts.last_mut() {
        *last = 1.0;
    }
    ts
}

/// Whether the subject interior next to `mid` is covered by the region.
/// `orientation` is the product of both winding signs.
fn covers(mid: Point, dir: Point, shore: &[Point], orientation: i8) -> bool {
    let m = shore.len();
    let mut on_shore = false;
    for j in 0..m {
        let (r1, r2) = (shore[j], shore[(j + 1) % m]);
        if seg_distance_sq(mid, r1, r2).0 > EPS_POS * EPS_POS {
            continue;
        }
        let e = r2.sub(r1);
        if dir.cross(e).abs() <= ALONG_SHORE_SIN * dir.length() * e.length() {
            // Interiors on the same side of a shared edge
            return f64::from(orientation) * dir.dot(e) > 0.0;
        }
        on_shore = true;
    }
    !on_shore && point_in_polygon(mid, shore)
}

/// Shore edge and parameter of a contact point, `None` when `p` is off the shore.
fn locate_on_shore(p: Point, shore: &[Point]) -> Option<Crossing> {
    let m = shore.len();
    let (j, d2, u) = (0..m)
        .map(|j| {
            let (d2, u) = seg_distance_sq(p, shore[j], shore[(j + 1) % m]);
            (j, d2, u)
        })
        .min_by(|x, y| x.1.total_cmp(&y.1))?;
    if d2 > 4.0 * EPS_POS * EPS_POS {
        return None;
    }
    let len = shore[j].distance(shore[(j + 1) % m]);
    let (region_edge, u) = if (1.0 - u) * len <= EPS_POS {
        ((j + 1) % m, 0.0)
    } else if u * len <= EPS_POS {
        (j, 0.0)
    } else {
        (j, u)
    };
    Some(Crossing { region_edge, u, point: p })
}

fn give_up(reason: &str, subject: &[Point], inside: &[bool]) -> Polygon {
    warn!("subtract_region: {}, keeping outside vertices only", reason);
    outside_vertices(subject, inside)
}

/// Approximation used when crossings cannot be paired.
fn outside_vertices(subject: &[Point], inside: &[bool]) -> Polygon {
    let mut out: Vec<Point> = subject
        .iter()
        .zip(inside)
        .filter(|(_, ins)| !**ins)
        .map(|(p, _)| *p)
        .collect();
    dedup_ring(&mut out);
    if out.len() < 3 {
        return Vec::new();
    }
    out
}

/// Region vertices between an entry and its exit, in the direction that runs
/// through the subject's interior.
fn trace_shore(region: &[Point], subject: &[Point], entry: &Crossing, exit: &Crossing) -> Vec<Point> {
    let m = region.len();
    let (je, jx) = (entry.region_edge, exit.region_edge);

    let (forward, backward): (Vec<Point>, Vec<Point>) = if je == jx {
        // Same edge: one direction is the straight piece, the other goes all the way round
        if entry.u <= exit.u {
            (Vec::new(), (0..m).map(|k| region[(je + m - k) % m]).collect())
        } else {
            ((1..=m).map(|k| region[(je + k) % m]).collect(), Vec::new())
        }
    } else {
        let mut fwd = Vec::new();
        let mut k = (je + 1) % m;
        loop {
            fwd.push(region[k]);
            if k == jx {
                break;
            }
            k = (k + 1) % m;
        }
        let mut bwd = Vec::new();
        let stop = (jx + 1) % m;
        let mut k = je;
        loop {
            bwd.push(region[k]);
            if k == stop {
                break;
            }
            k = (k + m - 1) % m;
        }
        (fwd, bwd)
    };

    // Shore vertices on the subject boundary are not outside it
    let score = |path: &[Point]| {
        let outside = path
            .iter()
            .filter(|p| !point_on_boundary(**p, subject, EPS_POS) && !point_in_polygon(**p, subject))
            .count();
        let mut len = 0.0;
        let mut prev = entry.point;
        for p in path {
            len += prev.distance(*p);
            prev = *p;
        }
        len += prev.distance(exit.point);
        (outside, len)
    };
    let (f_out, f_len) = score(&forward);
    let (b_out, b_len) = score(&backward);
    if f_out < b_out || (f_out == b_out && f_len <= b_len) {
        forward
    } else {
        backward
    }
}

/// Subtract every overlapping region in turn. Stops early once nothing is left.
pub fn subtract_regions(subject: &[Point], regions: &[Region]) -> Polygon {
    let mut current: Polygon = subject.to_vec();
    for region in regions {
        if current.len() < 3 {
            return Vec::new();
        }
        let (Some(sb), Some(rb)) = (polygon_bounds(&current), polygon_bounds(&region.polygon)) else {
            continue;
        };
        if !sb.overlaps(&rb) {
            continue;
        }
        current = subtract_region(&current, &region.polygon);
        debug!("subtract_regions: after region {} -> {} vertices", region.id, current.len());
    }
    if current.len() < 3 {
        return Vec::new();
    }
    current
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ClipVerdict {
    Valid,
    /// Water covered the whole shape.
    Consumed,
    /// Clipped bounding box is below the minimum dimension (world units).
    TooSmall { width: f64, height: f64, required: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipReport {
    pub polygon: Polygon,
    pub verdict: ClipVerdict,
}

impl ClipReport {
    pub fn is_valid(&self) -> bool {
        self.verdict == ClipVerdict::Valid
    }
}

/// Clip a drawn shape against all regions and check it is still large enough to keep.
pub fn clip_and_validate(
    subject: &[Point],
    regions: &[Region],
    shape_type: &str,
    rules: &ValidationRules,
) -> ClipReport {
    let polygon = subtract_regions(subject, regions);
    let Some(b) = polygon_bounds(&polygon).filter(|_| polygon.len() >= 3) else {
        return ClipReport { polygon: Vec::new(), verdict: ClipVerdict::Consumed };
    };
    if rules.is_exempt(shape_type) {
        return ClipReport { polygon, verdict: ClipVerdict::Valid };
    }
    let required = rules.min_dimension_units();
    let (width, height) = (b.width(), b.height());
    let verdict = if width >= required && height >= required {
        ClipVerdict::Valid
    } else {
        debug!("clip_and_validate: {} shape {}x{} below {}", shape_type, width, height, required);
        ClipVerdict::TooSmall { width, height, required }
    };
    ClipReport { polygon, verdict }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::winding::polygon_area;
    use crate::model::{Bounds, RegionKind};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        Bounds::new(x0, y0, x1, y1).to_polygon()
    }

    #[test]
    fn corner_bite_traces_inner_shore() {
        let out = subtract_region(&rect(0.0, 0.0, 100.0, 100.0), &rect(60.0, 60.0, 120.0, 120.0));
        assert_eq!(out.len(), 6);
        assert!(out.contains(&Point::new(60.0, 60.0)));
        assert!((polygon_area(&out) - 8400.0).abs() < 1e-6);
    }

    #[test]
    fn notch_from_top_edge() {
        let region = vec![
            Point::new(40.0, 80.0),
            Point::new(60.0, 80.0),
            Point::new(60.0, 150.0),
            Point::new(40.0, 150.0),
        ];
        let subject = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(50.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        let out = subtract_region(&subject, &region);
        assert!(out.contains(&Point::new(60.0, 80.0)));
        assert!(out.contains(&Point::new(40.0, 80.0)));
        assert!((polygon_area(&out) - 9600.0).abs() < 1e-6);
    }

    #[test]
    fn entry_and_exit_on_same_region_edge() {
        let triangle = vec![Point::new(20.0, 0.0), Point::new(80.0, 0.0), Point::new(50.0, 80.0)];
        let out = subtract_region(&triangle, &rect(0.0, 50.0, 100.0, 150.0));
        assert_eq!(out.len(), 4);
        assert!((polygon_area(&out) - 2062.5).abs() < 1e-6);
    }

    #[test]
    fn lake_sharing_an_edge_leaves_the_other_half() {
        let out = subtract_region(&rect(0.0, 0.0, 100.0, 100.0), &rect(50.0, 0.0, 150.0, 100.0));
        assert_eq!(out.len(), 4);
        assert!((polygon_area(&out) - 5000.0).abs() < 1e-6);
        assert!(out.iter().all(|p| p.x <= 50.0));
    }

    #[test]
    fn vertex_on_the_shore_counts_by_its_edges() {
        let district = vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 20.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        let out = subtract_region(&district, &rect(50.0, -50.0, 150.0, 150.0));
        assert!((polygon_area(&out) - 4500.0).abs() < 1e-6);
        assert!(out.contains(&Point::new(50.0, 20.0)));
    }

    #[test]
    fn identical_region_consumes_subject() {
        let subject = rect(0.0, 0.0, 100.0, 100.0);
        assert!(subtract_region(&subject, &subject).is_empty());
        // Covering lake that shares two edges
        assert!(subtract_region(&subject, &rect(-50.0, -50.0, 100.0, 100.0)).is_empty());
    }

    #[test]
    fn lake_touching_from_outside_changes_nothing() {
        let subject = rect(0.0, 0.0, 100.0, 100.0);
        assert_eq!(subtract_region(&subject, &rect(100.0, 0.0, 200.0, 100.0)), subject);
        assert_eq!(subtract_region(&subject, &rect(100.0, 100.0, 200.0, 200.0)), subject);
    }

    #[test]
    fn hole_region_is_left_alone() {
        let subject = rect(0.0, 0.0, 100.0, 100.0);
        let out = subtract_region(&subject, &rect(40.0, 40.0, 60.0, 60.0));
        assert_eq!(out, subject);
    }

    #[test]
    fn degenerate_region_is_ignored() {
        let subject = rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(subtract_region(&subject, &subject[..2]), subject);
        assert!(subtract_region(&subject[..2], &subject).is_empty());
    }

    #[test]
    fn verdicts() {
        let rules = ValidationRules {
            min_dimension_meters: 50.0,
            units_per_meter: 1.0,
            exempt_types: vec!["plaza".into()],
        };
        let lake = Region::new("lake", RegionKind::Lake, rect(30.0, -10.0, 200.0, 200.0));
        let subject = rect(0.0, 0.0, 100.0, 100.0);

        let r = clip_and_validate(&subject, &[lake.clone()], "residential", &rules);
        assert!(matches!(r.verdict, ClipVerdict::TooSmall { .. }));
        assert!((polygon_area(&r.polygon) - 3000.0).abs() < 1e-6);

        let r = clip_and_validate(&subject, &[lake], "plaza", &rules);
        assert!(r.is_valid());

        let ocean = Region::new("ocean", RegionKind::Ocean, rect(-10.0, -10.0, 110.0, 110.0));
        let r = clip_and_validate(&subject, &[ocean], "plaza", &rules);
        assert_eq!(r.verdict, ClipVerdict::Consumed);
        assert!(r.polygon.is_empty());
    }
}
