use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
    #[inline]
    pub fn sub(self, o: Point) -> Point {
        Point { x: self.x - o.x, y: self.y - o.y }
    }
    #[inline]
    pub fn add(self, o: Point) -> Point {
        Point { x: self.x + o.x, y: self.y + o.y }
    }
    #[inline]
    pub fn scale(self, s: f64) -> Point {
        Point { x: self.x * s, y: self.y * s }
    }
    /// z component of the 3D cross product.
    #[inline]
    pub fn cross(self, o: Point) -> f64 {
        self.x * o.y - self.y * o.x
    }
    #[inline]
    pub fn dot(self, o: Point) -> f64 {
        self.x * o.x + self.y * o.y
    }
    #[inline]
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
    #[inline]
    pub fn distance(self, o: Point) -> f64 {
        self.sub(o).length()
    }
    #[inline]
    pub fn lerp(self, o: Point, t: f64) -> Point {
        Point { x: self.x + (o.x - self.x) * t, y: self.y + (o.y - self.y) * t }
    }
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

/// Implicitly closed ring. Fewer than three vertices means "empty".
pub type Polygon = Vec<Point>;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Bounds { min_x, min_y, max_x, max_y }
    }

    pub fn from_point(p: Point) -> Self {
        Bounds { min_x: p.x, min_y: p.y, max_x: p.x, max_y: p.y }
    }

    /// `None` for an empty iterator.
    pub fn from_points<'a, I: IntoIterator<Item = &'a Point>>(points: I) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut b = Bounds::from_point(*first);
        for p in it {
            b.expand_to(*p);
        }
        Some(b)
    }

    pub fn expand_to(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn union(&self, o: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(o.min_x),
            min_y: self.min_y.min(o.min_y),
            max_x: self.max_x.max(o.max_x),
            max_y: self.max_y.max(o.max_y),
        }
    }

    pub fn inflate(&self, by: f64) -> Bounds {
        Bounds {
            min_x: self.min_x - by,
            min_y: self.min_y - by,
            max_x: self.max_x + by,
            max_y: self.max_y + by,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Inclusive overlap; touching boxes overlap.
    pub fn overlaps(&self, o: &Bounds) -> bool {
        self.min_x <= o.max_x && o.min_x <= self.max_x && self.min_y <= o.max_y && o.min_y <= self.max_y
    }

    /// Corner ring in counter-clockwise order (y up).
    pub fn to_polygon(&self) -> Polygon {
        vec![
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    Ocean,
    Lake,
    River,
}

/// Water body (or other area) that drawn shapes are clipped against.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub kind: RegionKind,
    pub polygon: Polygon,
}

impl Region {
    pub fn new(id: impl Into<String>, kind: RegionKind, polygon: Polygon) -> Self {
        Region { id: id.into(), kind, polygon }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiverFeature {
    pub id: String,
    pub centerline: Vec<Point>,
    pub width: f64,
    /// Per-vertex widths; used instead of `width` when it matches the centerline length.
    #[serde(default)]
    pub widths: Option<Vec<f64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSegment {
    pub a: Point,
    pub b: Point,
    pub geometry_id: String,
    pub geometry_type: String,
}

impl LineSegment {
    pub fn new(a: Point, b: Point, geometry_id: impl Into<String>, geometry_type: impl Into<String>) -> Self {
        LineSegment { a, b, geometry_id: geometry_id.into(), geometry_type: geometry_type.into() }
    }
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.a.x.min(self.b.x),
            min_y: self.a.y.min(self.b.y),
            max_x: self.a.x.max(self.b.x),
            max_y: self.a.y.max(self.b.y),
        }
    }
    pub fn midpoint(&self) -> Point {
        self.a.lerp(self.b, 0.5)
    }
    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapKind {
    Vertex,
    Midpoint,
    Nearest,
    Intersection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapPoint {
    pub x: f64,
    pub y: f64,
    pub kind: SnapKind,
    pub geometry_id: String,
    pub geometry_type: String,
    pub distance: f64,
}

impl SnapPoint {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    pub best: Option<SnapPoint>,
    /// Ascending by distance, all within the threshold.
    pub candidates: Vec<SnapPoint>,
}
