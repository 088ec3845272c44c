//! Bounding polygons in image pixel space.

use serde::Serialize;

/// A single vertex of a bounding polygon, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point::new(x, y)
    }
}

/// An ordered, implicitly closed outline of an object in pixel space.
///
/// Stored as a list of vertices, so the x and y sequences handed to a
/// rasterizer always have the same length. A polygon is never empty:
/// an empty vertex list means "no polygon" and [`BoundingPolygon::new`]
/// returns `None` for it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BoundingPolygon {
    points: Vec<Point>,
}

impl BoundingPolygon {
    /// Builds a polygon from its vertices, or `None` when there are none.
    pub fn new(points: Vec<Point>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    /// The vertices in annotation order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed polygon; present for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The x coordinates, in vertex order.
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    /// The y coordinates, in vertex order.
    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// Returns true if every vertex is finite.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(Point::is_finite)
    }

    /// Axis-aligned extent of the polygon.
    pub fn bounds(&self) -> PolygonBounds {
        let mut bounds = PolygonBounds {
            xmin: f64::INFINITY,
            ymin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymax: f64::NEG_INFINITY,
        };
        for p in &self.points {
            bounds.xmin = bounds.xmin.min(p.x);
            bounds.ymin = bounds.ymin.min(p.y);
            bounds.xmax = bounds.xmax.max(p.x);
            bounds.ymax = bounds.ymax.max(p.y);
        }
        bounds
    }
}

/// Axis-aligned box around a polygon, XYXY in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PolygonBounds {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl PolygonBounds {
    /// Returns the width of the box.
    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Returns the height of the box.
    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}
