//! Point and path containers for compiled toolpaths.

use serde::{Deserialize, Serialize};

/// A 2D point with its move classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate in mm
    pub x: f64,
    /// Y coordinate in mm
    pub y: f64,
    /// True for a non-productive repositioning move (flow off),
    /// false for a productive draw move (flow on)
    pub is_travel: bool,
}

impl Point {
    /// A travel (rapid, flow off) point
    pub fn travel(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            is_travel: true,
        }
    }

    /// A draw (productive, flow on) point
    pub fn draw(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            is_travel: false,
        }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An ordered sequence of points sharing one flow lifecycle
///
/// The first point of a subpath is a travel point except where a shape
/// primitive explicitly generates otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotPath {
    /// The points of the path, in drawing order
    pub points: Vec<Point>,
}

impl PlotPath {
    /// Create a path from points
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// First point of the path
    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    /// Last point of the path
    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Total path length: the sum of Euclidean segment distances
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }
}

/// Axis-aligned bounding box over a set of paths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Compute the combined bounding box of all points in `paths`.
    ///
    /// Returns `None` when there are no points at all.
    pub fn of(paths: &[PlotPath]) -> Option<Self> {
        let mut bounds: Option<Bounds> = None;
        for path in paths {
            for point in &path.points {
                let b = bounds.get_or_insert(Bounds {
                    min_x: point.x,
                    min_y: point.y,
                    max_x: point.x,
                    max_y: point.y,
                });
                b.min_x = b.min_x.min(point.x);
                b.min_y = b.min_y.min(point.y);
                b.max_x = b.max_x.max(point.x);
                b.max_y = b.max_y.max(point.y);
            }
        }
        bounds
    }

    /// Center of the bounding box
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Width of the bounding box
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
