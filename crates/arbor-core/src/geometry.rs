//! Geometric primitives for diagram layout and positioning.
//!
//! This module provides the small set of geometric types the layout engines
//! and rendering backends agree on.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangle defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Arbor uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Node positions always name the **top-left** corner of the node. A child's
//! position is relative to the top-left corner of its enclosing container;
//! top-level positions are relative to the canvas origin.

/// A 2D point representing a position in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use arbor_core::geometry::Point;
/// let origin = Point::new(50.0, 50.0);
/// let offset = Point::new(20.0, 50.0);
///
/// let absolute = origin.add_point(offset);
/// assert_eq!(absolute.x(), 70.0);
/// assert_eq!(absolute.y(), 100.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new Size with `extra` added to the height only
    pub fn grow_height(self, extra: f32) -> Self {
        Self {
            width: self.width,
            height: self.height + extra,
        }
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Returns true if `other` lies entirely inside these bounds (edges included).
    pub fn contains(self, other: Bounds) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// Returns true if the two bounds share any interior area.
    pub fn overlaps(self, other: Bounds) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use arbor_core::geometry::{Bounds, Point, Size};
    /// let header = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let content = Bounds::new_from_top_left(Point::new(10.0, 40.0), Size::new(120.0, 80.0));
    ///
    /// let combined = header.merge(&content);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}
