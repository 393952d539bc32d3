//! Geometric primitives for layout computation.
//!
//! This module provides the fundamental geometric types used throughout
//! Trellis for placing and sizing diagram components.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in layout space
//! - [`Size`] - Width and height dimensions
//! - [`Rect`] - An axis-aligned rectangle anchored at its top-left corner
//!
//! # Coordinate System
//!
//! Trellis uses a screen-style coordinate system:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward
//!
//! Rectangle positions refer to the top-left corner, matching how component
//! placements are stored.

/// A 2D point representing a position in layout coordinate space.
///
/// Points use `f32` coordinates. The coordinate system has its origin at the
/// top-left with Y increasing downward (see [module documentation](self)).
///
/// # Examples
///
/// ```
/// # use trellis_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
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

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
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

    /// Returns a new Size with the maximum width and height between this size and another
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Returns a new Size grown by the given amount in each dimension
    pub fn grow(self, amount: f32) -> Self {
        Self {
            width: self.width + amount,
            height: self.height + amount,
        }
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
///
/// This is the unit of collision testing during placement: sibling
/// rectangles must never overlap, and child rectangles must stay inside
/// their container's padded interior.
///
/// # Examples
///
/// ```
/// # use trellis_core::geometry::{Point, Rect, Size};
/// let a = Rect::new(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
/// let b = Rect::new(Point::new(20.0, 0.0), Size::new(10.0, 10.0));
///
/// assert!(!a.overlaps(&b));
/// assert!(a.union(&b).contains(&b));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a new rectangle from its top-left corner and size
    pub fn new(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    /// Returns the x-coordinate of the left edge
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the top edge
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns the width of the rectangle
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height of the rectangle
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the x-coordinate of the right edge
    pub fn max_x(self) -> f32 {
        self.x + self.width
    }

    /// Returns the y-coordinate of the bottom edge
    pub fn max_y(self) -> f32 {
        self.y + self.height
    }

    /// Returns the top-left corner as a Point
    pub fn origin(self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    /// Returns the dimensions as a Size
    pub fn size(self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Tests whether this rectangle overlaps another.
    ///
    /// Two rectangles are disjoint when one lies strictly left of, right of,
    /// above, or below the other. Rectangles that merely share an edge are
    /// treated as overlapping, so accepted placements always keep clear
    /// space between siblings.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.max_x() < other.x
            || other.max_x() < self.x
            || self.max_y() < other.y
            || other.max_y() < self.y)
    }

    /// Tests whether this rectangle fully contains another (edges may touch)
    pub fn contains(&self, other: &Rect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// Returns the smallest rectangle containing both this rectangle and another
    pub fn union(&self, other: &Rect) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self {
            x,
            y,
            width: self.max_x().max(other.max_x()) - x,
            height: self.max_y().max(other.max_y()) - y,
        }
    }

    /// Shrinks the rectangle by the given inset on every side.
    ///
    /// Used to compute a container's padded interior. Width and height are
    /// clamped at zero so a large inset never produces a negative extent.
    pub fn inset(&self, amount: f32) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - 2.0 * amount).max(0.0),
            height: (self.height - 2.0 * amount).max(0.0),
        }
    }
}
