//! Geometric primitives for placing and hit-testing diagram elements.
//!
//! Coordinates follow the screen and SVG convention: the origin is the
//! top-left corner and `y` grows downwards. Element boxes are anchored at
//! their top-left corner, which is where a click places them.

/// A position on the canvas.
///
/// ```
/// # use qoc_core::geometry::Point;
/// let moved = Point::new(10.0, 20.0).add_point(Point::new(5.0, -5.0));
/// assert_eq!(moved, Point::new(15.0, 15.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    /// Offsets this point by `other`, component-wise.
    pub fn add_point(self, other: Point) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

/// Width and height of an element box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }
}

/// An axis-aligned box, stored as its two opposite corners.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min: Point,
    max: Point,
}

impl Bounds {
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min: top_left,
            max: top_left.add_point(Point::new(size.width, size.height)),
        }
    }

    pub fn min_x(self) -> f32 {
        self.min.x
    }

    pub fn min_y(self) -> f32 {
        self.min.y
    }

    pub fn max_x(self) -> f32 {
        self.max.x
    }

    pub fn max_y(self) -> f32 {
        self.max.y
    }

    pub fn width(self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Returns true if `point` lies strictly inside the box.
    ///
    /// The border is outside, so two boxes that only touch never both claim
    /// a click.
    ///
    /// ```
    /// # use qoc_core::geometry::{Bounds, Point, Size};
    /// let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
    ///
    /// assert!(bounds.contains_point(Point::new(5.0, 5.0)));
    /// assert!(!bounds.contains_point(Point::new(0.0, 5.0)));
    /// assert!(!bounds.contains_point(Point::new(10.0, 10.0)));
    /// ```
    pub fn contains_point(self, point: Point) -> bool {
        self.min.x < point.x && point.x < self.max.x && self.min.y < point.y && point.y < self.max.y
    }

    /// Smallest box covering both `self` and `other`.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}
