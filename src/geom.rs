//! Plane geometry shared by the gesture, hit-testing, and puppet layers.
//!
//! All points handed across component boundaries are in the stage's parent
//! space (canvas CSS pixels). Local space belongs to a single puppet and is
//! only reached through a [`Transform`].

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in either parent (stage) or local (puppet) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point { x: (self.x + other.x) / 2.0, y: (self.y + other.y) / 2.0 }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether `pt` lies inside the rectangle. Edges are inclusive.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point { x: self.x + self.width / 2.0, y: self.y + self.height / 2.0 }
    }
}

/// Placement of a puppet inside its parent.
///
/// `anchor` is the local-space point pinned to `position`; puppets keep it at
/// the centre of their natural size. `scale` is uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Point,
    pub scale: f64,
    pub anchor: Point,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Point::default(), scale: 1.0, anchor: Point::default() }
    }
}

impl Transform {
    /// Map a local-space point into parent space.
    #[must_use]
    pub fn local_to_parent(&self, local: Point) -> Point {
        Point {
            x: self.position.x + (local.x - self.anchor.x) * self.scale,
            y: self.position.y + (local.y - self.anchor.y) * self.scale,
        }
    }

    /// Map a parent-space point into local space.
    ///
    /// A zero scale collapses everything onto the anchor.
    #[must_use]
    pub fn parent_to_local(&self, parent: Point) -> Point {
        if self.scale.abs() < f64::EPSILON {
            return self.anchor;
        }
        Point {
            x: (parent.x - self.position.x) / self.scale + self.anchor.x,
            y: (parent.y - self.position.y) / self.scale + self.anchor.y,
        }
    }

    /// Map a local-space rectangle into parent space.
    #[must_use]
    pub fn rect_to_parent(&self, local: Rect) -> Rect {
        let origin = self.local_to_parent(Point::new(local.x, local.y));
        Rect { x: origin.x, y: origin.y, width: local.width * self.scale, height: local.height * self.scale }
    }
}
