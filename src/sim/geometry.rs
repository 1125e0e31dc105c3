//! Collision geometry for circles and axis-aligned rectangles
//!
//! Screen convention: x grows right, y grows down. All containment tests are
//! strict, so points exactly on a boundary are outside.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An axis-aligned rectangle given by its top-left origin and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// Create a rectangle, rejecting empty or non-finite sizes
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) || !x.is_finite() || !y.is_finite() {
            return Err(Error::InvalidRect { width, height });
        }
        Ok(Self::from_parts(Vec2::new(x, y), Vec2::new(width, height)))
    }

    /// Square of edge `size` with its top-left at `origin`
    pub fn square(origin: Vec2, size: f32) -> Result<Self> {
        Self::new(origin.x, origin.y, size, size)
    }

    fn from_parts(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Corners in order: top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.left(), self.top()),
            Vec2::new(self.right(), self.top()),
            Vec2::new(self.left(), self.bottom()),
            Vec2::new(self.right(), self.bottom()),
        ]
    }

    /// Grow left and right by `amount`
    fn expand_x(&self, amount: f32) -> Self {
        Self::from_parts(
            self.origin - Vec2::new(amount, 0.0),
            self.size + Vec2::new(2.0 * amount, 0.0),
        )
    }

    /// Grow up and down by `amount`
    fn expand_y(&self, amount: f32) -> Self {
        Self::from_parts(
            self.origin - Vec2::new(0.0, amount),
            self.size + Vec2::new(0.0, 2.0 * amount),
        )
    }
}

/// True iff `point` lies in the open interior of `rect`
#[inline]
pub fn point_in_rect(point: Vec2, rect: &Rect) -> bool {
    rect.left() < point.x && point.x < rect.right() && rect.top() < point.y && point.y < rect.bottom()
}

/// True iff `point` is strictly closer than `radius` to `center`
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) < radius * radius
}

/// Check whether a circle overlaps a rectangle
///
/// A cheap bounding test rejects far-away rectangles first. Otherwise the
/// circle overlaps if its center is inside the rectangle stretched by the
/// radius along either axis, or if any rectangle corner is inside the circle.
pub fn circle_intersects_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let reach = radius + rect.width() + rect.height();
    if center.distance_squared(rect.center()) > reach * reach {
        return false;
    }

    if point_in_rect(center, &rect.expand_x(radius)) {
        return true;
    }
    if point_in_rect(center, &rect.expand_y(radius)) {
        return true;
    }

    rect.corners()
        .iter()
        .any(|&corner| point_in_circle(corner, center, radius))
}

/// True iff two circles overlap (touching does not count)
#[inline]
pub fn circles_overlap(a_center: Vec2, a_radius: f32, b_center: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_center.distance_squared(b_center) < reach * reach
}
