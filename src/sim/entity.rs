//! Static entities: wall blocks and the objective
//!
//! Both are plain data, validated on construction and never mutated after.

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::error::{Error, Result};

/// Integer top-left of a circle's bounding box, used as the draw anchor
#[inline]
pub fn circle_anchor(center: Vec2, radius: f32) -> IVec2 {
    (center - Vec2::splat(radius)).floor().as_ivec2()
}

pub(crate) fn check_radius(radius: f32) -> Result<f32> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(Error::InvalidRadius(radius))
    }
}

/// A fixed rectangular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub rect: Rect,
}

impl Wall {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    /// A square block of edge `size` with its top-left at `origin`
    pub fn block(origin: Vec2, size: f32) -> Result<Self> {
        Ok(Self::new(Rect::square(origin, size)?))
    }
}

/// The circular goal the runner must reach
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    center: Vec2,
    radius: f32,
}

impl Objective {
    pub fn new(center: Vec2, radius: f32) -> Result<Self> {
        if !center.is_finite() {
            return Err(Error::InvalidSetting {
                key: "OBJECTIVE",
                reason: format!("center must be finite, got {center}"),
            });
        }
        Ok(Self {
            center,
            radius: check_radius(radius)?,
        })
    }

    /// Place the objective at a uniformly random pixel inside the viewport
    pub fn random<R: Rng + ?Sized>(rng: &mut R, viewport: (u32, u32), radius: f32) -> Result<Self> {
        let x = rng.random_range(0..viewport.0.max(1));
        let y = rng.random_range(0..viewport.1.max(1));
        Self::new(Vec2::new(x as f32, y as f32), radius)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn anchor(&self) -> IVec2 {
        circle_anchor(self.center, self.radius)
    }
}
