//! Maze layout built from square wall blocks

use glam::Vec2;

use super::entity::Wall;
use crate::error::Result;
use crate::settings::Settings;

/// A straight run of blocks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Top-left of the first block
    pub start: Vec2,
    /// Axis direction to lay blocks along, e.g. `(1, 0)`
    pub dir: Vec2,
    /// Total length in pixels; partial blocks are dropped
    pub length: f32,
}

impl Segment {
    pub const fn new(start: Vec2, dir: Vec2, length: f32) -> Self {
        Self { start, dir, length }
    }
}

/// The hand-placed ledge inside the bounding box
pub const INNER_SEGMENTS: [Segment; 1] = [Segment::new(
    Vec2::new(15.0, 200.0),
    Vec2::new(1.0, 0.0),
    20.0,
)];

/// Lay `floor(length / block_size)` blocks starting at `start`
pub fn build_wall(segment: &Segment, block_size: f32) -> Result<Vec<Wall>> {
    let count = (segment.length / block_size).max(0.0) as usize;
    let step = segment.dir * block_size;
    (0..count)
        .map(|i| Wall::block(segment.start + step * i as f32, block_size))
        .collect()
}

/// Four runs of blocks framing the viewport, inset by one block
pub fn bounding_box(viewport: Vec2, block_size: f32) -> Result<Vec<Wall>> {
    let bs = block_size;
    let top_left = Vec2::splat(bs);
    let bottom_right = viewport - Vec2::splat(2.0 * bs);
    let width = viewport.x - 2.0 * bs;
    let height = viewport.y - 2.0 * bs;

    let runs = [
        Segment::new(top_left, Vec2::X, width),
        Segment::new(top_left, Vec2::Y, height),
        Segment::new(bottom_right, Vec2::NEG_X, width),
        Segment::new(bottom_right, Vec2::NEG_Y, height),
    ];

    let mut walls = Vec::new();
    for run in &runs {
        walls.extend(build_wall(run, bs)?);
    }
    Ok(walls)
}

/// The full maze for a session: inner segments plus the bounding box
pub fn default_layout(settings: &Settings) -> Result<Vec<Wall>> {
    let mut walls = Vec::new();
    for segment in &INNER_SEGMENTS {
        walls.extend(build_wall(segment, settings.block_size)?);
    }
    walls.extend(bounding_box(settings.viewport(), settings.block_size)?);
    log::debug!("Built maze with {} blocks", walls.len());
    Ok(walls)
}
