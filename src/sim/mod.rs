//! Simulation module
//!
//! All gameplay logic lives here: motion, collisions and the win check.
//! - No rendering or platform dependencies
//! - Time step is supplied by the host
//! - Seeded RNG only

pub mod entity;
pub mod geometry;
pub mod maze;
pub mod mediator;
pub mod runner;
pub mod tick;

pub use entity::{Objective, Wall, circle_anchor};
pub use geometry::{Rect, circle_intersects_rect, circles_overlap, point_in_circle, point_in_rect};
pub use maze::{Segment, bounding_box, build_wall, default_layout};
pub use mediator::{
    COLLISION_MARGIN, CollisionTest, Controls, Mediator, RunState, any_collision, runner_hits_wall,
};
pub use runner::{MoveApproval, MoveOutcome, Runner, direction_from_keys, sanitize_time_step};
pub use tick::{Session, TickInput, tick};
