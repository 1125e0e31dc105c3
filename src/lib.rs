//! Maze Runner - steer a circle through a walled maze to the objective
//!
//! Core modules:
//! - `sim`: Simulation (motion, collisions, win condition, session state)
//! - `renderer`: Backend-agnostic draw list plus a terminal backend
//! - `settings`: Session configuration loaded from JSON
//! - `error`: Configuration and construction errors

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::{Palette, Settings};

/// Host loop constants
pub mod consts {
    /// Longest frame the host will feed into one tick (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Pixels per character cell for the terminal renderer
    pub const ASCII_CELL: (u32, u32) = (10, 20);
    /// Give up the headless demo after this many seconds of play
    pub const DEMO_TIME_LIMIT: f32 = 60.0;
}
