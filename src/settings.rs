//! Game settings
//!
//! Loaded once at startup from a flat JSON file and treated as constants for
//! the rest of the session. Keys are upper-case (`SCREEN_SIZE`, `PLAYER_DRAG`,
//! ...) to match the `settings.json` shipped with the game.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sim::mediator::COLLISION_MARGIN;
use crate::sim::runner::check_motion;

/// An RGB color
pub type Rgb = [u8; 3];

/// Colors used by the rendering adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Palette {
    pub white: Rgb,
    pub black: Rgb,
    pub red: Rgb,
    pub green: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            white: [230, 230, 230],
            black: [0, 0, 0],
            red: [255, 0, 0],
            green: [0, 200, 0],
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Viewport size in pixels (width, height)
    #[serde(rename = "SCREEN_SIZE")]
    pub screen_size: (u32, u32),
    #[serde(rename = "PLAYER_RADIUS")]
    pub player_radius: f32,
    /// Terminal speed in pixels/sec (acceleration = max speed * drag)
    #[serde(rename = "PLAYER_MAXSPEED")]
    pub player_max_speed: f32,
    /// Drag coefficient, 1/sec
    #[serde(rename = "PLAYER_DRAG")]
    pub player_drag: f32,
    /// Edge length of one square wall block
    #[serde(rename = "BLOCK_SIZE")]
    pub block_size: f32,
    #[serde(rename = "OBJECTIVE_RADIUS")]
    pub objective_radius: f32,
    /// Target frame rate of the host loop
    #[serde(rename = "FPS")]
    pub fps: u32,

    /// Where the runner starts (sub-pixel center)
    #[serde(rename = "PLAYER_START", default = "default_player_start")]
    pub player_start: (f32, f32),
    /// Fraction of velocity kept (and reversed) when a move is blocked
    #[serde(rename = "BOUNCE_BACK", default = "default_bounce_back")]
    pub bounce_back: f32,
    #[serde(rename = "COLORS", default)]
    pub palette: Palette,
}

fn default_player_start() -> (f32, f32) {
    (30.0, 100.0)
}

fn default_bounce_back() -> f32 {
    0.5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_size: (640, 480),
            player_radius: 10.0,
            player_max_speed: 200.0,
            player_drag: 2.0,
            block_size: 10.0,
            objective_radius: 15.0,
            fps: 30,
            player_start: default_player_start(),
            bounce_back: default_bounce_back(),
            palette: Palette::default(),
        }
    }
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check every value is inside the range the simulation can handle
    pub fn validate(&self) -> Result<()> {
        let (w, h) = self.screen_size;
        if w == 0 || h == 0 {
            return Err(invalid("SCREEN_SIZE", format!("must be non-zero, got {w}x{h}")));
        }
        positive("PLAYER_RADIUS", self.player_radius)?;
        // Walls are tested against the radius shrunk by the margin
        if self.player_radius <= COLLISION_MARGIN {
            return Err(invalid(
                "PLAYER_RADIUS",
                format!("must exceed the collision margin {COLLISION_MARGIN}, got {}", self.player_radius),
            ));
        }
        positive("BLOCK_SIZE", self.block_size)?;
        positive("OBJECTIVE_RADIUS", self.objective_radius)?;
        check_motion(self.player_max_speed, self.player_drag)?;
        if self.fps == 0 {
            return Err(invalid("FPS", "must be non-zero".into()));
        }
        if !(0.0..=1.0).contains(&self.bounce_back) {
            return Err(invalid(
                "BOUNCE_BACK",
                format!("must be within [0, 1], got {}", self.bounce_back),
            ));
        }
        // The bounding box needs room for at least one interior block
        let min_side = w.min(h) as f32;
        if self.block_size * 3.0 > min_side {
            return Err(invalid(
                "BLOCK_SIZE",
                format!("{} is too large for a {w}x{h} viewport", self.block_size),
            ));
        }
        let (sx, sy) = self.player_start;
        if !sx.is_finite() || !sy.is_finite() {
            return Err(invalid("PLAYER_START", format!("must be finite, got ({sx}, {sy})")));
        }
        Ok(())
    }

    /// Viewport size as a vector
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.screen_size.0 as f32, self.screen_size.1 as f32)
    }

    /// Fixed time step matching the target frame rate
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps as f32
    }
}

fn invalid(key: &'static str, reason: String) -> Error {
    Error::InvalidSetting { key, reason }
}

fn positive(key: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(key, format!("must be finite and positive, got {value}")))
    }
}
