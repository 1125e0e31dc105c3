//! The player-controlled runner and its motion integrator
//!
//! Motion is damped acceleration: each step blends the previous velocity
//! (scaled down by drag) with the input direction (scaled by acceleration),
//! then moves by the new velocity. A step is only kept if the supplied
//! [`MoveApproval`] accepts the candidate position.

use std::f32::consts::FRAC_1_SQRT_2;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::entity::{check_radius, circle_anchor};
use crate::consts::MAX_FRAME_DT;
use crate::error::{Error, Result};
use crate::settings::Settings;

/// Decides whether the runner may stay at its candidate position
pub trait MoveApproval {
    fn approve_move(&self, runner: &Runner) -> bool;
}

impl<F> MoveApproval for F
where
    F: Fn(&Runner) -> bool,
{
    fn approve_move(&self, runner: &Runner) -> bool {
        self(runner)
    }
}

/// Result of a single integration step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Accepted,
    /// Position rolled back, velocity reversed and damped
    Rejected,
}

/// Map four direction keys to a unit (or zero) vector
///
/// Opposing keys cancel. Diagonals are normalized so the runner is not faster
/// when moving on two axes.
pub fn direction_from_keys(up: bool, down: bool, left: bool, right: bool) -> Vec2 {
    let axis = |neg: bool, pos: bool| match (neg, pos) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    };
    let dir = Vec2::new(axis(left, right), axis(up, down));
    if dir.x != 0.0 && dir.y != 0.0 {
        dir * FRAC_1_SQRT_2
    } else {
        dir
    }
}

/// Clamp a host-supplied time step to something the integrator can use
///
/// NaN, infinite and negative steps become zero so the tick leaves the runner
/// where it is. Steps longer than [`MAX_FRAME_DT`] are cut down to it.
pub fn sanitize_time_step(time_step: f32) -> f32 {
    if !(time_step.is_finite() && time_step >= 0.0) {
        log::warn!("Ignoring invalid time step {time_step}");
        return 0.0;
    }
    if time_step > MAX_FRAME_DT {
        log::debug!("Clamping time step {time_step} to {MAX_FRAME_DT}");
        return MAX_FRAME_DT;
    }
    time_step
}

/// Reject speed and drag values the integrator cannot turn into finite motion
pub(crate) fn check_motion(max_speed: f32, drag: f32) -> Result<()> {
    if !(max_speed.is_finite() && max_speed >= 0.0) {
        return Err(Error::InvalidSetting {
            key: "PLAYER_MAXSPEED",
            reason: format!("must be finite and non-negative, got {max_speed}"),
        });
    }
    if !(drag.is_finite() && drag >= 0.0 && drag * MAX_FRAME_DT <= 1.0) {
        return Err(Error::InvalidSetting {
            key: "PLAYER_DRAG",
            reason: format!("must be within [0, {}], got {drag}", 1.0 / MAX_FRAME_DT),
        });
    }
    if !(max_speed * drag).is_finite() {
        return Err(Error::InvalidSetting {
            key: "PLAYER_MAXSPEED",
            reason: format!("acceleration {max_speed} * {drag} overflows"),
        });
    }
    Ok(())
}

/// The circular player entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runner {
    radius: f32,
    /// Sub-pixel center, always the last accepted position
    pos: Vec2,
    /// Pixels per second
    vel: Vec2,
    dir: Vec2,
    acc: f32,
    drag: f32,
    bounce_back: f32,
    /// Integer top-left of the bounding box, kept in sync with `pos`
    anchor: IVec2,
}

impl Runner {
    /// Create a runner at rest
    ///
    /// Acceleration is derived as `max_speed * drag`, which makes `max_speed`
    /// the terminal speed under constant input. Drag must keep the per-step
    /// damping factor `1 - dt * drag` non-negative for the longest step.
    pub fn new(pos: Vec2, radius: f32, max_speed: f32, drag: f32) -> Result<Self> {
        let radius = check_radius(radius)?;
        if !pos.is_finite() {
            return Err(Error::InvalidSetting {
                key: "PLAYER_START",
                reason: format!("must be finite, got {pos}"),
            });
        }
        check_motion(max_speed, drag)?;
        Ok(Self {
            radius,
            pos,
            vel: Vec2::ZERO,
            dir: Vec2::ZERO,
            acc: max_speed * drag,
            drag,
            bounce_back: 0.5,
            anchor: circle_anchor(pos, radius),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let (x, y) = settings.player_start;
        let runner = Self::new(
            Vec2::new(x, y),
            settings.player_radius,
            settings.player_max_speed,
            settings.player_drag,
        )?;
        runner.with_bounce_back(settings.bounce_back)
    }

    /// Override the fraction of velocity kept when a move is blocked
    pub fn with_bounce_back(mut self, bounce_back: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&bounce_back) {
            return Err(Error::InvalidSetting {
                key: "BOUNCE_BACK",
                reason: format!("must be within [0, 1], got {bounce_back}"),
            });
        }
        self.bounce_back = bounce_back;
        Ok(self)
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.dir
    }

    #[inline]
    pub fn acceleration(&self) -> f32 {
        self.acc
    }

    #[inline]
    pub fn drag(&self) -> f32 {
        self.drag
    }

    /// Draw anchor (top-left of the bounding box, whole pixels)
    #[inline]
    pub fn anchor(&self) -> IVec2 {
        self.anchor
    }

    pub fn set_direction(&mut self, up: bool, down: bool, left: bool, right: bool) {
        self.dir = direction_from_keys(up, down, left, right);
    }

    /// Velocity after one step of damped acceleration
    fn integrate_velocity(&self, dt: f32) -> Vec2 {
        self.vel * (1.0 - dt * self.drag) + self.dir * (dt * self.acc)
    }

    /// Advance one time step, asking `approval` whether the move may stand
    ///
    /// On rejection the position is restored and the velocity becomes
    /// `-bounce_back` times the velocity computed for this step.
    pub fn step<A: MoveApproval + ?Sized>(&mut self, time_step: f32, approval: &A) -> MoveOutcome {
        let dt = sanitize_time_step(time_step);
        let vel = self.integrate_velocity(dt);
        let old_pos = self.pos;
        let candidate = old_pos + vel * dt;

        if !vel.is_finite() || !candidate.is_finite() {
            log::warn!("Discarding non-finite move to {candidate} at {vel} px/s");
            self.vel = Vec2::ZERO;
            self.sync_anchor();
            return MoveOutcome::Rejected;
        }

        self.vel = vel;
        self.pos = candidate;
        self.sync_anchor();

        if approval.approve_move(self) {
            return MoveOutcome::Accepted;
        }

        log::debug!("Move to {} blocked, bouncing back from {}", self.pos, old_pos);
        self.vel = vel * -self.bounce_back;
        self.pos = old_pos;
        self.sync_anchor();
        MoveOutcome::Rejected
    }

    fn sync_anchor(&mut self) {
        self.anchor = circle_anchor(self.pos, self.radius);
    }

    #[cfg(test)]
    pub(crate) fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }
}
