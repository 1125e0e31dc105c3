//! Session state machine and the per-frame tick
//!
//! The host calls [`tick`] once per frame with the held keys and the elapsed
//! time. Same seed plus same fixed-step inputs gives the same session.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::mediator::{Controls, Mediator, RunState};
use super::runner::{MoveOutcome, sanitize_time_step};
use crate::error::Result;
use crate::settings::Settings;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction keys
    pub controls: Controls,
    /// Quit or escape pressed
    pub quit: bool,
    /// Demo mode: steer toward the objective automatically
    pub autopilot: bool,
}

/// One play session from spawn to victory or quit
#[derive(Debug, Clone)]
pub struct Session {
    seed: u64,
    settings: Settings,
    mediator: Mediator,
    state: RunState,
    /// Seconds since the session started, in any state
    runtime: f32,
    /// Seconds spent running; frozen on victory or quit
    playtime: f32,
    ticks: u64,
    last_outcome: Option<MoveOutcome>,
}

impl Session {
    /// Build a session with the default maze and a seeded objective
    pub fn new(settings: Settings, seed: u64) -> Result<Self> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let mediator = Mediator::new(&settings, &mut rng)?;
        log::info!("Session started with seed {seed}");
        Ok(Self::with_mediator(settings, mediator, seed))
    }

    /// Build a session around an existing set of entities
    pub fn with_mediator(settings: Settings, mediator: Mediator, seed: u64) -> Self {
        Self {
            seed,
            settings,
            mediator,
            state: RunState::Running,
            runtime: 0.0,
            playtime: 0.0,
            ticks: 0,
            last_outcome: None,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mediator(&self) -> &Mediator {
        &self.mediator
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn runtime(&self) -> f32 {
        self.runtime
    }

    /// Time shown on the HUD clock
    pub fn playtime(&self) -> f32 {
        self.playtime
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_outcome(&self) -> Option<MoveOutcome> {
        self.last_outcome
    }
}

/// Advance the session by one frame and return its state
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) -> RunState {
    let dt = sanitize_time_step(dt);
    session.runtime += dt;
    session.ticks += 1;

    if input.quit && session.state != RunState::Done {
        log::info!("Quit after {:.2}s", session.runtime);
        session.state = RunState::Done;
    }

    if session.state != RunState::Running {
        return session.state;
    }

    let controls = if input.autopilot {
        autopilot_controls(&session.mediator, dt)
    } else {
        input.controls
    };

    session.mediator.register_inputs(controls);
    session.last_outcome = Some(session.mediator.update(dt));
    session.playtime = session.runtime;
    session.state = session.mediator.update_state();

    if session.state == RunState::Victory {
        log::info!("Victory! Run time: {:.3}s", session.playtime);
    }
    session.state
}

/// Every key combination that yields a distinct direction
const STEERING: [Controls; 9] = [
    Controls { up: false, down: false, left: false, right: false },
    Controls { up: true, down: false, left: false, right: false },
    Controls { up: false, down: true, left: false, right: false },
    Controls { up: false, down: false, left: true, right: false },
    Controls { up: false, down: false, left: false, right: true },
    Controls { up: true, down: false, left: true, right: false },
    Controls { up: true, down: false, left: false, right: true },
    Controls { up: false, down: true, left: true, right: false },
    Controls { up: false, down: true, left: false, right: true },
];

/// Greedy one-step lookahead toward the objective
///
/// Previews each steering option and keeps the one that ends closest to the
/// objective without hitting a wall.
fn autopilot_controls(mediator: &Mediator, dt: f32) -> Controls {
    let target = mediator.objective().center();
    let mut best = Controls::default();
    let mut best_dist = f32::MAX;

    for controls in STEERING {
        let (runner, outcome) = mediator.preview(controls, dt);
        if outcome == MoveOutcome::Rejected {
            continue;
        }
        // Look a few frames ahead so momentum is accounted for
        let ahead = runner.position() + runner.velocity() * dt * 4.0;
        let dist = ahead.distance_squared(target);
        if dist < best_dist {
            best_dist = dist;
            best = controls;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Objective, Wall};
    use crate::consts::MAX_FRAME_DT;
    use crate::sim::runner::Runner;
    use glam::Vec2;

    const DT: f32 = 1.0 / 30.0;

    fn open_field(objective: Vec2) -> Session {
        let settings = Settings::default();
        let runner = Runner::from_settings(&settings).unwrap();
        let objective = Objective::new(objective, settings.objective_radius).unwrap();
        let mediator = Mediator::from_parts(runner, Vec::new(), objective);
        Session::with_mediator(settings, mediator, 0)
    }

    fn hold(up: bool, down: bool, left: bool, right: bool) -> TickInput {
        TickInput {
            controls: Controls::new(up, down, left, right),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_session_is_running() {
        let session = Session::new(Settings::default(), 12345).unwrap();
        assert_eq!(session.state(), RunState::Running);
        assert_eq!(session.playtime(), 0.0);
        assert_eq!(session.seed(), 12345);
    }

    #[test]
    fn test_new_session_rejects_invalid_settings() {
        let settings = Settings {
            player_radius: -1.0,
            ..Settings::default()
        };
        assert!(Session::new(settings, 1).is_err());
    }

    #[test]
    fn test_quit_ends_session() {
        let mut session = open_field(Vec2::new(600.0, 400.0));
        tick(&mut session, &hold(false, false, false, true), DT);
        let pos = session.mediator().runner().position();

        let quit = TickInput {
            quit: true,
            ..hold(false, false, false, true)
        };
        assert_eq!(tick(&mut session, &quit, DT), RunState::Done);
        // No movement once done
        tick(&mut session, &hold(false, false, false, true), DT);
        assert_eq!(session.mediator().runner().position(), pos);
        assert_eq!(session.state(), RunState::Done);
    }

    #[test]
    fn test_reaching_objective_is_victory() {
        let mut session = open_field(Vec2::new(120.0, 100.0));
        let input = hold(false, false, false, true);
        let mut state = RunState::Running;
        for _ in 0..300 {
            state = tick(&mut session, &input, DT);
            if state != RunState::Running {
                break;
            }
        }
        assert_eq!(state, RunState::Victory);
    }

    #[test]
    fn test_playtime_freezes_after_victory() {
        let mut session = open_field(Vec2::new(45.0, 100.0));
        // Already overlapping: first tick wins
        assert_eq!(tick(&mut session, &TickInput::default(), DT), RunState::Victory);
        let frozen = session.playtime();
        tick(&mut session, &TickInput::default(), DT);
        tick(&mut session, &TickInput::default(), DT);
        assert_eq!(session.playtime(), frozen);
        assert!(session.runtime() > frozen);
        assert_eq!(session.state(), RunState::Victory);
    }

    #[test]
    fn test_invalid_dt_is_ignored() {
        let mut session = open_field(Vec2::new(600.0, 400.0));
        let start = session.mediator().runner().position();
        tick(&mut session, &hold(false, true, false, false), f32::NAN);
        tick(&mut session, &hold(false, true, false, false), -1.0);
        assert_eq!(session.mediator().runner().position(), start);
        assert_eq!(session.runtime(), 0.0);
        assert_eq!(session.ticks(), 2);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut session = open_field(Vec2::new(600.0, 400.0));
        tick(&mut session, &hold(false, true, false, false), 1e20);
        assert_eq!(session.runtime(), MAX_FRAME_DT);
        assert!(session.mediator().runner().position().is_finite());
        assert_eq!(session.state(), RunState::Running);
    }

    #[test]
    fn test_blocked_tick_reports_rejection() {
        let settings = Settings::default();
        let runner = Runner::from_settings(&settings).unwrap();
        let wall = Wall::block(Vec2::new(41.0, 90.0), 20.0).unwrap();
        let objective = Objective::new(Vec2::new(600.0, 400.0), 15.0).unwrap();
        let mediator = Mediator::from_parts(runner, vec![wall], objective);
        let mut session = Session::with_mediator(settings, mediator, 0);

        let input = hold(false, false, false, true);
        let mut rejected = false;
        for _ in 0..10 {
            tick(&mut session, &input, DT);
            rejected |= session.last_outcome() == Some(MoveOutcome::Rejected);
        }
        assert!(rejected);
        // Never interpenetrates the wall
        assert!(session.mediator().approve_move());
    }

    #[test]
    fn test_determinism() {
        let mut a = Session::new(Settings::default(), 99999).unwrap();
        let mut b = Session::new(Settings::default(), 99999).unwrap();
        assert_eq!(a.mediator().objective(), b.mediator().objective());

        let inputs = [
            hold(false, true, false, true),
            hold(false, true, false, false),
            hold(true, false, false, true),
            hold(false, false, true, false),
        ];
        for i in 0..240 {
            let input = &inputs[(i / 20) % inputs.len()];
            tick(&mut a, input, DT);
            tick(&mut b, input, DT);
        }
        assert_eq!(a.mediator().runner(), b.mediator().runner());
        assert_eq!(a.state(), b.state());
        assert_eq!(a.playtime(), b.playtime());
    }

    #[test]
    fn test_autopilot_reaches_open_objective() {
        let mut session = open_field(Vec2::new(400.0, 300.0));
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..30 * 30 {
            if tick(&mut session, &input, DT) != RunState::Running {
                break;
            }
        }
        assert_eq!(session.state(), RunState::Victory);
    }
}
