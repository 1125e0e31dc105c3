//! Per-tick orchestration of motion, wall collisions and the win check
//!
//! The mediator owns every entity in the session. Each update it steers the
//! runner from the latest inputs, lets it integrate, and vetoes any candidate
//! position that overlaps a wall.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Objective, Wall};
use super::geometry::{circle_intersects_rect, circles_overlap};
use super::maze;
use super::runner::{MoveApproval, MoveOutcome, Runner};
use crate::error::Result;
use crate::settings::Settings;

/// Shrinks the runner for wall tests so a pixel of rounding at a corner
/// does not count as a hit
pub const COLLISION_MARGIN: f32 = 1.0;

/// Pairwise collision predicate between the runner and one wall
pub type CollisionTest = fn(&Runner, &Wall) -> bool;

/// Default wall test: runner circle (minus the margin) against the wall rect
pub fn runner_hits_wall(runner: &Runner, wall: &Wall) -> bool {
    circle_intersects_rect(runner.position(), runner.radius() - COLLISION_MARGIN, &wall.rect)
}

/// True if `test` reports a collision between `a` and any of `others`
pub fn any_collision<A, B, T>(a: &A, others: &[B], test: T) -> bool
where
    T: Fn(&A, &B) -> bool,
{
    others.iter().any(|b| test(a, b))
}

/// Outcome of a session so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Running,
    /// Runner reached the objective
    Victory,
    /// Player quit
    Done,
}

/// Directional keys held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Controls {
    pub fn new(up: bool, down: bool, left: bool, right: bool) -> Self {
        Self {
            up,
            down,
            left,
            right,
        }
    }
}

/// Wall veto handed to the runner while it integrates
struct WallGuard<'a> {
    walls: &'a [Wall],
    test: CollisionTest,
}

impl MoveApproval for WallGuard<'_> {
    fn approve_move(&self, runner: &Runner) -> bool {
        !any_collision(runner, self.walls, self.test)
    }
}

fn steer(runner: &mut Runner, cmds: Controls) {
    let Controls {
        up,
        down,
        left,
        right,
    } = cmds;
    runner.set_direction(up, down, left, right);
}

/// Owns the runner, walls and objective and advances them each tick
#[derive(Debug, Clone)]
pub struct Mediator {
    runner: Runner,
    walls: Vec<Wall>,
    objective: Objective,
    controls: Controls,
    collision_test: CollisionTest,
}

impl Mediator {
    /// Build the default maze with the objective placed by `rng`
    pub fn new<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> Result<Self> {
        let runner = Runner::from_settings(settings)?;
        let objective = Objective::random(rng, settings.screen_size, settings.objective_radius)?;
        let walls = maze::default_layout(settings)?;
        log::info!(
            "Objective placed at {}, {} wall blocks",
            objective.center(),
            walls.len()
        );
        Ok(Self::from_parts(runner, walls, objective))
    }

    pub fn from_parts(runner: Runner, walls: Vec<Wall>, objective: Objective) -> Self {
        Self {
            runner,
            walls,
            objective,
            controls: Controls::default(),
            collision_test: runner_hits_wall,
        }
    }

    /// Swap the runner-vs-wall predicate
    pub fn with_collision_test(mut self, test: CollisionTest) -> Self {
        self.collision_test = test;
        self
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    /// Store the inputs used by the next `update`
    pub fn register_inputs(&mut self, cmds: Controls) {
        self.controls = cmds;
    }

    fn guard(&self) -> WallGuard<'_> {
        WallGuard {
            walls: &self.walls,
            test: self.collision_test,
        }
    }

    /// Steer and move the runner by one time step
    pub fn update(&mut self, time_step: f32) -> MoveOutcome {
        let guard = WallGuard {
            walls: &self.walls,
            test: self.collision_test,
        };
        steer(&mut self.runner, self.controls);
        self.runner.step(time_step, &guard)
    }

    /// Where the runner would end up if `update` ran with `cmds`
    ///
    /// Only the runner is copied; the walls are borrowed and the mediator is
    /// left untouched.
    pub fn preview(&self, cmds: Controls, time_step: f32) -> (Runner, MoveOutcome) {
        let mut runner = self.runner.clone();
        steer(&mut runner, cmds);
        let outcome = runner.step(time_step, &self.guard());
        (runner, outcome)
    }

    /// Whether the runner's current position is clear of every wall
    pub fn approve_move(&self) -> bool {
        self.guard().approve_move(&self.runner)
    }

    /// Victory once the runner overlaps the objective
    pub fn update_state(&self) -> RunState {
        let hit = circles_overlap(
            self.runner.position(),
            self.runner.radius(),
            self.objective.center(),
            self.objective.radius(),
        );
        if hit { RunState::Victory } else { RunState::Running }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Rect;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn runner_at(x: f32, y: f32) -> Runner {
        Runner::new(Vec2::new(x, y), 10.0, 200.0, 0.1).unwrap()
    }

    fn far_objective() -> Objective {
        Objective::new(Vec2::new(600.0, 400.0), 15.0).unwrap()
    }

    fn wall(x: f32, y: f32, w: f32, h: f32) -> Wall {
        Wall::new(Rect::new(x, y, w, h).unwrap())
    }

    fn never_collides(_: &Runner, _: &Wall) -> bool {
        false
    }

    #[test]
    fn test_new_builds_all_entities() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let m = Mediator::new(&settings, &mut rng).unwrap();
        assert_eq!(m.runner().position(), Vec2::new(30.0, 100.0));
        assert_eq!(m.walls().len(), maze::default_layout(&settings).unwrap().len());
        assert_eq!(m.objective().radius(), settings.objective_radius);
        // The start position is clear of the default maze
        assert!(m.approve_move());
    }

    #[test]
    fn test_register_inputs_saves_cmds() {
        let mut m = Mediator::from_parts(runner_at(30.0, 100.0), vec![], far_objective());
        let cmds = Controls::new(true, false, false, true);
        m.register_inputs(cmds);
        assert_eq!(m.controls(), cmds);
    }

    #[test]
    fn test_update_moves_runner() {
        let mut m = Mediator::from_parts(runner_at(30.0, 100.0), vec![], far_objective());
        m.register_inputs(Controls::new(false, true, false, false));
        assert_eq!(m.update(0.1), MoveOutcome::Accepted);
        assert_eq!(m.runner().direction(), Vec2::new(0.0, 1.0));
        assert!(m.runner().position().y > 100.0);
        assert_eq!(m.runner().position().x, 30.0);
    }

    #[test]
    fn test_approve_move_uses_margin() {
        // Runner edge at x = 40; wall face at 39.5 overlaps by half a pixel
        let m = Mediator::from_parts(
            runner_at(30.0, 100.0),
            vec![wall(39.5, 90.0, 20.0, 20.0)],
            far_objective(),
        );
        assert!(m.approve_move());

        let m = Mediator::from_parts(
            runner_at(30.0, 100.0),
            vec![wall(37.0, 90.0, 20.0, 20.0)],
            far_objective(),
        );
        assert!(!m.approve_move());
    }

    #[test]
    fn test_approve_move_checks_every_wall() {
        let walls = vec![
            wall(200.0, 200.0, 10.0, 10.0),
            wall(300.0, 300.0, 10.0, 10.0),
            wall(25.0, 95.0, 10.0, 10.0),
        ];
        let m = Mediator::from_parts(runner_at(30.0, 100.0), walls, far_objective());
        assert!(!m.approve_move());
    }

    #[test]
    fn test_blocked_move_bounces_back() {
        // Wall face 5px beyond the runner's edge, directly in its path
        let walls = vec![wall(45.0, 80.0, 20.0, 40.0)];
        let mut runner = runner_at(30.0, 100.0);
        runner.set_velocity(Vec2::new(100.0, 0.0));
        let mut m = Mediator::from_parts(runner, walls, far_objective());
        m.register_inputs(Controls::new(false, false, false, true));

        let dt = 0.1;
        let r = m.runner().clone();
        let tentative =
            r.velocity() * (1.0 - dt * r.drag()) + Vec2::X * (dt * r.acceleration());

        assert_eq!(m.update(dt), MoveOutcome::Rejected);
        assert_eq!(m.runner().position(), Vec2::new(30.0, 100.0));
        assert_eq!(m.runner().velocity(), tentative * -0.5);
        assert!(m.runner().velocity().x < 0.0);
    }

    #[test]
    fn test_large_step_tunnels_through_thin_wall() {
        // Discrete collision only: a step that lands fully past the wall is accepted
        let walls = vec![wall(60.0, 80.0, 2.0, 40.0)];
        let mut runner = runner_at(30.0, 100.0);
        runner.set_velocity(Vec2::new(1000.0, 0.0));
        let mut m = Mediator::from_parts(runner, walls, far_objective());

        assert_eq!(m.update(0.1), MoveOutcome::Accepted);
        assert!(m.runner().position().x > 62.0 + 10.0);
    }

    #[test]
    fn test_huge_time_step_stays_inside_box() {
        // Runner boxed in by four walls with a 10px gap on each side
        let walls = vec![
            wall(0.0, 70.0, 10.0, 60.0),
            wall(50.0, 70.0, 10.0, 60.0),
            wall(0.0, 70.0, 60.0, 10.0),
            wall(0.0, 120.0, 60.0, 10.0),
        ];
        let mut m = Mediator::from_parts(runner_at(30.0, 100.0), walls, far_objective());
        m.register_inputs(Controls::new(false, false, false, true));
        for _ in 0..20 {
            m.update(1e20);
            let pos = m.runner().position();
            assert!(pos.is_finite());
            assert!(pos.x > 10.0 && pos.x < 50.0, "escaped to {pos}");
            assert!(m.approve_move());
        }
    }

    #[test]
    fn test_preview_matches_update_without_mutating() {
        // 30 px/s stays clear of the wall, 100 px/s runs into it
        for (speed, expected) in [(30.0, MoveOutcome::Accepted), (100.0, MoveOutcome::Rejected)] {
            let mut runner = runner_at(30.0, 100.0);
            runner.set_velocity(Vec2::new(speed, 0.0));
            let m = Mediator::from_parts(runner, vec![wall(45.0, 80.0, 20.0, 40.0)], far_objective());
            let before = m.runner().clone();
            let cmds = Controls::new(false, false, false, true);

            let (previewed, outcome) = m.preview(cmds, 0.1);
            assert_eq!(outcome, expected);
            assert_eq!(m.runner(), &before);
            assert_eq!(m.controls(), Controls::default());

            let mut applied = m.clone();
            applied.register_inputs(cmds);
            assert_eq!(applied.update(0.1), outcome);
            assert_eq!(applied.runner(), &previewed);
        }
    }

    #[test]
    fn test_custom_collision_test_is_used() {
        let walls = vec![wall(45.0, 80.0, 20.0, 40.0)];
        let mut runner = runner_at(30.0, 100.0);
        runner.set_velocity(Vec2::new(100.0, 0.0));
        let mut m =
            Mediator::from_parts(runner, walls, far_objective()).with_collision_test(never_collides);
        assert_eq!(m.update(0.1), MoveOutcome::Accepted);
    }

    #[test]
    fn test_update_state_victory_is_strict() {
        // Radii 10 + 15 = 25
        let touching = Objective::new(Vec2::new(55.0, 100.0), 15.0).unwrap();
        let m = Mediator::from_parts(runner_at(30.0, 100.0), vec![], touching);
        assert_eq!(m.update_state(), RunState::Running);

        let overlapping = Objective::new(Vec2::new(54.5, 100.0), 15.0).unwrap();
        let m = Mediator::from_parts(runner_at(30.0, 100.0), vec![], overlapping);
        assert_eq!(m.update_state(), RunState::Victory);

        let m = Mediator::from_parts(runner_at(30.0, 100.0), vec![], far_objective());
        assert_eq!(m.update_state(), RunState::Running);
    }

    #[test]
    fn test_any_collision_generic() {
        let points = [1, 5, 9];
        assert!(any_collision(&5, &points, |a, b| a == b));
        assert!(!any_collision(&4, &points, |a, b| a == b));
        assert!(!any_collision(&4, &[] as &[i32], |a, b| a == b));
    }
}
