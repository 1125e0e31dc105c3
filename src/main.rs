//! Maze Runner entry point
//!
//! Runs a headless session: the autopilot steers at a fixed frame step and the
//! final frame is printed with the terminal renderer.
//!
//! Usage: `maze-runner [settings.json] [seed]`

use std::time::{SystemTime, UNIX_EPOCH};

use maze_runner::consts::{ASCII_CELL, DEMO_TIME_LIMIT, MAX_FRAME_DT};
use maze_runner::renderer::{AsciiRenderer, Scene};
use maze_runner::sim::{RunState, Session, TickInput, tick};
use maze_runner::{Result, Settings};

fn main() {
    env_logger::init();
    log::info!("Maze Runner (headless) starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("maze-runner: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    let settings = match args.next() {
        Some(path) => Settings::load(path)?,
        None => {
            log::info!("No settings file given, using defaults");
            Settings::default()
        }
    };

    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Ignoring bad seed ({e}), using clock");
            clock_seed()
        }
        None => clock_seed(),
    };

    let mut session = Session::new(settings, seed)?;
    let dt = session.settings().frame_dt().min(MAX_FRAME_DT);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    while tick(&mut session, &input, dt) == RunState::Running {
        if session.playtime() >= DEMO_TIME_LIMIT {
            log::warn!("Objective not reached within {DEMO_TIME_LIMIT}s, stopping");
            break;
        }
    }

    log::info!(
        "Finished in state {:?} after {} ticks, run time {:.3}s",
        session.state(),
        session.ticks(),
        session.playtime()
    );

    let settings = session.settings();
    let mut renderer = AsciiRenderer::new(settings.screen_size, ASCII_CELL, settings.palette);
    Scene::capture(&session).render(&mut renderer);
    println!("{renderer}");
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
