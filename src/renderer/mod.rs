//! Rendering adapter
//!
//! The simulation never draws itself. A [`Scene`] is captured from read-only
//! session queries and replayed into any [`Renderer`] backend.

pub mod ascii;

pub use ascii::AsciiRenderer;

use glam::IVec2;

use crate::settings::Rgb;
use crate::sim::{RunState, Session};

/// HUD clock position in pixels
pub const HUD_POS: IVec2 = IVec2::new(50, 50);

/// A single backend-independent draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole viewport
    Clear(Rgb),
    Rect {
        origin: IVec2,
        size: IVec2,
        color: Rgb,
    },
    /// Filled circle given by its bounding-box anchor
    Circle {
        anchor: IVec2,
        radius: f32,
        color: Rgb,
    },
    Text {
        pos: IVec2,
        text: String,
        color: Rgb,
    },
}

/// Drawing backend
pub trait Renderer {
    fn draw(&mut self, cmd: &DrawCommand);

    /// Called once after every command of a frame has been drawn
    fn present(&mut self) {}
}

/// Everything needed to draw one frame, back to front
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    /// Snapshot a session: background, walls, objective, runner, HUD
    pub fn capture(session: &Session) -> Self {
        let palette = session.settings().palette;
        let mediator = session.mediator();
        let mut commands = Vec::with_capacity(mediator.walls().len() + 5);

        commands.push(DrawCommand::Clear(palette.white));

        commands.extend(mediator.walls().iter().map(|wall| DrawCommand::Rect {
            origin: wall.rect.origin.floor().as_ivec2(),
            size: wall.rect.size.ceil().as_ivec2(),
            color: palette.black,
        }));

        let objective = mediator.objective();
        commands.push(DrawCommand::Circle {
            anchor: objective.anchor(),
            radius: objective.radius(),
            color: palette.green,
        });

        let runner = mediator.runner();
        commands.push(DrawCommand::Circle {
            anchor: runner.anchor(),
            radius: runner.radius(),
            color: palette.red,
        });

        commands.push(DrawCommand::Text {
            pos: HUD_POS,
            text: format!("Run time: {:.3}", session.playtime()),
            color: palette.black,
        });

        if session.state() == RunState::Victory {
            commands.push(DrawCommand::Text {
                pos: HUD_POS + IVec2::new(0, 20),
                text: "Victory!".to_string(),
                color: palette.black,
            });
        }

        Self { commands }
    }

    /// Replay the scene into a backend and present it
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        for cmd in &self.commands {
            renderer.draw(cmd);
        }
        renderer.present();
    }
}
