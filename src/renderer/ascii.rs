//! Terminal backend: rasterizes draw commands onto a character grid

use std::fmt;

use glam::{IVec2, Vec2};

use super::{DrawCommand, Renderer};
use crate::settings::{Palette, Rgb};
use crate::sim::geometry::point_in_circle;

/// Character-cell renderer for headless runs
#[derive(Debug, Clone)]
pub struct AsciiRenderer {
    cols: usize,
    rows: usize,
    /// Pixels covered by one character cell
    cell: Vec2,
    palette: Palette,
    grid: Vec<char>,
    frame: String,
}

impl AsciiRenderer {
    /// Grid covering `viewport` pixels, `cell` pixels per character
    pub fn new(viewport: (u32, u32), cell: (u32, u32), palette: Palette) -> Self {
        let cell = IVec2::new(cell.0.max(1) as i32, cell.1.max(1) as i32);
        let cols = (viewport.0 as i32 / cell.x).max(1) as usize;
        let rows = (viewport.1 as i32 / cell.y).max(1) as usize;
        Self {
            cols,
            rows,
            cell: cell.as_vec2(),
            palette,
            grid: vec![' '; cols * rows],
            frame: String::new(),
        }
    }

    /// The last presented frame
    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Character at a grid cell of the frame being drawn
    pub fn cell_at(&self, col: usize, row: usize) -> Option<char> {
        (col < self.cols && row < self.rows).then(|| self.grid[row * self.cols + col])
    }

    fn glyph(&self, color: Rgb) -> char {
        if color == self.palette.red {
            '@'
        } else if color == self.palette.green {
            '*'
        } else if color == self.palette.black {
            '#'
        } else if color == self.palette.white {
            ' '
        } else {
            '+'
        }
    }

    fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        (Vec2::new(col as f32, row as f32) + 0.5) * self.cell
    }

    /// Grid cell containing a pixel, if on screen
    fn cell_of(&self, pixel: Vec2) -> Option<(usize, usize)> {
        let c = (pixel / self.cell).floor();
        (c.x >= 0.0 && c.y >= 0.0 && (c.x as usize) < self.cols && (c.y as usize) < self.rows)
            .then(|| (c.x as usize, c.y as usize))
    }

    fn put(&mut self, col: usize, row: usize, ch: char) {
        if col < self.cols && row < self.rows {
            self.grid[row * self.cols + col] = ch;
        }
    }

    fn fill_rect(&mut self, origin: IVec2, size: IVec2, ch: char) {
        let min = origin.as_vec2();
        let max = (origin + size).as_vec2();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let p = self.cell_center(col, row);
                if p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y {
                    self.put(col, row, ch);
                }
            }
        }
    }

    fn fill_circle(&mut self, anchor: IVec2, radius: f32, ch: char) {
        let center = anchor.as_vec2() + Vec2::splat(radius);
        for row in 0..self.rows {
            for col in 0..self.cols {
                if point_in_circle(self.cell_center(col, row), center, radius) {
                    self.put(col, row, ch);
                }
            }
        }
        // Circles smaller than a cell still show up
        if let Some((col, row)) = self.cell_of(center) {
            self.put(col, row, ch);
        }
    }

    fn write_text(&mut self, pos: IVec2, text: &str) {
        if let Some((col, row)) = self.cell_of(pos.as_vec2()) {
            for (i, ch) in text.chars().enumerate() {
                self.put(col + i, row, ch);
            }
        }
    }
}

impl Renderer for AsciiRenderer {
    fn draw(&mut self, cmd: &DrawCommand) {
        match cmd {
            DrawCommand::Clear(color) => {
                let ch = self.glyph(*color);
                self.grid.fill(ch);
            }
            DrawCommand::Rect {
                origin,
                size,
                color,
            } => self.fill_rect(*origin, *size, self.glyph(*color)),
            DrawCommand::Circle {
                anchor,
                radius,
                color,
            } => self.fill_circle(*anchor, *radius, self.glyph(*color)),
            DrawCommand::Text { pos, text, .. } => self.write_text(*pos, text),
        }
    }

    fn present(&mut self) {
        self.frame = self
            .grid
            .chunks(self.cols)
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n");
    }
}

impl fmt::Display for AsciiRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.frame)
    }
}
