use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TermColor, Modifier, Style},
    widgets::Widget,
};

use super::surface::{Color, Surface, TextAlign, TextStyle};
use crate::game::GameEngine;

/// Rasterizes the pixel surface onto terminal cells
///
/// A cell is painted when its centre falls inside a shape. Translucent fills
/// are blended with the background already in the cell.
pub struct TerminalSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    width: f64,
    height: f64,
}

impl<'a> TerminalSurface<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect, width: f64, height: f64) -> Self {
        Self {
            buf,
            area,
            width,
            height,
        }
    }

    fn pixels_per_col(&self) -> f64 {
        self.width / self.area.width.max(1) as f64
    }

    fn pixels_per_row(&self) -> f64 {
        self.height / self.area.height.max(1) as f64
    }

    /// Paint every cell whose centre satisfies hit
    fn paint(&mut self, color: Color, hit: impl Fn(f64, f64) -> bool) {
        let (px_col, px_row) = (self.pixels_per_col(), self.pixels_per_row());
        for row in 0..self.area.height {
            for col in 0..self.area.width {
                let cx = (col as f64 + 0.5) * px_col;
                let cy = (row as f64 + 0.5) * px_row;
                if !hit(cx, cy) {
                    continue;
                }
                let cell = &mut self.buf[(self.area.x + col, self.area.y + row)];
                let blended = color.over(from_term(cell.bg));
                cell.set_bg(to_term(blended));
            }
        }
    }
}

impl Surface for TerminalSurface<'_> {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        let bg = to_term(color.over(Color::BLACK));
        for row in 0..self.area.height {
            for col in 0..self.area.width {
                let cell = &mut self.buf[(self.area.x + col, self.area.y + row)];
                cell.set_symbol(" ");
                cell.set_bg(bg);
            }
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.paint(color, |cx, cy| {
            cx >= x && cx < x + width && cy >= y && cy < y + height
        });
    }

    fn draw_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        self.paint(color, |px, py| {
            let (dx, dy) = (px - cx, py - cy);
            dx * dx + dy * dy <= radius * radius
        });
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) {
        if self.area.width == 0 || self.area.height == 0 {
            return;
        }
        let len = text.chars().count() as i64;
        let anchor = (x / self.pixels_per_col()).floor() as i64;
        let start = match style.align {
            TextAlign::Left => anchor,
            TextAlign::Center => anchor - len / 2,
            TextAlign::Right => anchor - len,
        };
        let row = ((y / self.pixels_per_row()).floor() as i64)
            .clamp(0, self.area.height as i64 - 1);
        let start = start.clamp(0, self.area.width as i64);
        let available = (self.area.width as i64 - start).max(0) as usize;

        let mut term_style = Style::default().fg(to_term(style.color.over(Color::BLACK)));
        if style.bold {
            term_style = term_style.add_modifier(Modifier::BOLD);
        }
        self.buf.set_stringn(
            self.area.x + start as u16,
            self.area.y + row as u16,
            text,
            available,
            term_style,
        );
    }
}

/// Widget that draws the engine's board into its area
pub struct GameCanvas<'a> {
    engine: &'a GameEngine,
}

impl<'a> GameCanvas<'a> {
    pub fn new(engine: &'a GameEngine) -> Self {
        Self { engine }
    }
}

impl Widget for GameCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (width, height) = self.engine.config().canvas_size();
        let mut surface = TerminalSurface::new(buf, area, width, height);
        self.engine.render(&mut surface);
    }
}

fn to_term(color: Color) -> TermColor {
    TermColor::Rgb(color.r, color.g, color.b)
}

fn from_term(color: TermColor) -> Color {
    match color {
        TermColor::Rgb(r, g, b) => Color::rgb(r, g, b),
        TermColor::White => Color::WHITE,
        _ => Color::BLACK,
    }
}
