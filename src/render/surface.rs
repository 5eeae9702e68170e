//! Drawing contract between the game engine and whatever paints pixels
//!
//! Coordinates are surface pixels with the origin in the top-left corner.
//! Nothing drawn here feeds back into game state.

/// RGBA colour, alpha in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Composite self over an opaque background
    pub fn over(&self, background: Color) -> Color {
        let a = self.a.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f32 * a + bg as f32 * (1.0 - a)).round() as u8;
        Color::rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}

/// Shadow-style halo around subsequent shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Color,
    pub blur: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f64,
    pub bold: bool,
    pub align: TextAlign,
}

impl TextStyle {
    pub fn new(color: Color, size: f64) -> Self {
        Self {
            color,
            size,
            bold: false,
            align: TextAlign::Center,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> (f64, f64);

    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);

    fn draw_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color);

    /// Text anchored at (x, y); vertically centred on y
    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle);

    /// Surfaces without shadow support ignore glow
    fn set_glow(&mut self, _glow: Option<Glow>) {}
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCommand {
        Clear(Color),
        FillRect {
            x: f64,
            y: f64,
            width: f64,
            height: f64,
            color: Color,
        },
        Circle {
            cx: f64,
            cy: f64,
            radius: f64,
            color: Color,
        },
        Text {
            text: String,
            x: f64,
            y: f64,
            style: TextStyle,
        },
        Glow(Option<Glow>),
    }

    /// Surface that remembers every call, for assertions
    pub struct RecordingSurface {
        pub width: f64,
        pub height: f64,
        pub commands: Vec<DrawCommand>,
    }

    impl RecordingSurface {
        pub fn new(width: f64, height: f64) -> Self {
            Self {
                width,
                height,
                commands: Vec::new(),
            }
        }

        pub fn texts(&self) -> Vec<&str> {
            self.commands
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> (f64, f64) {
            (self.width, self.height)
        }

        fn clear(&mut self, color: Color) {
            self.commands.push(DrawCommand::Clear(color));
        }

        fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
            self.commands.push(DrawCommand::FillRect {
                x,
                y,
                width,
                height,
                color,
            });
        }

        fn draw_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
            self.commands.push(DrawCommand::Circle {
                cx,
                cy,
                radius,
                color,
            });
        }

        fn draw_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) {
            self.commands.push(DrawCommand::Text {
                text: text.to_string(),
                x,
                y,
                style,
            });
        }

        fn set_glow(&mut self, glow: Option<Glow>) {
            self.commands.push(DrawCommand::Glow(glow));
        }
    }
}
