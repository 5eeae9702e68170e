pub mod renderer;
pub mod surface;
pub mod terminal;

pub use renderer::{PanelView, Renderer};
pub use surface::{Color, Glow, Surface, TextAlign, TextStyle};
pub use terminal::{GameCanvas, TerminalSurface};
