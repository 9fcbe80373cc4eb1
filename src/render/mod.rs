//! Drawing. The scene is described against the [`Canvas`] trait in playfield
//! units; [`PixelBuf`] is the terminal implementation.

pub mod font;
mod pixel;
mod scene;

pub use self::pixel::{PixelBuf, Viewport};
pub use self::scene::{Hud, draw_scene};
use crate::game::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    pub const fn darken(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Small,
    Large,
}

/// A drawing surface. Coordinates are playfield units with `y` growing down.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, color: Rgb);

    /// One line of text horizontally centred on `cx`, top edge at `y`.
    fn text(&mut self, cx: f64, y: f64, text: &str, size: TextSize, color: Rgb);

    /// Dims everything drawn so far. Used behind overlays.
    fn dim(&mut self) {}
}
