//! Axis-aligned boxes in playfield units. `y` grows downwards.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Strict overlap of the horizontal spans; touching edges do not count.
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.right() > other.x && self.x < other.right()
    }
}

/// True when `body` is inside the pipe's column but not fully inside the
/// opening `gap_top..gap_bottom`.
pub fn hits_pipe(body: &Rect, column: &Rect, gap_top: f64, gap_bottom: f64) -> bool {
    body.overlaps_x(column) && (body.y < gap_top || body.bottom() > gap_bottom)
}
