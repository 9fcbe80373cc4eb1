use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};

use super::{Canvas, Rgb, TextSize, font};
use crate::game::Rect;
use crate::settings::Playfield;

const LETTERBOX: Rgb = Rgb(18, 18, 24);
const TEXT_SHADOW: Rgb = Rgb(30, 30, 30);

// ── Viewport ────────────────────────────────────────────────────────────────

/// Maps playfield units onto the pixel grid, keeping the aspect ratio and
/// centring the playfield.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Viewport {
    pub fn fit(pw: usize, ph: usize, field: Playfield) -> Self {
        let scale = (pw as f64 / field.width).min(ph as f64 / field.height);
        let w = (field.width * scale).round() as i32;
        let h = (field.height * scale).round() as i32;
        Self {
            scale,
            x: (pw as i32 - w) / 2,
            y: (ph as i32 - h) / 2,
            w,
            h,
        }
    }

    fn px_x(&self, x: f64) -> i32 {
        self.x + (x * self.scale).round() as i32
    }

    fn px_y(&self, y: f64) -> i32 {
        self.y + (y * self.scale).round() as i32
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.w && y < self.y + self.h
    }
}

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
    field: Playfield,
    viewport: Viewport,
}

impl PixelBuf {
    /// A buffer covering `cols` x `rows` terminal cells.
    pub fn new(cols: u16, rows: u16, field: Playfield) -> Self {
        let (w, h) = (cols as usize, rows as usize * 2);
        Self {
            w,
            h,
            px: vec![LETTERBOX; w * h],
            field,
            viewport: Viewport::fit(w, h, field),
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.w = cols as usize;
        self.h = rows as usize * 2;
        self.px.resize(self.w * self.h, LETTERBOX);
        self.viewport = Viewport::fit(self.w, self.h, self.field);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn size(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    pub fn clear(&mut self) {
        self.px.fill(LETTERBOX);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    /// Fills pixels, clipped to the playfield area.
    fn fill_px(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, c: Rgb) {
        let vp = self.viewport;
        for y in y0.max(vp.y)..y1.min(vp.y + vp.h) {
            for x in x0.max(vp.x)..x1.min(vp.x + vp.w) {
                self.set(x, y, c);
            }
        }
    }

    /// Writes the buffer to the terminal, two pixels per cell.
    pub fn present(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(term_color(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

impl Canvas for PixelBuf {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let vp = self.viewport;
        let (x0, y0) = (vp.px_x(rect.x), vp.px_y(rect.y));
        let (x1, y1) = (vp.px_x(rect.right()), vp.px_y(rect.bottom()));
        // Thin things still get one pixel.
        self.fill_px(x0, y0, x1.max(x0 + 1), y1.max(y0 + 1), color);
    }

    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, color: Rgb) {
        let vp = self.viewport;
        let (pcx, pcy) = (vp.x as f64 + cx * vp.scale, vp.y as f64 + cy * vp.scale);
        let (prx, pry) = ((rx * vp.scale).max(0.5), (ry * vp.scale).max(0.5));

        for y in (pcy - pry).floor() as i32..=(pcy + pry).ceil() as i32 {
            for x in (pcx - prx).floor() as i32..=(pcx + prx).ceil() as i32 {
                let dx = (x as f64 + 0.5 - pcx) / prx;
                let dy = (y as f64 + 0.5 - pcy) / pry;
                if dx * dx + dy * dy <= 1.0 && vp.contains(x, y) {
                    self.set(x, y, color);
                }
            }
        }
    }

    fn text(&mut self, cx: f64, y: f64, text: &str, size: TextSize, color: Rgb) {
        let vp = self.viewport;
        let world_per_dot = match size {
            TextSize::Small => 2.5,
            TextSize::Large => 5.0,
        };
        let unit = ((world_per_dot * vp.scale).round() as i32).max(1);
        let start_x = vp.px_x(cx) - font::text_width(text) * unit / 2;
        let top = vp.px_y(y);

        for (i, ch) in text.chars().enumerate() {
            let gx = start_x + i as i32 * font::ADVANCE * unit;
            for (col, row) in font::cells(ch) {
                for dy in 0..unit {
                    for dx in 0..unit {
                        let (px, py) = (gx + col * unit + dx, top + row * unit + dy);
                        // Drop shadow first, as the score digits always had.
                        if vp.contains(px + 1, py + 1) {
                            self.set(px + 1, py + 1, TEXT_SHADOW);
                        }
                        if vp.contains(px, py) {
                            self.set(px, py, color);
                        }
                    }
                }
            }
        }
    }

    fn dim(&mut self) {
        for c in &mut self.px {
            *c = c.darken();
        }
    }
}
