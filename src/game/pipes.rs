use rand::Rng;
use tracing::trace;

use crate::settings::{PipeSettings, Settings};

use super::collision::{Rect, hits_pipe};

#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub x: f64,
    /// Height of the top pipe, i.e. where the opening starts.
    pub top: f64,
    /// Where the bottom pipe starts. Always `top + gap`.
    pub bottom: f64,
    pub scored: bool,
}

/// Outcome of one pipe during a stream update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeHit {
    Collided,
    Passed,
}

/// The active pipes in spawn order, which is also left-to-right order.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeStream {
    pipes: Vec<Pipe>,
    settings: PipeSettings,
    field_width: f64,
    field_height: f64,
    max_height: f64,
}

impl PipeStream {
    pub fn new(settings: &Settings) -> Self {
        Self {
            pipes: Vec::new(),
            settings: settings.pipes,
            field_width: settings.playfield.width,
            field_height: settings.playfield.height,
            max_height: settings.max_pipe_height(),
        }
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn width(&self) -> f64 {
        self.settings.width
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    /// Appends a pipe at the right edge if `frame` is a spawn frame.
    pub fn maybe_spawn<R: Rng + ?Sized>(&mut self, frame: u64, rng: &mut R) -> bool {
        if frame % self.settings.spawn_period != 0 {
            return false;
        }
        // Whole units keep `bottom - top` exactly equal to the gap.
        let low = self.settings.min_height.ceil() as i64;
        let high = self.max_height.floor() as i64;
        let top = rng.gen_range(low..=high) as f64;
        trace!(frame, top, "pipe spawned");
        self.pipes.push(Pipe {
            x: self.field_width,
            top,
            bottom: top + self.settings.gap,
            scored: false,
        });
        true
    }

    /// Scrolls every pipe and reports collisions and passes against `bird` in
    /// spawn order. `on_hit` returns false to stop looking at further pipes;
    /// the remaining pipes still scroll. Off-screen pipes are dropped once the
    /// whole pass is done, so removal never disturbs the iteration.
    pub fn advance(&mut self, bird: &Rect, mut on_hit: impl FnMut(PipeHit) -> bool) {
        let speed = self.settings.scroll_speed;
        let width = self.settings.width;
        let mut checking = true;

        for pipe in &mut self.pipes {
            pipe.x -= speed;
            if !checking {
                continue;
            }

            let column = Rect::new(pipe.x, 0.0, width, self.field_height);
            if hits_pipe(bird, &column, pipe.top, pipe.bottom) {
                checking = on_hit(PipeHit::Collided);
                if !checking {
                    continue;
                }
            }
            if !pipe.scored && pipe.x + width < bird.x {
                pipe.scored = true;
                checking = on_hit(PipeHit::Passed);
            }
        }

        self.pipes.retain(|pipe| pipe.x + width >= 0.0);
    }

    pub fn clear(&mut self) {
        self.pipes.clear();
    }
}
