//! The simulation: one bird, a stream of pipes, a score and a three-phase
//! state machine. Nothing in here touches the terminal, the clock or the disk;
//! the host drives it with [`Game::tick`] and drains [`GameEvent`]s.

mod bird;
mod collision;
mod pipes;

use rand::Rng;
use tracing::{debug, info};

pub use self::bird::{Bird, Contact};
pub use self::collision::{Rect, hits_pipe};
pub use self::pipes::{Pipe, PipeHit, PipeStream};
use crate::settings::{Playfield, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for the first flap.
    Start,
    Playing,
    /// Frozen until restarted.
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Floor,
    Pipe,
}

/// Things the host may want to react to. Emitted in the order they happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Flapped,
    Scored { score: u32 },
    NewHighScore { score: u32 },
    /// Emitted exactly once per run, on the Playing -> GameOver edge.
    RunEnded { score: u32, cause: DeathCause },
    Restarted,
}

/// Player intent, applied at the start of the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Flap,
    Restart,
}

#[derive(Debug, Default, Clone, Copy)]
struct Pending {
    flap: bool,
    restart: bool,
}

pub struct Game<R> {
    playfield: Playfield,
    phase: Phase,
    frame: u64,
    score: u32,
    high_score: u32,
    bird: Bird,
    pipes: PipeStream,
    rng: R,
    pending: Pending,
    events: Vec<GameEvent>,
}

impl<R: Rng> Game<R> {
    /// `high_score` is the best score known from earlier sessions.
    pub fn new(settings: &Settings, high_score: u32, rng: R) -> Self {
        Self {
            playfield: settings.playfield,
            phase: Phase::Start,
            frame: 0,
            score: 0,
            high_score,
            bird: Bird::new(&settings.bird),
            pipes: PipeStream::new(settings),
            rng,
            pending: Pending::default(),
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn pipes(&self) -> &PipeStream {
        &self.pipes
    }

    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    /// Records an intent without touching the simulation.
    pub fn queue(&mut self, command: Command) {
        match command {
            Command::Flap => self.pending.flap = true,
            Command::Restart => self.pending.restart = true,
        }
    }

    /// Drains everything emitted since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Applies the upward impulse. The first flap also starts the run.
    pub fn flap(&mut self) {
        match self.phase {
            Phase::Start => {
                info!("run started");
                self.phase = Phase::Playing;
                self.events.push(GameEvent::Started);
            }
            Phase::Playing => {}
            Phase::GameOver => return,
        }
        self.bird.flap();
        self.events.push(GameEvent::Flapped);
    }

    /// Back to `Start` with a fresh bird, no pipes, zero score and frame.
    /// Only legal from `GameOver`.
    pub fn restart(&mut self) {
        if self.phase != Phase::GameOver {
            return;
        }
        debug!(score = self.score, "restarting");
        self.phase = Phase::Start;
        self.frame = 0;
        self.score = 0;
        self.bird.reset();
        self.pipes.clear();
        self.events.push(GameEvent::Restarted);
    }

    /// One simulation step: queued input, pipes, then the bird.
    pub fn tick(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if pending.restart {
            self.restart();
        }
        if pending.flap {
            self.flap();
        }

        self.frame += 1;
        if self.phase != Phase::Playing {
            return;
        }

        self.update_pipes();
        self.update_bird();
    }

    fn update_pipes(&mut self) {
        let body = self.bird.bounds();
        let mut passed = 0;
        let mut collided = false;
        self.pipes.advance(&body, |hit| match hit {
            PipeHit::Passed => {
                passed += 1;
                true
            }
            PipeHit::Collided => {
                collided = true;
                false
            }
        });

        for _ in 0..passed {
            self.add_point();
        }
        if collided {
            self.end_run(DeathCause::Pipe);
            return;
        }
        self.pipes.maybe_spawn(self.frame, &mut self.rng);
    }

    fn update_bird(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        if self.bird.advance(self.playfield.height) == Contact::Floor {
            self.end_run(DeathCause::Floor);
        }
    }

    fn add_point(&mut self) {
        self.score += 1;
        self.events.push(GameEvent::Scored { score: self.score });
        if self.score > self.high_score {
            self.high_score = self.score;
            self.events.push(GameEvent::NewHighScore { score: self.score });
        }
    }

    fn end_run(&mut self, cause: DeathCause) {
        if self.phase == Phase::GameOver {
            return;
        }
        info!(score = self.score, ?cause, "run ended");
        self.phase = Phase::GameOver;
        self.events.push(GameEvent::RunEnded {
            score: self.score,
            cause,
        });
    }
}
