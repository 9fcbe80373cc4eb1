//! The host loop: terminal input in, ticks, side effects out, pixels drawn.

use std::io::Write;
use std::time::{Duration, Instant};

use crossterm::{event, terminal};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::game::{Game, GameEvent};
use crate::input::{self, Input};
use crate::leaderboard::ScoreReporter;
use crate::render::{Hud, PixelBuf, draw_scene};
use crate::score::HighScoreStore;
use crate::settings::Settings;
use crate::sound::{Cue, Sound};
use crate::term::TerminalGuard;

pub struct App<S, R> {
    game: Game<R>,
    store: S,
    reporter: Option<ScoreReporter>,
    sound: Sound,
    frame_period: Duration,
    should_quit: bool,
}

impl<S: HighScoreStore, R: Rng> App<S, R> {
    pub fn new(
        settings: &Settings,
        store: S,
        reporter: Option<ScoreReporter>,
        sound: Sound,
        rng: R,
    ) -> Self {
        let high_score = store.load();
        info!(high_score, signed_in = reporter.is_some(), "starting");
        Self {
            game: Game::new(settings, high_score, rng),
            store,
            reporter,
            sound,
            frame_period: Duration::from_millis(settings.frame_millis),
            should_quit: false,
        }
    }

    pub fn game(&self) -> &Game<R> {
        &self.game
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Runs until the player quits. Owns the terminal for the duration.
    pub fn run(&mut self, out: &mut impl Write) -> Result<()> {
        let _guard = TerminalGuard::enter(out)?;
        let (cols, rows) = terminal::size()?;
        let mut buf = PixelBuf::new(cols, rows, self.game.playfield());

        while !self.should_quit {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                if let Some(input) = input::translate(&event::read()?) {
                    self.handle_input(input, &mut buf);
                }
            }

            self.step();
            self.draw(&mut buf);
            buf.present(out)?;

            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_period {
                std::thread::sleep(self.frame_period - elapsed);
            }
        }
        info!(high_score = self.game.high_score(), "quitting");
        Ok(())
    }

    pub fn handle_input(&mut self, input: Input, buf: &mut PixelBuf) {
        match input {
            Input::Game(command) => self.game.queue(command),
            Input::Resize(cols, rows) => {
                debug!(cols, rows, "terminal resized");
                buf.resize(cols, rows);
            }
            Input::Quit => self.should_quit = true,
        }
    }

    /// Advances the simulation one tick and reacts to what happened.
    pub fn step(&mut self) {
        self.game.tick();
        for event in self.game.take_events() {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::Flapped => self.sound.play(Cue::Flap),
            GameEvent::NewHighScore { score } => {
                if let Err(e) = self.store.store(score) {
                    warn!(error = %e, score, "could not save high score");
                }
            }
            GameEvent::RunEnded { score, cause } => {
                debug!(score, ?cause, "dispatching end of run");
                self.sound.play(Cue::Death);
                match &self.reporter {
                    Some(reporter) => reporter.report(score),
                    None => debug!(score, "not signed in, score stays local"),
                }
            }
            GameEvent::Started | GameEvent::Scored { .. } | GameEvent::Restarted => {}
        }
    }

    pub fn draw(&self, buf: &mut PixelBuf) {
        let reporter = self.reporter.as_ref();
        let leaderboard = reporter.map(ScoreReporter::top_scores).unwrap_or_default();
        let hud = Hud {
            player: reporter.map(ScoreReporter::player),
            leaderboard: &leaderboard,
            global_best: reporter.map(ScoreReporter::global_best),
        };
        buf.clear();
        draw_scene(&self.game, &hud, buf);
    }
}
