//! Flappy Bird in the terminal, with a best score kept on disk and a
//! leaderboard of finished runs.
//!
//! [`game`] is the deterministic simulation. Everything else hosts it: input
//! translation, half-block rendering, persistence and score reporting.

pub mod app;
pub mod error;
pub mod game;
pub mod input;
pub mod leaderboard;
pub mod logging;
pub mod player;
pub mod render;
pub mod score;
pub mod settings;
pub mod sound;
pub mod term;

pub use error::{Error, Result};
