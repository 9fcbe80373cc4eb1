//! Best scores across players. The game only ever talks to a [`Leaderboard`]
//! through the [`ScoreReporter`], which keeps the frame loop from waiting on it.

mod local;
mod reporter;

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

pub use self::local::{LocalLeaderboard, ScoreRecord, best_per_player};
pub use self::reporter::{ScoreReporter, Standings};
use crate::player::Player;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard storage at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt leaderboard at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One row of the board: a player's best score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub player_id: String,
    pub player_name: String,
    pub score: u32,
}

pub trait Leaderboard: Send + Sync + 'static {
    /// Records one finished run.
    fn submit_score(
        &self,
        player: &Player,
        score: u32,
    ) -> impl Future<Output = Result<(), LeaderboardError>> + Send;

    /// Best score per player, highest first, at most `n` rows.
    fn fetch_top_scores(
        &self,
        n: usize,
    ) -> impl Future<Output = Result<Vec<ScoreEntry>, LeaderboardError>> + Send;

    /// The player's personal best, 0 when they have no runs.
    fn player_best(
        &self,
        player: &Player,
    ) -> impl Future<Output = Result<u32, LeaderboardError>> + Send {
        async move {
            let all = self.fetch_top_scores(usize::MAX).await?;
            Ok(all
                .iter()
                .find(|e| e.player_id == player.id())
                .map_or(0, |e| e.score))
        }
    }

    /// The best score anyone has submitted, 0 on an empty board.
    fn global_high_score(&self) -> impl Future<Output = Result<u32, LeaderboardError>> + Send {
        async move { Ok(self.fetch_top_scores(1).await?.first().map_or(0, |e| e.score)) }
    }
}
