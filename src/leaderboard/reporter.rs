use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{Leaderboard, ScoreEntry};
use crate::player::Player;

/// What the worker last read from the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standings {
    pub top: Vec<ScoreEntry>,
    pub global_best: u32,
}

/// Hands finished runs to a background task that owns the leaderboard.
/// Reporting never blocks and never fails from the caller's point of view;
/// the worker logs failures and moves on without retrying.
#[derive(Debug)]
pub struct ScoreReporter {
    player: Player,
    runs: mpsc::UnboundedSender<u32>,
    standings: watch::Receiver<Standings>,
}

impl ScoreReporter {
    /// Starts the worker on the current tokio runtime. It refreshes the board
    /// once up front and after every submission, and exits once the reporter
    /// is dropped and the queue is drained.
    pub fn spawn<L: Leaderboard>(board: L, player: Player, top_n: usize) -> (Self, JoinHandle<()>) {
        let (runs, rx) = mpsc::unbounded_channel();
        let (standings_tx, standings) = watch::channel(Standings::default());
        let worker = tokio::spawn(run_worker(board, player.clone(), top_n, rx, standings_tx));
        let reporter = Self {
            player,
            runs,
            standings,
        };
        (reporter, worker)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Queues a finished run. Zero scores are not worth a row.
    pub fn report(&self, score: u32) {
        if score == 0 {
            debug!("not submitting a zero score");
            return;
        }
        if self.runs.send(score).is_err() {
            warn!(score, "leaderboard worker is gone, score dropped");
        }
    }

    /// Latest board the worker has fetched.
    pub fn top_scores(&self) -> Vec<ScoreEntry> {
        self.standings.borrow().top.clone()
    }

    /// Best score anyone has submitted, as of the last refresh.
    pub fn global_best(&self) -> u32 {
        self.standings.borrow().global_best
    }

    pub fn subscribe(&self) -> watch::Receiver<Standings> {
        self.standings.clone()
    }
}

async fn run_worker<L: Leaderboard>(
    board: L,
    player: Player,
    top_n: usize,
    mut runs: mpsc::UnboundedReceiver<u32>,
    standings: watch::Sender<Standings>,
) {
    refresh(&board, top_n, &standings).await;
    while let Some(score) = runs.recv().await {
        match board.submit_score(&player, score).await {
            Ok(()) => info!(player = player.id(), score, "run reported"),
            Err(e) => warn!(error = %e, score, "could not submit score"),
        }
        refresh(&board, top_n, &standings).await;
    }
    debug!("score reporter stopped");
}

/// Re-reads the board. A failed read keeps whatever was published before.
async fn refresh<L: Leaderboard>(board: &L, top_n: usize, standings: &watch::Sender<Standings>) {
    match board.fetch_top_scores(top_n).await {
        Ok(top) => standings.send_modify(|s| s.top = top),
        Err(e) => warn!(error = %e, "could not fetch top scores"),
    }
    match board.global_high_score().await {
        Ok(best) => standings.send_modify(|s| s.global_best = best),
        Err(e) => warn!(error = %e, "could not fetch the global high score"),
    }
}
