use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{Leaderboard, LeaderboardError, ScoreEntry};
use crate::player::Player;

/// One stored run. The file keeps every run; the board view is derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player_id: String,
    pub player_name: String,
    pub score: u32,
    pub submitted_at: DateTime<Utc>,
}

/// A leaderboard kept in a JSON file on this machine.
#[derive(Debug)]
pub struct LocalLeaderboard {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl LocalLeaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> Result<Vec<ScoreRecord>, LeaderboardError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(LeaderboardError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|source| LeaderboardError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn write_records(&self, records: &[ScoreRecord]) -> Result<(), LeaderboardError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| LeaderboardError::Io { path, source }
        };
        let json = serde_json::to_vec_pretty(records).map_err(|source| LeaderboardError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await.map_err(io_err(dir))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(io_err(&tmp))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err(&self.path))
    }
}

impl Leaderboard for LocalLeaderboard {
    async fn submit_score(&self, player: &Player, score: u32) -> Result<(), LeaderboardError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;
        records.push(ScoreRecord {
            player_id: player.id().to_string(),
            player_name: player.name().to_string(),
            score,
            submitted_at: Utc::now(),
        });
        self.write_records(&records).await?;
        info!(player = player.id(), score, "score submitted");
        Ok(())
    }

    async fn fetch_top_scores(&self, n: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let _guard = self.lock.lock().await;
        let records = self.read_records().await?;
        debug!(records = records.len(), n, "fetching top scores");
        Ok(best_per_player(&records, n))
    }
}

/// Each player's best run, highest score first. On equal scores the earlier
/// run wins, both within a player and in the ordering.
pub fn best_per_player(records: &[ScoreRecord], n: usize) -> Vec<ScoreEntry> {
    let mut best: HashMap<&str, &ScoreRecord> = HashMap::new();
    for record in records {
        best.entry(&record.player_id)
            .and_modify(|kept| {
                let better = record.score > kept.score
                    || (record.score == kept.score && record.submitted_at < kept.submitted_at);
                if better {
                    *kept = record;
                }
            })
            .or_insert(record);
    }

    let mut rows: Vec<&ScoreRecord> = best.into_values().collect();
    rows.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.submitted_at.cmp(&b.submitted_at))
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    rows.into_iter()
        .take(n)
        .map(|r| ScoreEntry {
            player_id: r.player_id.clone(),
            player_name: r.player_name.clone(),
            score: r.score,
        })
        .collect()
}
