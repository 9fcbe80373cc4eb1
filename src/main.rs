use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use flappy_board::app::App;
use flappy_board::leaderboard::{Leaderboard, LocalLeaderboard, ScoreReporter};
use flappy_board::logging;
use flappy_board::player::Player;
use flappy_board::score::FileHighScore;
use flappy_board::settings::{AppDirs, Settings};
use flappy_board::sound::Sound;

/// How long pending submissions get to finish after the player quits.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Parser)]
#[command(name = "flappy-board", about = "Flappy Bird in your terminal", version)]
struct Cli {
    /// Name to put on the leaderboard; without one scores stay local
    #[arg(short, long)]
    name: Option<String>,

    /// Seed for pipe heights, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Turn sound off
    #[arg(long)]
    mute: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the leaderboard and exit
    Scores {
        /// Number of rows to show [default: leaderboard.top_n]
        #[arg(short, long)]
        top: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let dirs = AppDirs::discover()?;
    dirs.ensure()?;
    logging::init(&dirs.log_file())?;

    let mut settings = Settings::load(&dirs, cli.config.as_deref())?;
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }
    if cli.mute {
        settings.sound = false;
    }
    if cli.name.is_some() {
        settings.leaderboard.player_name = cli.name;
    }

    let board = LocalLeaderboard::new(dirs.leaderboard_file());
    match cli.command {
        Some(Commands::Scores { top }) => {
            let top = rows_to_show(top, &settings);
            let player = Player::from_setting(settings.leaderboard.player_name.as_deref())?;
            print_scores(&board, top, player.as_ref()).await
        }
        None => play(settings, &dirs, board).await,
    }
}

/// `--top` wins over the configured board size.
fn rows_to_show(top: Option<usize>, settings: &Settings) -> usize {
    top.unwrap_or(settings.leaderboard.top_n)
}

async fn print_scores(board: &LocalLeaderboard, top: usize, player: Option<&Player>) -> Result<()> {
    let entries = board.fetch_top_scores(top).await?;
    if entries.is_empty() {
        println!("No scores yet.");
        return Ok(());
    }
    for (rank, entry) in entries.iter().enumerate() {
        println!("{:>3}. {:<24} {:>6}", rank + 1, entry.player_name, entry.score);
    }
    if let Some(player) = player {
        let best = board.player_best(player).await?;
        println!("\nBest for {}: {best}", player.name());
    }
    Ok(())
}

async fn play(settings: Settings, dirs: &AppDirs, board: LocalLeaderboard) -> Result<()> {
    let player = Player::from_setting(settings.leaderboard.player_name.as_deref())?;
    let (reporter, worker) = match player {
        Some(player) => {
            info!(player = player.id(), "signed in");
            let top_n = settings.leaderboard.top_n;
            let (reporter, worker) = ScoreReporter::spawn(board, player, top_n);
            (Some(reporter), Some(worker))
        }
        None => (None, None),
    };

    let store = FileHighScore::new(dirs.high_score_file());
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // The frame loop sleeps between frames, so it gets a thread of its own.
    tokio::task::spawn_blocking(move || {
        let sound = Sound::new(settings.sound);
        let mut app = App::new(&settings, store, reporter, sound, rng);
        app.run(&mut stdout())
    })
    .await
    .wrap_err("game loop panicked")??;

    if let Some(worker) = worker {
        if tokio::time::timeout(DRAIN_TIMEOUT, worker).await.is_err() {
            warn!("gave up waiting for pending score submissions");
        }
    }
    Ok(())
}
