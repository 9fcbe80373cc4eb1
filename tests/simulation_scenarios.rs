use flappy_board::game::{Command, DeathCause, Game, GameEvent, Phase, Pipe};
use flappy_board::settings::Settings;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn game_with(settings: &Settings, seed: u64) -> Game<ChaCha8Rng> {
    Game::new(settings, 0, ChaCha8Rng::seed_from_u64(seed))
}

/// A bird that neither falls nor rises.
fn hovering() -> Settings {
    let mut s = Settings::default();
    s.bird.gravity = 0.0;
    s.bird.flap_velocity = 0.0;
    s
}

/// Hovering bird and pipes whose opening always contains it.
fn wide_open() -> Settings {
    let mut s = hovering();
    s.pipes.bottom_margin = 550.0;
    s.pipes.gap = 500.0;
    s
}

fn ticks(game: &mut Game<ChaCha8Rng>, n: usize) {
    for _ in 0..n {
        game.tick();
    }
}

fn xs(game: &Game<ChaCha8Rng>) -> Vec<f64> {
    game.pipes().pipes().iter().map(|p| p.x).collect()
}

#[test]
fn never_flapping_falls_to_the_floor_and_freezes() {
    let mut game = game_with(&Settings::default(), 1);
    game.queue(Command::Flap);
    ticks(&mut game, 1);

    let mut n = 0;
    while game.phase() == Phase::Playing {
        game.tick();
        n += 1;
        assert!(n < 1_000, "bird never landed");
    }
    let bird = game.bird().clone();
    assert_eq!(bird.y + bird.height, game.playfield().height);

    let pipes: Vec<Pipe> = game.pipes().pipes().to_vec();
    ticks(&mut game, 300);
    assert_eq!(game.phase(), Phase::GameOver);
    assert_eq!(game.bird(), &bird);
    assert_eq!(game.pipes().pipes(), pipes.as_slice());
}

#[test]
fn pipes_spawn_on_schedule() {
    let mut game = game_with(&hovering(), 2);
    game.flap();

    ticks(&mut game, 89);
    assert!(game.pipes().is_empty());

    ticks(&mut game, 1);
    assert_eq!(game.frame(), 90);
    assert_eq!(xs(&game), vec![400.0]);

    ticks(&mut game, 90);
    assert_eq!(game.frame(), 180);
    assert_eq!(xs(&game), vec![400.0 - 90.0 * 2.0, 400.0]);
}

#[test]
fn restart_resets_the_run() {
    let mut game = game_with(&wide_open(), 3);
    game.flap();
    ticks(&mut game, 400);
    assert!(game.score() > 0);
    assert!(!game.pipes().is_empty());

    // Drop the hovering bird onto the floor.
    let mut settings = wide_open();
    settings.bird.gravity = 0.5;
    let mut game = game_with(&settings, 3);
    game.flap();
    while game.phase() != Phase::GameOver {
        game.tick();
    }
    game.queue(Command::Restart);
    game.tick();
    assert_eq!(game.phase(), Phase::Start);
    assert_eq!(game.score(), 0);
    assert!(game.pipes().is_empty());
    assert_eq!(game.bird().y, settings.bird.start_y);
    assert_eq!(game.bird().velocity, 0.0);
}

#[test]
fn passing_pipes_scores_one_each() {
    let mut game = game_with(&wide_open(), 4);
    game.flap();
    game.take_events();

    // First pipe spawns at tick 90 and clears the bird 191 ticks later.
    ticks(&mut game, 280);
    assert_eq!(game.score(), 0);
    ticks(&mut game, 1);
    assert_eq!(game.score(), 1);
    ticks(&mut game, 90);
    assert_eq!(game.score(), 2);

    let scored: Vec<u32> = game
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::Scored { score } => Some(score),
            _ => None,
        })
        .collect();
    assert_eq!(scored, vec![1, 2]);
}

#[test]
fn hitting_a_pipe_ends_the_run_once() {
    let mut settings = hovering();
    settings.bird.start_y = 0.0;
    let mut game = game_with(&settings, 5);
    game.flap();

    ticks(&mut game, 233);
    assert_eq!(game.phase(), Phase::Playing);
    ticks(&mut game, 1);
    assert_eq!(game.phase(), Phase::GameOver);

    let frozen = xs(&game);
    for _ in 0..100 {
        game.queue(Command::Flap);
        game.tick();
    }
    assert_eq!(xs(&game), frozen);

    let ended: Vec<GameEvent> = game
        .take_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::RunEnded { .. }))
        .collect();
    let hit = GameEvent::RunEnded {
        score: 0,
        cause: DeathCause::Pipe,
    };
    assert_eq!(ended, vec![hit]);
}

#[test]
fn stored_record_must_be_beaten() {
    let settings = wide_open();
    let mut game = Game::new(&settings, 1, ChaCha8Rng::seed_from_u64(6));
    game.flap();
    ticks(&mut game, 371);
    assert_eq!(game.score(), 2);
    assert_eq!(game.high_score(), 2);

    let events = game.take_events();
    assert!(events.contains(&GameEvent::NewHighScore { score: 2 }));
    assert!(!events.contains(&GameEvent::NewHighScore { score: 1 }));
}

proptest! {
    #[test]
    fn every_gap_is_exact_and_in_range(
        seed in any::<u64>(),
        gap in 80u32..200,
        min_height in 0u32..100,
        margin in 200u32..400,
    ) {
        let mut settings = hovering();
        settings.pipes.gap = gap as f64;
        settings.pipes.min_height = min_height as f64;
        settings.pipes.bottom_margin = margin as f64;
        settings.pipes.spawn_period = 10;
        prop_assume!(settings.validate().is_ok());

        let mut game = game_with(&settings, seed);
        game.flap();
        ticks(&mut game, 150);
        prop_assert!(!game.pipes().is_empty());
        for pipe in game.pipes().pipes() {
            prop_assert_eq!(pipe.bottom - pipe.top, gap as f64);
            prop_assert!(pipe.top >= min_height as f64);
            prop_assert!(pipe.top <= settings.max_pipe_height());
            prop_assert!(pipe.bottom <= settings.playfield.height);
        }
    }

    #[test]
    fn spacing_is_speed_times_period(seed in any::<u64>(), n in 100usize..400) {
        let mut game = game_with(&wide_open(), seed);
        game.flap();
        ticks(&mut game, n);
        for pair in xs(&game).windows(2) {
            prop_assert_eq!(pair[1] - pair[0], 2.0 * 90.0);
        }
    }

    #[test]
    fn nothing_moves_before_the_first_flap(seed in any::<u64>(), n in 0usize..500) {
        let mut game = game_with(&Settings::default(), seed);
        let bird = game.bird().clone();
        ticks(&mut game, n);
        prop_assert_eq!(game.phase(), Phase::Start);
        prop_assert_eq!(game.bird(), &bird);
        prop_assert!(game.pipes().is_empty());
    }

    #[test]
    fn score_counts_up_by_one(
        seed in any::<u64>(),
        flaps in proptest::collection::vec(any::<bool>(), 600),
    ) {
        let mut game = game_with(&Settings::default(), seed);
        game.flap();
        let mut events = Vec::new();
        for flap in flaps {
            if flap {
                game.queue(Command::Flap);
            }
            game.tick();
            events.extend(game.take_events());
        }

        let scored: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Scored { score } => Some(*score),
                _ => None,
            })
            .collect();
        let expected: Vec<u32> = (1..=game.score()).collect();
        prop_assert_eq!(scored, expected);

        let ended = events.iter().filter(|e| matches!(e, GameEvent::RunEnded { .. })).count();
        prop_assert!(ended <= 1);
        prop_assert_eq!(ended == 1, game.phase() == Phase::GameOver);
    }
}
