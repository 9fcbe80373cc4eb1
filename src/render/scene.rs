use rand::Rng;

use super::{Canvas, Rgb, TextSize};
use crate::game::{Game, Phase, Pipe, Rect};
use crate::leaderboard::ScoreEntry;
use crate::player::Player;

// ── Colors ──────────────────────────────────────────────────────────────────

const SKY_TOP: Rgb = Rgb(112, 197, 206);
const SKY_BOT: Rgb = Rgb(74, 157, 179);
const CLOUD: Rgb = Rgb(200, 232, 238);
const GRASS: Rgb = Rgb(144, 238, 144);
const GRASS_DARK: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(222, 184, 135);
const DIRT_DARK: Rgb = Rgb(200, 165, 115);
const PIPE_L: Rgb = Rgb(56, 142, 60);
const PIPE_M: Rgb = Rgb(76, 175, 80);
const PIPE_R: Rgb = Rgb(100, 190, 90);
const PIPE_HI: Rgb = Rgb(145, 215, 120);
const CAP: Rgb = Rgb(69, 160, 73);
const STRIPE: Rgb = Rgb(56, 142, 60);
const BIRD_BODY: Rgb = Rgb(255, 215, 0);
const BIRD_WING: Rgb = Rgb(255, 165, 0);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(0, 0, 0);
const BIRD_BEAK: Rgb = Rgb(255, 99, 71);
const WHITE: Rgb = Rgb(255, 255, 255);
const GOLD: Rgb = Rgb(255, 215, 0);
const MUTED: Rgb = Rgb(200, 200, 200);

const GROUND_H: f64 = 50.0;
const GRASS_H: f64 = 10.0;
const SKY_BANDS: usize = 24;
const PIPE_BANDS: usize = 6;
const CAP_H: f64 = 20.0;
const CAP_OVERHANG: f64 = 5.0;
const STRIPE_EVERY: f64 = 30.0;
const LINE_H: f64 = 18.0;

/// Read-only extras shown next to the simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hud<'a> {
    /// Signed-in player, `None` when scores stay local.
    pub player: Option<&'a Player>,
    pub leaderboard: &'a [ScoreEntry],
    /// Best score on the shared board.
    pub global_best: Option<u32>,
}

/// Draws one frame. Only reads `game`; drawing the same state twice yields
/// the same picture.
pub fn draw_scene<R: Rng>(game: &Game<R>, hud: &Hud<'_>, canvas: &mut impl Canvas) {
    draw_sky(game, canvas);
    draw_ground(game, canvas);
    for pipe in game.pipes().pipes() {
        draw_pipe(game, pipe, canvas);
    }
    draw_bird(game, canvas);

    match game.phase() {
        Phase::Start => draw_start(game, hud, canvas),
        Phase::Playing => {
            let cx = game.playfield().width / 2.0;
            canvas.text(cx, 30.0, &game.score().to_string(), TextSize::Large, WHITE);
            draw_global_best(hud, cx, 70.0, canvas);
        }
        Phase::GameOver => draw_game_over(game, hud, canvas),
    }
}

fn draw_sky<R: Rng>(game: &Game<R>, canvas: &mut impl Canvas) {
    let field = game.playfield();
    let band = field.height / SKY_BANDS as f64;
    for i in 0..SKY_BANDS {
        let t = (i * 256 / SKY_BANDS) as u16;
        let rect = Rect::new(0.0, i as f64 * band, field.width, band + 1.0);
        canvas.fill_rect(rect, Rgb::lerp(SKY_TOP, SKY_BOT, t));
    }

    // Three clouds drifting at their own speed, wrapping 100 units off-screen.
    let frame = game.frame() as f64;
    for (speed, y) in [(0.3, 80.0), (0.2, 150.0), (0.25, 220.0)] {
        let x = (frame * speed) % (field.width + 100.0) - 100.0;
        canvas.fill_ellipse(x, y, 20.0, 20.0, CLOUD);
        canvas.fill_ellipse(x + 25.0, y, 30.0, 30.0, CLOUD);
        canvas.fill_ellipse(x + 50.0, y, 20.0, 20.0, CLOUD);
    }
}

fn draw_ground<R: Rng>(game: &Game<R>, canvas: &mut impl Canvas) {
    let field = game.playfield();
    let top = field.height - GROUND_H;
    canvas.fill_rect(Rect::new(0.0, top, field.width, GROUND_H), DIRT);

    // Dirt stripes scroll with the pipes while the bird flies.
    let offset = match game.phase() {
        Phase::Playing => (game.frame() as f64 * 2.0) % 24.0,
        _ => 0.0,
    };
    let mut x = -offset;
    while x < field.width {
        canvas.fill_rect(Rect::new(x, top + 12.0, 12.0, 6.0), DIRT_DARK);
        x += 24.0;
    }

    canvas.fill_rect(Rect::new(0.0, top - GRASS_H, field.width, GRASS_H), GRASS);
    canvas.fill_rect(Rect::new(0.0, top - 2.0, field.width, 2.0), GRASS_DARK);
}

fn draw_pipe<R: Rng>(game: &Game<R>, pipe: &Pipe, canvas: &mut impl Canvas) {
    let height = game.playfield().height;
    let width = game.pipes().width();
    let band = width / PIPE_BANDS as f64;

    for i in 0..PIPE_BANDS {
        let x = pipe.x + i as f64 * band;
        let shade = pipe_shade(i, PIPE_BANDS);
        canvas.fill_rect(Rect::new(x, 0.0, band, pipe.top), shade);
        canvas.fill_rect(Rect::new(x, pipe.bottom, band, height - pipe.bottom), shade);
    }

    let mut y = 20.0;
    while y < pipe.top {
        canvas.fill_rect(Rect::new(pipe.x, y, width, 2.0), STRIPE);
        y += STRIPE_EVERY;
    }
    let mut y = pipe.bottom + STRIPE_EVERY;
    while y < height {
        canvas.fill_rect(Rect::new(pipe.x, y, width, 2.0), STRIPE);
        y += STRIPE_EVERY;
    }

    let cap_w = width + CAP_OVERHANG * 2.0;
    canvas.fill_rect(Rect::new(pipe.x - CAP_OVERHANG, pipe.top - CAP_H, cap_w, CAP_H), CAP);
    canvas.fill_rect(Rect::new(pipe.x - CAP_OVERHANG, pipe.bottom, cap_w, CAP_H), CAP);
}

/// Horizontal shading across a pipe, dark edges and a highlight left of centre.
fn pipe_shade(i: usize, bands: usize) -> Rgb {
    if bands <= 1 {
        return PIPE_M;
    }
    let t = (i * 256 / (bands - 1)) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

fn draw_bird<R: Rng>(game: &Game<R>, canvas: &mut impl Canvas) {
    let bird = game.bird();
    let (cx, cy) = (bird.x + bird.width / 2.0, bird.y + bird.height / 2.0);
    let (sin, cos) = bird.rotation.sin_cos();
    // Body-local offset to playfield coordinates.
    let at = |dx: f64, dy: f64| (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos);

    canvas.fill_ellipse(cx, cy, bird.width / 2.0, bird.height / 2.0, BIRD_BODY);

    let (wx, wy) = at(-5.0, 5.0);
    canvas.fill_ellipse(wx, wy, 12.0, 8.0, BIRD_WING);

    let (ex, ey) = at(8.0, -5.0);
    canvas.fill_ellipse(ex, ey, 5.0, 5.0, BIRD_EYE);
    let (px, py) = at(10.0, -4.0);
    canvas.fill_ellipse(px, py, 3.0, 3.0, BIRD_PUPIL);

    let (bx, by) = at(18.5, 0.0);
    canvas.fill_ellipse(bx, by, 4.0, 3.0, BIRD_BEAK);
}

fn draw_start<R: Rng>(game: &Game<R>, hud: &Hud<'_>, canvas: &mut impl Canvas) {
    let field = game.playfield();
    let cx = field.width / 2.0;
    let mid = field.height / 2.0;

    canvas.text(cx, mid - 120.0, "FLAPPY BOARD", TextSize::Large, GOLD);
    canvas.text(cx, mid - 10.0, "PRESS SPACE TO START", TextSize::Small, WHITE);
    canvas.text(cx, mid + 15.0, &format!("BEST: {}", game.high_score()), TextSize::Small, WHITE);
    draw_global_best(hud, cx, mid + 35.0, canvas);
    if let Some(player) = hud.player {
        let line = format!("PLAYING AS {}", player.name());
        canvas.text(cx, mid + 60.0, &line, TextSize::Small, MUTED);
    }
}

fn draw_global_best(hud: &Hud<'_>, cx: f64, y: f64, canvas: &mut impl Canvas) {
    if let Some(best) = hud.global_best {
        canvas.text(cx, y, &format!("TOP: {best}"), TextSize::Small, GOLD);
    }
}

fn draw_game_over<R: Rng>(game: &Game<R>, hud: &Hud<'_>, canvas: &mut impl Canvas) {
    let field = game.playfield();
    let cx = field.width / 2.0;
    let mid = field.height / 2.0;

    canvas.dim();
    canvas.text(cx, mid - 150.0, "GAME OVER", TextSize::Large, WHITE);
    canvas.text(cx, mid - 95.0, &format!("SCORE: {}", game.score()), TextSize::Small, GOLD);
    canvas.text(cx, mid - 75.0, &format!("BEST: {}", game.high_score()), TextSize::Small, WHITE);
    draw_global_best(hud, cx, mid - 55.0, canvas);
    canvas.text(cx, mid - 30.0, "PRESS R TO RESTART", TextSize::Small, WHITE);

    let mut y = mid + 5.0;
    if hud.player.is_none() {
        canvas.text(cx, y, "NOT SIGNED IN", TextSize::Small, MUTED);
        return;
    }
    if hud.leaderboard.is_empty() {
        return;
    }
    canvas.text(cx, y, "TOP SCORES", TextSize::Small, GOLD);
    let bottom = field.height - GROUND_H - GRASS_H - LINE_H;
    for (rank, entry) in hud.leaderboard.iter().enumerate() {
        y += LINE_H;
        if y > bottom {
            break;
        }
        let line = format!("{}. {} {}", rank + 1, entry.player_name, entry.score);
        let mine = hud.player.is_some_and(|p| p.id() == entry.player_id);
        let color = if mine { GOLD } else { WHITE };
        canvas.text(cx, y, &line, TextSize::Small, color);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::settings::Settings;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Rect(Rect, Rgb),
        Ellipse(f64, f64, f64, f64, Rgb),
        Text(String, Rgb),
        Dim,
    }

    #[derive(Default)]
    struct RecordingCanvas {
        ops: Vec<Op>,
    }

    impl RecordingCanvas {
        fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text(t, _) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn color_of(&self, text: &str) -> Option<Rgb> {
            self.ops.iter().find_map(|op| match op {
                Op::Text(t, color) if t == text => Some(*color),
                _ => None,
            })
        }
    }

    impl Canvas for RecordingCanvas {
        fn fill_rect(&mut self, rect: Rect, color: Rgb) {
            self.ops.push(Op::Rect(rect, color));
        }

        fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, color: Rgb) {
            self.ops.push(Op::Ellipse(cx, cy, rx, ry, color));
        }

        fn text(&mut self, _cx: f64, _y: f64, text: &str, _size: TextSize, color: Rgb) {
            self.ops.push(Op::Text(text.to_string(), color));
        }

        fn dim(&mut self) {
            self.ops.push(Op::Dim);
        }
    }

    fn game() -> Game<ChaCha8Rng> {
        Game::new(&Settings::default(), 7, ChaCha8Rng::seed_from_u64(5))
    }

    fn draw(game: &Game<ChaCha8Rng>, hud: &Hud<'_>) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::default();
        draw_scene(game, hud, &mut canvas);
        canvas
    }

    fn game_over() -> Game<ChaCha8Rng> {
        let mut g = game();
        g.flap();
        while g.phase() != Phase::GameOver {
            g.tick();
        }
        g
    }

    fn entry(id: &str, name: &str, score: u32) -> ScoreEntry {
        ScoreEntry {
            player_id: id.into(),
            player_name: name.into(),
            score,
        }
    }

    #[test]
    fn start_screen_prompts() {
        let ada = Player::new("ada").unwrap();
        let hud = Hud {
            player: Some(&ada),
            global_best: Some(12),
            ..Hud::default()
        };
        assert_eq!(
            draw(&game(), &hud).texts(),
            vec![
                "FLAPPY BOARD",
                "PRESS SPACE TO START",
                "BEST: 7",
                "TOP: 12",
                "PLAYING AS ada",
            ]
        );
    }

    #[test]
    fn playing_shows_only_the_score() {
        let mut g = game();
        g.flap();
        g.tick();
        let canvas = draw(&g, &Hud::default());
        assert_eq!(canvas.texts(), vec!["0"]);
        assert!(!canvas.ops.contains(&Op::Dim));
    }

    #[test]
    fn playing_keeps_the_global_best_in_view() {
        let mut g = game();
        g.flap();
        g.tick();
        let hud = Hud {
            global_best: Some(40),
            ..Hud::default()
        };
        assert_eq!(draw(&g, &hud).texts(), vec!["0", "TOP: 40"]);
    }

    #[test]
    fn game_over_lists_the_leaderboard() {
        let ada = Player::new("ada").unwrap();
        let board = vec![entry("bob", "bob", 12), entry("ada", "ada", 3)];
        let hud = Hud {
            player: Some(&ada),
            leaderboard: &board,
            global_best: Some(12),
        };
        let canvas = draw(&game_over(), &hud);
        assert!(canvas.ops.contains(&Op::Dim));
        assert_eq!(
            canvas.texts(),
            vec![
                "GAME OVER",
                "SCORE: 0",
                "BEST: 7",
                "TOP: 12",
                "PRESS R TO RESTART",
                "TOP SCORES",
                "1. bob 12",
                "2. ada 3",
            ]
        );
    }

    #[test]
    fn own_row_is_found_by_id() {
        // The row keeps the name of the best run, typed differently.
        let me = Player::new("ada").unwrap();
        let board = vec![entry("ada", "Ada", 9), entry("bob", "bob", 4)];
        let hud = Hud {
            player: Some(&me),
            leaderboard: &board,
            global_best: Some(9),
        };
        let canvas = draw(&game_over(), &hud);
        assert_eq!(canvas.color_of("1. Ada 9"), Some(GOLD));
        assert_eq!(canvas.color_of("2. bob 4"), Some(WHITE));
    }

    #[test]
    fn game_over_without_a_player() {
        let canvas = draw(&game_over(), &Hud::default());
        assert_eq!(canvas.texts().last(), Some(&"NOT SIGNED IN"));
    }

    #[test]
    fn drawing_is_idempotent() {
        let mut g = game();
        g.flap();
        for _ in 0..95 {
            g.tick();
            g.flap();
        }
        assert!(!g.pipes().is_empty());
        let hud = Hud::default();
        assert_eq!(draw(&g, &hud).ops, draw(&g, &hud).ops);
    }

    #[test]
    fn clouds_drift_with_the_frame() {
        let mut g = game();
        let before = draw(&g, &Hud::default()).ops;
        g.tick();
        let after = draw(&g, &Hud::default()).ops;
        assert_ne!(before, after);
    }
}
