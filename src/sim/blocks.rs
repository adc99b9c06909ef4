//! Blocks (Breakout) session and fixed-step tick
//!
//! One call to `tick` is one frame of Gameplay. The tick never looks at
//! the platform; it reads a `BlocksInput` and reports what happened as events.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, reflect_x, reflect_y, wall_contact};
use super::state::{Ball, BrickGrid, Paddle};
use crate::tuning::BlocksTuning;

/// Input commands for a single Blocks frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlocksInput {
    /// Held
    pub left: bool,
    /// Held
    pub right: bool,
    /// Pressed this frame: launch the docked ball
    pub serve: bool,
    /// Pressed this frame: pause toggle
    pub pause: bool,
}

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameResult {
    #[default]
    Undefined,
    Loss,
    Win,
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlocksEvent {
    WallBounce,
    PaddleHit,
    BrickBroken { row: usize, col: usize },
    Served,
    LifeLost { lives_left: i32 },
    /// Lives exhausted or every brick cleared
    RunOver(GameResult),
}

/// Complete Blocks session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlocksSession {
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: BrickGrid,
    pub lives: i32,
    pub paused: bool,
    pub result: GameResult,
}

impl BlocksSession {
    pub fn new(tuning: &BlocksTuning) -> Self {
        let screen = tuning.screen_size();
        let paddle = Paddle::new(
            Rect::from_pos_size(
                Vec2::new(screen.x / 2.0, (screen.y * 7.0 / 8.0).floor()),
                tuning.paddle_size,
            ),
            tuning.paddle_speed,
        );
        let mut ball = Ball::new(Vec2::ZERO, Vec2::ZERO, tuning.ball_radius);
        dock(&mut ball, &paddle);

        Self {
            bricks: BrickGrid::new(
                tuning.brick_rows,
                tuning.bricks_per_row,
                screen.x,
                tuning.bricks_top,
                tuning.brick_height,
            ),
            paddle,
            ball,
            lives: tuning.lives,
            paused: false,
            result: GameResult::Undefined,
        }
    }
}

/// Rest the ball on top of the paddle, inactive and motionless
fn dock(ball: &mut Ball, paddle: &Paddle) {
    ball.pos = Vec2::new(paddle.center().x, paddle.bounds.y - ball.radius - 1.0);
    ball.vel = Vec2::ZERO;
    ball.active = false;
}

/// Horizontal speed after a paddle hit: steeper the further from centre
pub fn paddle_deflection(ball_x: f32, paddle: &Rect, factor: f32) -> f32 {
    let half = paddle.w / 2.0;
    (ball_x - paddle.center().x) / half * factor
}

/// Advance the session by one frame
pub fn tick(session: &mut BlocksSession, input: &BlocksInput, tuning: &BlocksTuning) -> Vec<BlocksEvent> {
    let mut events = Vec::new();

    if input.pause {
        session.paused = !session.paused;
        log::debug!("Blocks paused: {}", session.paused);
    }
    if session.paused {
        return events;
    }

    let screen = tuning.screen_size();

    // Paddle movement
    let paddle = &mut session.paddle;
    if input.left {
        paddle.bounds.x -= paddle.speed;
    }
    if input.right {
        paddle.bounds.x += paddle.speed;
    }
    paddle.clamp_horizontal(screen.x);

    let ball = &mut session.ball;
    if !ball.active {
        // Docked: follow the paddle until served
        ball.pos.x = session.paddle.center().x;
        if input.serve {
            ball.active = true;
            ball.vel = tuning.serve_velocity;
            events.push(BlocksEvent::Served);
        }
        return events;
    }

    ball.advance();

    // Ball vs screen limits (no bottom wall)
    let walls = wall_contact(ball.pos, ball.radius, screen, true);
    if walls.horizontal() {
        ball.vel = reflect_x(ball.vel);
        events.push(BlocksEvent::WallBounce);
    }
    if walls.top {
        ball.vel = reflect_y(ball.vel);
        events.push(BlocksEvent::WallBounce);
    }

    // Ball vs paddle
    if ball.hits(&session.paddle.bounds) {
        ball.vel.y = -ball.vel.y;
        ball.vel.x = paddle_deflection(ball.pos.x, &session.paddle.bounds, tuning.deflection);
        events.push(BlocksEvent::PaddleHit);
    }

    // Ball vs bricks, first hit only
    if let Some((row, col)) = session.bricks.break_first_hit(ball) {
        ball.vel = reflect_y(ball.vel);
        events.push(BlocksEvent::BrickBroken { row, col });
    }

    // Ball fell below the screen
    if ball.pos.y + ball.radius >= screen.y {
        dock(ball, &session.paddle);
        session.lives -= 1;
        log::info!("Ball lost, {} lives left", session.lives);
        events.push(BlocksEvent::LifeLost {
            lives_left: session.lives,
        });
    }

    if session.lives < 0 {
        session.lives = tuning.lives;
        session.result = GameResult::Loss;
        log::info!("Blocks run over: lives exhausted");
        events.push(BlocksEvent::RunOver(GameResult::Loss));
    } else if session.bricks.all_cleared() {
        dock(&mut session.ball, &session.paddle);
        session.result = GameResult::Win;
        log::info!("Blocks run over: all bricks cleared");
        events.push(BlocksEvent::RunOver(GameResult::Win));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn served_session(tuning: &BlocksTuning) -> BlocksSession {
        let mut session = BlocksSession::new(tuning);
        let serve = BlocksInput {
            serve: true,
            ..Default::default()
        };
        tick(&mut session, &serve, tuning);
        assert!(session.ball.active);
        session
    }

    #[test]
    fn test_initial_session() {
        let tuning = BlocksTuning::default();
        let session = BlocksSession::new(&tuning);
        assert_eq!(session.lives, 5);
        assert!(!session.ball.active);
        assert_eq!(session.bricks.active_count(), 100);
        assert_eq!(session.paddle.bounds, Rect::new(400.0, 393.0, 100.0, 24.0));
        // Docked just above the paddle, centred
        assert_eq!(session.ball.pos, Vec2::new(450.0, 382.0));
    }

    #[test]
    fn test_docked_ball_follows_paddle_until_served() {
        let tuning = BlocksTuning::default();
        let mut session = BlocksSession::new(&tuning);

        let left = BlocksInput {
            left: true,
            ..Default::default()
        };
        tick(&mut session, &left, &tuning);
        assert_eq!(session.paddle.bounds.x, 392.0);
        assert_eq!(session.ball.pos.x, 442.0);
        assert!(!session.ball.active);

        let serve = BlocksInput {
            serve: true,
            ..Default::default()
        };
        let events = tick(&mut session, &serve, &tuning);
        assert!(session.ball.active);
        assert_eq!(session.ball.vel, Vec2::new(0.0, -5.0));
        assert_eq!(events, vec![BlocksEvent::Served]);
    }

    #[test]
    fn test_top_wall_reflects_vertical_speed() {
        let tuning = BlocksTuning::default();
        let mut session = served_session(&tuning);
        session.ball.pos = Vec2::new(400.0, 5.0);
        session.ball.vel = Vec2::new(4.0, 4.0);

        let events = tick(&mut session, &BlocksInput::default(), &tuning);
        assert_eq!(session.ball.vel, Vec2::new(4.0, -4.0));
        assert_eq!(session.ball.pos, Vec2::new(404.0, 9.0));
        assert!(events.contains(&BlocksEvent::WallBounce));
    }

    #[test]
    fn test_side_wall_reflects_horizontal_speed() {
        let tuning = BlocksTuning::default();
        let mut session = served_session(&tuning);
        session.ball.pos = Vec2::new(795.0, 300.0);
        session.ball.vel = Vec2::new(3.0, -2.0);

        tick(&mut session, &BlocksInput::default(), &tuning);
        assert_eq!(session.ball.vel, Vec2::new(-3.0, -2.0));
    }

    #[test]
    fn test_paddle_hit_deflects_by_offset() {
        let tuning = BlocksTuning::default();
        let mut session = served_session(&tuning);
        let paddle = session.paddle.bounds;

        // Dead centre: straight back up
        session.ball.pos = Vec2::new(paddle.center().x, paddle.y - 12.0);
        session.ball.vel = Vec2::new(0.0, 4.0);
        tick(&mut session, &BlocksInput::default(), &tuning);
        assert_eq!(session.ball.vel, Vec2::new(0.0, -4.0));

        // Right edge: full deflection factor
        session.ball.pos = Vec2::new(paddle.right(), paddle.y - 12.0);
        session.ball.vel = Vec2::new(0.0, 4.0);
        tick(&mut session, &BlocksInput::default(), &tuning);
        assert_eq!(session.ball.vel, Vec2::new(tuning.deflection, -4.0));
    }

    #[test]
    fn test_deflection_matches_full_width_formula() {
        let paddle = Rect::new(100.0, 0.0, 100.0, 24.0);
        // (dx / width) * 5 == (dx / half width) * 2.5
        let dx: f32 = 30.0;
        let expected = dx / paddle.w * 5.0;
        assert!((paddle_deflection(150.0 + dx, &paddle, 2.5) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_brick_hit_breaks_one_brick_and_reflects() {
        let tuning = BlocksTuning::default();
        let mut session = served_session(&tuning);
        // Just below the bottom row, moving up into it
        session.ball.pos = Vec2::new(60.0, 160.0);
        session.ball.vel = Vec2::new(0.0, -5.0);

        let events = tick(&mut session, &BlocksInput::default(), &tuning);
        assert_eq!(events, vec![BlocksEvent::BrickBroken { row: 4, col: 1 }]);
        assert_eq!(session.ball.vel, Vec2::new(0.0, 5.0));
        assert_eq!(session.bricks.active_count(), 99);
        assert!(!session.bricks.get(4, 1).unwrap().active);
    }

    #[test]
    fn test_broken_brick_is_skipped_later() {
        let tuning = BlocksTuning::default();
        let mut session = served_session(&tuning);
        session.ball.pos = Vec2::new(60.0, 160.0);
        session.ball.vel = Vec2::new(0.0, -5.0);
        tick(&mut session, &BlocksInput::default(), &tuning);

        // Put the ball back inside the cleared slot: nothing left to hit there
        session.ball.pos = Vec2::new(60.0, 138.0);
        session.ball.vel = Vec2::new(0.0, 0.5);
        session.ball.radius = 1.0;
        let events = tick(&mut session, &BlocksInput::default(), &tuning);
        assert!(events.is_empty());
        assert!(!session.bricks.get(4, 1).unwrap().active);
    }

    #[test]
    fn test_falling_ball_costs_a_life_and_docks() {
        let tuning = BlocksTuning::default();
        let mut session = served_session(&tuning);
        session.ball.pos = Vec2::new(50.0, 438.0);
        session.ball.vel = Vec2::new(0.0, 3.0);

        let events = tick(&mut session, &BlocksInput::default(), &tuning);
        assert_eq!(events, vec![BlocksEvent::LifeLost { lives_left: 4 }]);
        assert_eq!(session.lives, 4);
        assert!(!session.ball.active);
        assert_eq!(session.ball.vel, Vec2::ZERO);
        assert_eq!(session.ball.pos.x, session.paddle.center().x);
    }

    #[test]
    fn test_last_life_ends_run_and_resets_lives() {
        let tuning = BlocksTuning::default();
        let mut session = served_session(&tuning);
        session.lives = 0;
        session.ball.pos = Vec2::new(50.0, 438.0);
        session.ball.vel = Vec2::new(0.0, 3.0);

        let events = tick(&mut session, &BlocksInput::default(), &tuning);
        assert!(events.contains(&BlocksEvent::RunOver(GameResult::Loss)));
        assert_eq!(session.lives, tuning.lives);
        assert_eq!(session.result, GameResult::Loss);
    }

    #[test]
    fn test_clearing_all_bricks_wins() {
        let tuning = BlocksTuning {
            brick_rows: 1,
            bricks_per_row: 1,
            ..Default::default()
        };
        let mut session = served_session(&tuning);
        session.ball.pos = Vec2::new(400.0, 80.0);
        session.ball.vel = Vec2::new(0.0, -5.0);

        let events = tick(&mut session, &BlocksInput::default(), &tuning);
        assert!(events.contains(&BlocksEvent::RunOver(GameResult::Win)));
        assert_eq!(session.result, GameResult::Win);
        assert!(!session.ball.active);
    }

    #[test]
    fn test_pause_freezes_physics() {
        let tuning = BlocksTuning::default();
        let mut session = served_session(&tuning);
        let before = session.ball.pos;

        let pause = BlocksInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut session, &pause, &tuning);
        assert!(session.paused);

        let held = BlocksInput {
            left: true,
            ..Default::default()
        };
        tick(&mut session, &held, &tuning);
        assert_eq!(session.ball.pos, before);

        // Unpausing resumes physics in the same frame
        tick(&mut session, &pause, &tuning);
        assert!(!session.paused);
        assert_eq!(session.ball.pos, before + Vec2::new(0.0, -5.0));
    }

    proptest! {
        #[test]
        fn prop_paddle_always_on_screen(moves in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..300)) {
            let tuning = BlocksTuning::default();
            let mut session = BlocksSession::new(&tuning);
            for (left, right) in moves {
                let input = BlocksInput { left, right, ..Default::default() };
                tick(&mut session, &input, &tuning);
                let x = session.paddle.bounds.x;
                prop_assert!(x >= 0.0);
                prop_assert!(x <= tuning.screen_width - session.paddle.bounds.w);
            }
        }

        #[test]
        fn prop_free_ball_integrates_exactly(x in 200.0f32..600.0, y in 250.0f32..330.0, vx in -4.0f32..4.0, vy in -4.0f32..4.0) {
            // Mid-screen, well clear of walls, bricks and paddle
            let tuning = BlocksTuning::default();
            let mut session = served_session(&tuning);
            session.ball.pos = Vec2::new(x, y);
            session.ball.vel = Vec2::new(vx, vy);

            let events = tick(&mut session, &BlocksInput::default(), &tuning);
            prop_assert!(events.is_empty());
            prop_assert_eq!(session.ball.pos, Vec2::new(x, y) + Vec2::new(vx, vy));
            prop_assert_eq!(session.ball.vel, Vec2::new(vx, vy));
        }
    }
}
