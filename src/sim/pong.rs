//! Pong session, enemy AI and fixed-step tick

use serde::{Deserialize, Serialize};

use super::collision::{Rect, reflect_x, reflect_y, wall_contact};
use super::state::{Ball, Paddle};
use crate::tuning::PongTuning;

/// Input commands for a single Pong frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PongInput {
    /// Held
    pub up: bool,
    /// Held
    pub down: bool,
    /// Held: shrink the enemy vision range
    pub vision_left: bool,
    /// Held: grow the enemy vision range
    pub vision_right: bool,
    /// Pressed this frame: pause toggle
    pub pause: bool,
}

/// Which side scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PongEvent {
    WallBounce,
    PaddleHit,
    Goal(Side),
}

/// Complete Pong session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PongSession {
    pub ball: Ball,
    pub player: Paddle,
    pub enemy: Paddle,
    pub player_score: u32,
    pub enemy_score: u32,
    /// The enemy only tracks the ball past this x coordinate
    pub vision_range: f32,
    pub paused: bool,
}

impl PongSession {
    pub fn new(tuning: &PongTuning) -> Self {
        let screen = tuning.screen_size();
        let size = tuning.paddle_size;
        let top = screen.y / 2.0 - size.y / 2.0;

        Self {
            ball: Ball::new(screen / 2.0, tuning.ball_velocity, tuning.ball_radius),
            player: Paddle::new(
                Rect::new(tuning.paddle_margin, top, size.x, size.y),
                tuning.player_speed,
            ),
            enemy: Paddle::new(
                Rect::new(screen.x - tuning.paddle_margin - size.x, top, size.x, size.y),
                tuning.enemy_speed,
            ),
            player_score: 0,
            enemy_score: 0,
            vision_range: tuning.vision_range,
            paused: false,
        }
    }
}

/// Move the enemy paddle toward the ball once it is past the vision range
///
/// No prediction and no smoothing: a fixed step up or down, or nothing.
pub fn track_ball(enemy: &mut Paddle, ball: &Ball, vision_range: f32) {
    if ball.pos.x <= vision_range {
        return;
    }
    let center_y = enemy.center().y;
    if ball.pos.y > center_y {
        enemy.bounds.y += enemy.speed;
    } else if ball.pos.y < center_y {
        enemy.bounds.y -= enemy.speed;
    }
}

/// Advance the session by one frame
///
/// The pause toggle is read after the physics step, so the frame that
/// pauses still simulates.
pub fn tick(session: &mut PongSession, input: &PongInput, tuning: &PongTuning) -> Vec<PongEvent> {
    let mut events = Vec::new();
    let screen = tuning.screen_size();

    if !session.paused {
        let ball = &mut session.ball;
        ball.advance();

        let walls = wall_contact(ball.pos, ball.radius, screen, false);
        if walls.horizontal() {
            ball.vel = reflect_x(ball.vel);
            events.push(PongEvent::WallBounce);
        }
        if walls.vertical() {
            ball.vel = reflect_y(ball.vel);
            events.push(PongEvent::WallBounce);
        }

        // Goals: the ball keeps going, only the score moves
        if ball.pos.x - ball.radius <= 0.0 {
            session.enemy_score = session.enemy_score.saturating_add(tuning.goal_points);
            log::info!("Enemy scores: {}", session.enemy_score);
            events.push(PongEvent::Goal(Side::Enemy));
        } else if ball.pos.x + ball.radius > screen.x {
            session.player_score = session.player_score.saturating_add(tuning.goal_points);
            log::info!("Player scores: {}", session.player_score);
            events.push(PongEvent::Goal(Side::Player));
        }

        // Player
        let player = &mut session.player;
        if input.up {
            player.bounds.y -= player.speed;
        } else if input.down {
            player.bounds.y += player.speed;
        }
        player.clamp_vertical(screen.y);

        if ball.hits(&player.bounds) {
            ball.vel = reflect_x(ball.vel);
            events.push(PongEvent::PaddleHit);
        }

        // Enemy
        track_ball(&mut session.enemy, ball, session.vision_range);
        session.enemy.clamp_vertical(screen.y);

        if ball.hits(&session.enemy.bounds) {
            ball.vel = reflect_x(ball.vel);
            events.push(PongEvent::PaddleHit);
        }

        if input.vision_right {
            session.vision_range += 1.0;
        } else if input.vision_left {
            session.vision_range -= 1.0;
        }
    }

    if input.pause {
        session.paused = !session.paused;
        log::debug!("Pong paused: {}", session.paused);
    }

    events
}
