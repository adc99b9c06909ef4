//! Actors shared by both games
//!
//! All of these are owned by a single session and mutated only by its tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, circle_rect, clamp_span};

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Moving freely (Blocks docks an inactive ball on the paddle)
    pub active: bool,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            active: true,
        }
    }

    /// Integrate one frame of motion
    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    pub fn hits(&self, rect: &Rect) -> bool {
        circle_rect(self.pos, self.radius, rect)
    }
}

/// A paddle (player or enemy)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub bounds: Rect,
    /// Pixels per frame
    pub speed: f32,
}

impl Paddle {
    pub fn new(bounds: Rect, speed: f32) -> Self {
        Self { bounds, speed }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Keep the paddle within `[0, screen_width - width]`
    pub fn clamp_horizontal(&mut self, screen_width: f32) {
        self.bounds.x = clamp_span(self.bounds.x, self.bounds.w, screen_width);
    }

    /// Keep the paddle within `[0, screen_height - height]`
    pub fn clamp_vertical(&mut self, screen_height: f32) {
        self.bounds.y = clamp_span(self.bounds.y, self.bounds.h, screen_height);
    }
}

/// A single brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub bounds: Rect,
    /// Cleared once, never reactivated
    pub active: bool,
}

/// Bricks laid out in rows, stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickGrid {
    rows: usize,
    cols: usize,
    bricks: Vec<Brick>,
}

impl BrickGrid {
    /// Lay out `rows x cols` bricks spanning `width`, first row at `top`
    pub fn new(rows: usize, cols: usize, width: f32, top: f32, brick_height: f32) -> Self {
        let brick_width = if cols > 0 { width / cols as f32 } else { 0.0 };
        let mut bricks = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                bricks.push(Brick {
                    bounds: Rect::new(
                        col as f32 * brick_width,
                        top + row as f32 * brick_height,
                        brick_width,
                        brick_height,
                    ),
                    active: true,
                });
            }
        }
        Self { rows, cols, bricks }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Brick> {
        if row < self.rows && col < self.cols {
            self.bricks.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Bricks of one row, left to right
    pub fn row(&self, row: usize) -> &[Brick] {
        let start = (row * self.cols).min(self.bricks.len());
        let end = (start + self.cols).min(self.bricks.len());
        &self.bricks[start..end]
    }

    /// Active bricks in scan order as `(row, col, brick)`
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, usize, &Brick)> {
        let cols = self.cols.max(1);
        self.bricks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.active)
            .map(move |(i, b)| (i / cols, i % cols, b))
    }

    pub fn active_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.active).count()
    }

    pub fn all_cleared(&self) -> bool {
        self.bricks.iter().all(|b| !b.active)
    }

    /// Deactivate the first active brick the ball overlaps
    ///
    /// Scans top row first, left to right, and stops at the first hit.
    pub fn break_first_hit(&mut self, ball: &Ball) -> Option<(usize, usize)> {
        let cols = self.cols.max(1);
        let (index, brick) = self
            .bricks
            .iter_mut()
            .enumerate()
            .find(|(_, b)| b.active && ball.hits(&b.bounds))?;
        brick.active = false;
        Some((index / cols, index % cols))
    }
}
