//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock time
//! - No randomness
//! - Stable iteration order (bricks scan row-major)
//! - No rendering or platform dependencies

pub mod blocks;
pub mod collision;
pub mod pong;
pub mod state;

pub use blocks::{BlocksEvent, BlocksInput, BlocksSession, GameResult};
pub use collision::{Rect, circle_rect, reflect_x, reflect_y};
pub use pong::{PongEvent, PongInput, PongSession, Side};
pub use state::{Ball, Brick, BrickGrid, Paddle};
