//! The two games
//!
//! Each game is a `ScreenState` plus a simulation session. `update` and
//! `draw` dispatch on the current screen with one handler per variant.

pub mod blocks;
pub mod pong;

pub use blocks::BlocksGame;
pub use pong::PongGame;
