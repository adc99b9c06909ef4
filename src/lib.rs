//! Screen Arcade - Blocks and Pong on a four-screen state machine
//!
//! Core modules:
//! - `screen`: Logo / Title / Gameplay / Ending state machine
//! - `sim`: Deterministic simulation (physics, collisions, session state)
//! - `games`: The Blocks and Pong games (screen dispatch, drawing, sounds)
//! - `game_loop`: Paired update/draw frame driver
//! - `platform`: Input, drawing, audio and asset boundary plus backends
//! - `renderer`: Draw primitives, palette and the recording canvas
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod audio;
pub mod game_loop;
pub mod games;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod screen;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use assets::{AssetError, AssetLoader};
pub use game_loop::{Flow, FrameClock, Game, GameLoop};
pub use games::{BlocksGame, PongGame};
pub use input::{FrameInput, Key, KeySet};
pub use screen::{Screen, ScreenState};
pub use settings::Settings;
pub use tuning::{BlocksTuning, ConfigError, PongTuning};

/// Game configuration constants
pub mod consts {
    /// Target frame rate; one update/draw pair per frame
    pub const TARGET_FPS: u32 = 60;
    /// Duration of one frame in seconds
    pub const FRAME_DT: f64 = 1.0 / TARGET_FPS as f64;

    /// Blocks window
    pub const BLOCKS_TITLE: &str = "PROJECT: BLOCKS GAME";
    pub const BLOCKS_WIDTH: f32 = 800.0;
    pub const BLOCKS_HEIGHT: f32 = 450.0;

    /// Pong window
    pub const PONG_TITLE: &str = "SUPER PONG";
    pub const PONG_WIDTH: f32 = 800.0;
    pub const PONG_HEIGHT: f32 = 600.0;

    /// Title prompt blink period (frames per on/off half-cycle)
    pub const BLINK_FRAMES: u32 = 30;
}
