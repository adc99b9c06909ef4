//! Data-driven game balance
//!
//! Every gameplay constant lives here. Defaults reproduce the classic
//! values; a JSON file may override any subset of them.

use std::path::Path;

use glam::Vec2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::screen::LogoIntro;

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What confirming on the Ending screen does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndingAction {
    /// Reset the session and go back to Title
    Replay,
    /// Leave the program
    Exit,
}

/// How Blocks draws its actors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawStyle {
    /// Plain rectangles and a circle
    Shapes,
    /// Paddle, ball and brick textures
    #[default]
    Textures,
}

/// Blocks asset locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocksAssetPaths {
    pub logo: String,
    pub ball: String,
    pub paddle: String,
    pub brick: String,
}

impl Default for BlocksAssetPaths {
    fn default() -> Self {
        Self {
            logo: "resources/raylib_logo.png".into(),
            ball: "resources/ball.png".into(),
            paddle: "resources/paddle.png".into(),
            brick: "resources/brick.png".into(),
        }
    }
}

/// Blocks gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocksTuning {
    pub screen_width: f32,
    pub screen_height: f32,
    pub logo: LogoIntro,
    /// Lives at the start of a run; the run ends when they drop below zero
    pub lives: i32,
    pub brick_rows: usize,
    pub bricks_per_row: usize,
    /// Y coordinate of the first brick row
    pub bricks_top: f32,
    pub brick_height: f32,
    pub paddle_size: Vec2,
    /// Pixels per frame
    pub paddle_speed: f32,
    pub ball_radius: f32,
    /// Ball velocity right after a serve (pixels per frame)
    pub serve_velocity: Vec2,
    /// Horizontal speed at the very edge of the paddle
    pub deflection: f32,
    pub draw_style: DrawStyle,
    pub ending: EndingAction,
    pub assets: BlocksAssetPaths,
}

impl Default for BlocksTuning {
    fn default() -> Self {
        Self {
            screen_width: BLOCKS_WIDTH,
            screen_height: BLOCKS_HEIGHT,
            logo: LogoIntro::Timed { frames: 180 },
            lives: 5,
            brick_rows: 5,
            bricks_per_row: 20,
            bricks_top: 50.0,
            brick_height: 20.0,
            paddle_size: Vec2::new(100.0, 24.0),
            paddle_speed: 8.0,
            ball_radius: 10.0,
            serve_velocity: Vec2::new(0.0, -5.0),
            deflection: 2.5,
            draw_style: DrawStyle::Textures,
            ending: EndingAction::Replay,
            assets: BlocksAssetPaths::default(),
        }
    }
}

impl BlocksTuning {
    /// Tuning file read by the native binary
    pub const FILE_NAME: &'static str = "blocks.json";

    #[inline]
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    /// Window size in whole pixels
    pub fn window_size(&self) -> (i32, i32) {
        (self.screen_width as i32, self.screen_height as i32)
    }
}

/// Pong asset locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongAssetPaths {
    pub logo: String,
    pub title_font: String,
    pub start_sound: String,
    pub bounce_sound: String,
    pub music: String,
}

impl Default for PongAssetPaths {
    fn default() -> Self {
        Self {
            logo: "resources/logo_raylib.png".into(),
            title_font: "resources/pixantiqua.ttf".into(),
            start_sound: "resources/start.wav".into(),
            bounce_sound: "resources/pong.wav".into(),
            music: "resources/qt-plimp.xm".into(),
        }
    }
}

/// Pong gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongTuning {
    pub screen_width: f32,
    pub screen_height: f32,
    pub logo: LogoIntro,
    pub ball_radius: f32,
    /// Initial ball velocity (pixels per frame)
    pub ball_velocity: Vec2,
    pub paddle_size: Vec2,
    /// Gap between a paddle and its screen edge
    pub paddle_margin: f32,
    pub player_speed: f32,
    pub enemy_speed: f32,
    /// Initial enemy vision range (x coordinate)
    pub vision_range: f32,
    pub goal_points: u32,
    pub ending: EndingAction,
    pub assets: PongAssetPaths,
}

impl Default for PongTuning {
    fn default() -> Self {
        Self {
            screen_width: PONG_WIDTH,
            screen_height: PONG_HEIGHT,
            logo: LogoIntro::Fade {
                fade_frames: 180,
                hold_frames: 200,
            },
            ball_radius: 20.0,
            ball_velocity: Vec2::new(6.0, -4.0),
            paddle_size: Vec2::new(25.0, 100.0),
            paddle_margin: 10.0,
            player_speed: 8.0,
            enemy_speed: 3.0,
            vision_range: PONG_WIDTH / 2.0,
            goal_points: 1000,
            ending: EndingAction::Exit,
            assets: PongAssetPaths::default(),
        }
    }
}

impl PongTuning {
    /// Tuning file read by the native binary
    pub const FILE_NAME: &'static str = "pong.json";

    #[inline]
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    /// Window size in whole pixels
    pub fn window_size(&self) -> (i32, i32) {
        (self.screen_width as i32, self.screen_height as i32)
    }
}

/// Parse a JSON config; missing fields keep their defaults
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a JSON config file
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let json = std::fs::read_to_string(path)?;
    from_json(&json)
}

/// Read a JSON config file, falling back to defaults when absent or invalid
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        log::info!("No {} found, using defaults", path.display());
        return T::default();
    }
    match load(path) {
        Ok(config) => {
            log::info!("Loaded {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("Ignoring {}: {}", path.display(), e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning: BlocksTuning = from_json(r#"{ "lives": 2, "deflection": 4.0 }"#).unwrap();
        assert_eq!(tuning.lives, 2);
        assert_eq!(tuning.deflection, 4.0);
        assert_eq!(tuning.brick_rows, 5);
        assert_eq!(tuning.assets, BlocksAssetPaths::default());
    }

    #[test]
    fn test_enum_fields_parse() {
        let tuning: PongTuning = from_json(
            r#"{ "ending": "Replay", "logo": { "Timed": { "frames": 60 } }, "ball_velocity": [3.0, 2.0] }"#,
        )
        .unwrap();
        assert_eq!(tuning.ending, EndingAction::Replay);
        assert_eq!(tuning.logo, LogoIntro::Timed { frames: 60 });
        assert_eq!(tuning.ball_velocity, Vec2::new(3.0, 2.0));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = from_json::<PongTuning>("{ lives: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_window_follows_screen_size() {
        assert_eq!(BlocksTuning::default().window_size(), (800, 450));
        let tuning: PongTuning = from_json(r#"{ "screen_width": 1024.0, "screen_height": 768.0 }"#).unwrap();
        assert_eq!(tuning.window_size(), (1024, 768));
        assert_eq!(tuning.screen_size(), Vec2::new(1024.0, 768.0));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning: PongTuning = load_or_default(Path::new("does/not/exist.json"));
        assert_eq!(tuning, PongTuning::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load::<BlocksTuning>(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
