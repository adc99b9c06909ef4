//! Player settings and preferences
//!
//! Read-only at runtime: a JSON file next to the native binary, or
//! LocalStorage in the browser.

use serde::{Deserialize, Serialize};

use crate::consts::TARGET_FPS;

/// Player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Frame pacing ===
    /// Frames per second the loop is paced to
    pub target_fps: u32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            mute_on_blur: true,

            target_fps: TARGET_FPS,

            show_fps: false,
        }
    }
}

impl Settings {
    /// Settings file read by native builds
    pub const FILE_NAME: &'static str = "settings.json";

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "screen_arcade_settings";

    /// Seconds per frame at the target rate
    pub fn frame_time(&self) -> f64 {
        1.0 / self.target_fps.max(1) as f64
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from `settings.json` in the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        crate::tuning::load_or_default(std::path::Path::new(Self::FILE_NAME))
    }
}
