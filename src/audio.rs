//! Audio boundary and volume handling
//!
//! Mixing and decoding belong to the backend. The games only trigger
//! one-shot sounds and keep a music stream fed once per frame.

use crate::assets::{MusicId, SoundId};
use crate::settings::Settings;

/// Backend side of audio playback
pub trait Audio {
    /// Fire a one-shot sound
    fn play_sound(&mut self, sound: SoundId);
    /// Start a looping music stream
    fn play_music(&mut self, music: MusicId);
    /// Feed the music stream; called once per frame
    fn update_music(&mut self, music: MusicId);
    fn stop_music(&mut self, music: MusicId);
}

/// Volume state shared by the audio backends
#[derive(Debug, Clone, PartialEq)]
pub struct AudioLevels {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioLevels {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl AudioLevels {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: false,
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Effective one-shot volume
    pub fn sfx(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music volume
    pub fn music(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }
}
