//! Headless backend
//!
//! Feeds a scripted sequence of inputs and records everything the game does:
//! one `DrawList` per frame, every audio call, every asset acquire and
//! release. Exit is requested once the script runs out.

use std::collections::{HashMap, HashSet, VecDeque};

use glam::Vec2;

use super::{FramePacer, Platform};
use crate::assets::{AssetError, AssetHandle, AssetLoader, FontId, MusicId, SoundId, TextureId};
use crate::audio::Audio;
use crate::input::{FrameInput, Key};
use crate::renderer::{Canvas, DrawList};

/// Size reported for every texture the headless loader hands out
pub const DEFAULT_TEXTURE_SIZE: Vec2 = Vec2::new(32.0, 32.0);

/// One recorded audio call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    Sound(SoundId),
    PlayMusic(MusicId),
    UpdateMusic(MusicId),
    StopMusic(MusicId),
}

/// Scripted, recording platform
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    script: VecDeque<FrameInput>,
    canvas: DrawList,
    /// Completed frames, oldest first
    frames: Vec<DrawList>,
    audio: Vec<AudioCall>,
    missing: HashSet<String>,
    next_id: u32,
    loaded: HashMap<AssetHandle, String>,
    released: Vec<AssetHandle>,
    in_frame: bool,
    polls: u64,
    paced: u64,
}

impl HeadlessPlatform {
    pub fn new(script: impl IntoIterator<Item = FrameInput>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Default::default()
        }
    }

    /// `count` frames without any key activity
    pub fn idle(count: usize) -> Self {
        Self::new(std::iter::repeat_n(FrameInput::default(), count))
    }

    /// Make loads of `path` fail with `NotFound`
    pub fn with_missing(mut self, path: impl Into<String>) -> Self {
        self.missing.insert(path.into());
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    pub fn frames(&self) -> &[DrawList] {
        &self.frames
    }

    pub fn audio_calls(&self) -> &[AudioCall] {
        &self.audio
    }

    pub fn sounds_played(&self) -> impl Iterator<Item = SoundId> + '_ {
        self.audio.iter().filter_map(|call| match call {
            AudioCall::Sound(id) => Some(*id),
            _ => None,
        })
    }

    /// Handles still held by the game
    pub fn live_assets(&self) -> usize {
        self.loaded.len()
    }

    pub fn released(&self) -> &[AssetHandle] {
        &self.released
    }

    /// Path a live handle was loaded from
    pub fn path_of(&self, handle: AssetHandle) -> Option<&str> {
        self.loaded.get(&handle).map(String::as_str)
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn paced(&self) -> u64 {
        self.paced
    }

    /// Hand out the next id, or fail for paths marked missing
    fn acquire(&mut self, path: &str, handle: impl FnOnce(u32) -> AssetHandle) -> Result<u32, AssetError> {
        if self.missing.contains(path) {
            return Err(AssetError::NotFound { path: path.into() });
        }
        self.next_id += 1;
        self.loaded.insert(handle(self.next_id), path.to_string());
        Ok(self.next_id)
    }
}

impl Platform for HeadlessPlatform {
    fn exit_requested(&self) -> bool {
        match self.script.front() {
            None => true,
            Some(next) => next.is_pressed(Key::Escape),
        }
    }

    fn poll_input(&mut self) -> FrameInput {
        self.polls += 1;
        self.script.pop_front().unwrap_or_default()
    }

    fn begin_frame(&mut self) {
        debug_assert!(!self.in_frame, "begin_frame called twice");
        self.in_frame = true;
        self.canvas.clear_commands();
    }

    fn end_frame(&mut self) {
        debug_assert!(self.in_frame, "end_frame without begin_frame");
        self.in_frame = false;
        self.frames.push(self.canvas.clone());
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        &mut self.canvas
    }

    fn audio(&mut self) -> &mut dyn Audio {
        self
    }

    fn assets(&mut self) -> &mut dyn AssetLoader {
        self
    }
}

impl FramePacer for HeadlessPlatform {
    fn wait_next_frame(&mut self) {
        self.paced += 1;
    }
}

impl Audio for HeadlessPlatform {
    fn play_sound(&mut self, sound: SoundId) {
        self.audio.push(AudioCall::Sound(sound));
    }

    fn play_music(&mut self, music: MusicId) {
        self.audio.push(AudioCall::PlayMusic(music));
    }

    fn update_music(&mut self, music: MusicId) {
        self.audio.push(AudioCall::UpdateMusic(music));
    }

    fn stop_music(&mut self, music: MusicId) {
        self.audio.push(AudioCall::StopMusic(music));
    }
}

impl AssetLoader for HeadlessPlatform {
    fn load_texture(&mut self, path: &str) -> Result<TextureId, AssetError> {
        let id = TextureId(self.acquire(path, |id| TextureId(id).into())?);
        self.canvas.set_texture_size(id, DEFAULT_TEXTURE_SIZE);
        Ok(id)
    }

    fn load_font(&mut self, path: &str) -> Result<FontId, AssetError> {
        self.acquire(path, |id| FontId(id).into()).map(FontId)
    }

    fn load_sound(&mut self, path: &str) -> Result<SoundId, AssetError> {
        self.acquire(path, |id| SoundId(id).into()).map(SoundId)
    }

    fn load_music(&mut self, path: &str) -> Result<MusicId, AssetError> {
        self.acquire(path, |id| MusicId(id).into()).map(MusicId)
    }

    fn release(&mut self, handle: AssetHandle) {
        match self.loaded.remove(&handle) {
            Some(path) => log::debug!("Released {:?} ({})", handle, path),
            None => log::warn!("Release of unknown handle {:?}", handle),
        }
        self.released.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::colors;
    use crate::sim::Rect;

    #[test]
    fn test_exit_after_script() {
        let mut platform = HeadlessPlatform::idle(2);
        assert!(!platform.exit_requested());
        platform.poll_input();
        platform.poll_input();
        assert!(platform.exit_requested());
    }

    #[test]
    fn test_escape_requests_exit() {
        let platform = HeadlessPlatform::new([FrameInput::press(Key::Escape)]);
        assert!(platform.exit_requested());
    }

    #[test]
    fn test_frames_are_recorded_separately() {
        let mut platform = HeadlessPlatform::idle(0);
        platform.begin_frame();
        platform.canvas().rect(Rect::new(0.0, 0.0, 1.0, 1.0), colors::RED);
        platform.end_frame();
        platform.begin_frame();
        platform.end_frame();

        assert_eq!(platform.frames().len(), 2);
        assert_eq!(platform.frames()[0].len(), 1);
        assert!(platform.frames()[1].is_empty());
    }

    #[test]
    fn test_loader_tracks_handles() {
        let mut platform = HeadlessPlatform::idle(0).with_missing("gone.png");
        let tex = platform.load_texture("ball.png").unwrap();
        let sound = platform.load_sound("pong.wav").unwrap();
        assert_ne!(tex.0, sound.0);
        assert_eq!(platform.canvas().texture_size(tex), Some(DEFAULT_TEXTURE_SIZE));
        assert!(matches!(
            platform.load_texture("gone.png"),
            Err(AssetError::NotFound { .. })
        ));
        assert_eq!(platform.live_assets(), 2);
        assert_eq!(platform.path_of(sound.into()), Some("pong.wav"));

        platform.release(tex.into());
        assert_eq!(platform.live_assets(), 1);
        assert_eq!(platform.released(), &[AssetHandle::Texture(tex)]);
    }
}
