//! Native backend on macroquad
//!
//! macroquad loads assets asynchronously, so everything in a game's manifest
//! is fetched by `preload` before the loop starts. The synchronous
//! `AssetLoader` calls then hand out ids for what was fetched.

use std::collections::HashMap;
use std::path::Path;

use glam::Vec2;
use macroquad::audio::{PlaySoundParams, Sound, load_sound, play_sound, set_sound_volume, stop_sound};
use macroquad::color::Color as MqColor;
use macroquad::input::{KeyCode, is_key_down, is_key_pressed, is_quit_requested, prevent_quit};
use macroquad::shapes::{draw_circle, draw_line, draw_rectangle};
use macroquad::text::{Font, TextParams, draw_text, draw_text_ex, load_ttf_font, measure_text};
use macroquad::texture::{Texture2D, draw_texture, load_texture};
use macroquad::time::{get_fps, get_time};
use macroquad::window::{clear_background, next_frame, screen_width};

use super::{FramePacer, Platform};
use crate::assets::{AssetError, AssetHandle, AssetKind, AssetLoader, AssetRequest, FontId, MusicId, SoundId, TextureId};
use crate::audio::{Audio, AudioLevels};
use crate::game_loop::{Flow, Game, GameLoop};
use crate::input::{FrameInput, Key, KeySet};
use crate::renderer::{Canvas, Color, colors};
use crate::settings::Settings;
use crate::sim::Rect;

/// Formats macroquad's mixer can decode
const AUDIO_EXTENSIONS: [&str; 2] = ["wav", "ogg"];

/// Sleep until this close to the deadline, then spin
const SPIN_MARGIN: f64 = 0.002;

const LINE_THICKNESS: f32 = 1.0;

/// Something fetched by `preload`
enum Preloaded {
    Texture(Texture2D),
    Font(Font),
    Sound(Sound),
    Failed(AssetError),
}

/// macroquad window, input, drawing and audio
pub struct NativePlatform {
    levels: AudioLevels,
    frame_time: f64,
    frame_start: f64,
    show_fps: bool,
    cache: HashMap<String, Preloaded>,
    next_id: u32,
    textures: HashMap<TextureId, Texture2D>,
    fonts: HashMap<FontId, Font>,
    sounds: HashMap<SoundId, Sound>,
    music: HashMap<MusicId, Sound>,
}

impl NativePlatform {
    pub fn new(settings: &Settings) -> Self {
        // Window close goes through `exit_requested` so teardown still runs
        prevent_quit();
        Self {
            levels: AudioLevels::from_settings(settings),
            frame_time: settings.frame_time(),
            frame_start: get_time(),
            show_fps: settings.show_fps,
            cache: HashMap::new(),
            next_id: 0,
            textures: HashMap::new(),
            fonts: HashMap::new(),
            sounds: HashMap::new(),
            music: HashMap::new(),
        }
    }

    /// Fetch every requested asset; failures are kept and reported on load
    pub async fn preload(&mut self, requests: &[AssetRequest]) {
        for request in requests {
            let path = request.path.as_str();
            let entry = match fetch(request).await {
                Ok(entry) => entry,
                Err(e) => Preloaded::Failed(e),
            };
            if let Preloaded::Failed(e) = &entry {
                log::debug!("Preload failed: {}", e);
            }
            self.cache.insert(path.to_string(), entry);
        }
        log::info!("Preloaded {} assets", requests.len());
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn cached(&self, path: &str) -> Result<&Preloaded, AssetError> {
        match self.cache.get(path) {
            Some(Preloaded::Failed(e)) => Err(e.clone()),
            Some(entry) => Ok(entry),
            None => Err(AssetError::NotPreloaded { path: path.into() }),
        }
    }
}

async fn fetch(request: &AssetRequest) -> Result<Preloaded, AssetError> {
    let path = request.path.as_str();
    if !Path::new(path).exists() {
        return Err(AssetError::NotFound { path: path.into() });
    }
    let decode = |e: macroquad::Error| AssetError::Decode {
        path: path.into(),
        message: e.to_string(),
    };

    match request.kind {
        AssetKind::Texture => load_texture(path).await.map(Preloaded::Texture).map_err(decode),
        AssetKind::Font => load_ttf_font(path).await.map(Preloaded::Font).map_err(decode),
        AssetKind::Sound | AssetKind::Music => {
            if !has_extension(path, &AUDIO_EXTENSIONS) {
                return Err(AssetError::Unsupported {
                    path: path.into(),
                    kind: request.kind,
                });
            }
            load_sound(path).await.map(Preloaded::Sound).map_err(decode)
        }
    }
}

/// Each character of `text` as its own slice, for per-glyph spacing
fn glyphs(text: &str) -> impl Iterator<Item = &str> {
    text.char_indices().map(move |(i, ch)| &text[i..i + ch.len_utf8()])
}

fn has_extension(path: &str, allowed: &[&str]) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

fn key_code(key: Key) -> &'static [KeyCode] {
    match key {
        Key::Enter => &[KeyCode::Enter, KeyCode::KpEnter],
        Key::Space => &[KeyCode::Space],
        Key::P => &[KeyCode::P],
        Key::Left => &[KeyCode::Left],
        Key::Right => &[KeyCode::Right],
        Key::Up => &[KeyCode::Up],
        Key::Down => &[KeyCode::Down],
        Key::Escape => &[KeyCode::Escape],
    }
}

#[inline]
fn mq_color(color: Color) -> MqColor {
    MqColor::new(color[0], color[1], color[2], color[3])
}

/// Run a game in the macroquad window until it or the user quits
pub async fn run<G: Game>(game: G, settings: &Settings) -> G {
    let mut platform = NativePlatform::new(settings);
    platform.preload(&game.manifest()).await;

    let mut game_loop = GameLoop::new(game);
    game_loop.start(&mut platform);
    while game_loop.frame(&mut platform) == Flow::Continue {
        platform.wait_next_frame();
        next_frame().await;
    }
    game_loop.shutdown(&mut platform)
}

impl Platform for NativePlatform {
    fn exit_requested(&self) -> bool {
        is_quit_requested() || is_key_pressed(KeyCode::Escape)
    }

    fn poll_input(&mut self) -> FrameInput {
        let mut down = KeySet::empty();
        let mut pressed = KeySet::empty();
        for key in Key::ALL {
            let codes = key_code(key);
            if codes.iter().any(|&code| is_key_down(code)) {
                down.insert(key);
            }
            if codes.iter().any(|&code| is_key_pressed(code)) {
                pressed.insert(key);
            }
        }
        FrameInput { down, pressed }
    }

    fn begin_frame(&mut self) {}

    fn end_frame(&mut self) {
        if self.show_fps {
            draw_text(
                &format!("FPS: {}", get_fps()),
                screen_width() - 90.0,
                20.0,
                20.0,
                mq_color(colors::LIME),
            );
        }
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        self
    }

    fn audio(&mut self) -> &mut dyn Audio {
        self
    }

    fn assets(&mut self) -> &mut dyn AssetLoader {
        self
    }
}

impl FramePacer for NativePlatform {
    fn wait_next_frame(&mut self) {
        let deadline = self.frame_start + self.frame_time;
        while get_time() + SPIN_MARGIN < deadline {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        while get_time() < deadline {
            std::hint::spin_loop();
        }
        self.frame_start = get_time();
    }
}

impl Canvas for NativePlatform {
    fn clear(&mut self, color: Color) {
        clear_background(mq_color(color));
    }

    fn rect(&mut self, rect: Rect, color: Color) {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, mq_color(color));
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        draw_circle(center.x, center.y, radius, mq_color(color));
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        draw_line(from.x, from.y, to.x, to.y, LINE_THICKNESS, mq_color(color));
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        // macroquad places text by its baseline
        let dims = measure_text(text, None, size as u16, 1.0);
        draw_text(text, pos.x, pos.y + dims.offset_y, size, mq_color(color));
    }

    fn text_ex(&mut self, font: FontId, text: &str, pos: Vec2, size: f32, spacing: f32, color: Color) {
        let Some(font) = self.fonts.get(&font) else {
            self.text(text, pos, size, color);
            return;
        };
        let baseline = pos.y + measure_text(text, Some(font), size as u16, 1.0).offset_y;
        let mut x = pos.x;
        for glyph in glyphs(text) {
            draw_text_ex(
                glyph,
                x,
                baseline,
                TextParams {
                    font: Some(font),
                    font_size: size as u16,
                    color: mq_color(color),
                    ..Default::default()
                },
            );
            x += measure_text(glyph, Some(font), size as u16, 1.0).width + spacing;
        }
    }

    fn texture(&mut self, texture: TextureId, pos: Vec2, tint: Color) {
        if let Some(tex) = self.textures.get(&texture) {
            draw_texture(tex, pos.x, pos.y, mq_color(tint));
        }
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        measure_text(text, None, size as u16, 1.0).width
    }

    fn texture_size(&self, texture: TextureId) -> Option<Vec2> {
        self.textures
            .get(&texture)
            .map(|tex| Vec2::new(tex.width(), tex.height()))
    }
}

impl Audio for NativePlatform {
    fn play_sound(&mut self, sound: SoundId) {
        if let Some(sound) = self.sounds.get(&sound) {
            play_sound(
                sound,
                PlaySoundParams {
                    looped: false,
                    volume: self.levels.sfx(),
                },
            );
        }
    }

    fn play_music(&mut self, music: MusicId) {
        if let Some(music) = self.music.get(&music) {
            play_sound(
                music,
                PlaySoundParams {
                    looped: true,
                    volume: self.levels.music(),
                },
            );
        }
    }

    fn update_music(&mut self, music: MusicId) {
        // The mixer streams by itself; only the volume can change between frames
        if let Some(music) = self.music.get(&music) {
            set_sound_volume(music, self.levels.music());
        }
    }

    fn stop_music(&mut self, music: MusicId) {
        if let Some(music) = self.music.get(&music) {
            stop_sound(music);
        }
    }
}

impl AssetLoader for NativePlatform {
    fn load_texture(&mut self, path: &str) -> Result<TextureId, AssetError> {
        let Preloaded::Texture(tex) = self.cached(path)? else {
            return Err(AssetError::Unsupported {
                path: path.into(),
                kind: AssetKind::Texture,
            });
        };
        let tex = tex.clone();
        let id = TextureId(self.next());
        self.textures.insert(id, tex);
        Ok(id)
    }

    fn load_font(&mut self, path: &str) -> Result<FontId, AssetError> {
        let Preloaded::Font(font) = self.cached(path)? else {
            return Err(AssetError::Unsupported {
                path: path.into(),
                kind: AssetKind::Font,
            });
        };
        let font = font.clone();
        let id = FontId(self.next());
        self.fonts.insert(id, font);
        Ok(id)
    }

    fn load_sound(&mut self, path: &str) -> Result<SoundId, AssetError> {
        let Preloaded::Sound(sound) = self.cached(path)? else {
            return Err(AssetError::Unsupported {
                path: path.into(),
                kind: AssetKind::Sound,
            });
        };
        let sound = sound.clone();
        let id = SoundId(self.next());
        self.sounds.insert(id, sound);
        Ok(id)
    }

    fn load_music(&mut self, path: &str) -> Result<MusicId, AssetError> {
        let Preloaded::Sound(sound) = self.cached(path)? else {
            return Err(AssetError::Unsupported {
                path: path.into(),
                kind: AssetKind::Music,
            });
        };
        let sound = sound.clone();
        let id = MusicId(self.next());
        self.music.insert(id, sound);
        Ok(id)
    }

    fn release(&mut self, handle: AssetHandle) {
        let released = match handle {
            AssetHandle::Texture(id) => self.textures.remove(&id).is_some(),
            AssetHandle::Font(id) => self.fonts.remove(&id).is_some(),
            AssetHandle::Sound(id) => self.sounds.remove(&id).is_some(),
            AssetHandle::Music(id) => self.music.remove(&id).is_some(),
        };
        if !released {
            log::warn!("Release of unknown handle {:?}", handle);
        }
    }
}
