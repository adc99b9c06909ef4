//! Browser backend
//!
//! Draws with the canvas 2D context, plays audio through `<audio>` elements
//! and lets `requestAnimationFrame` drive the loop. All loop state sits in a
//! `WebContext` captured by the callback; nothing is global.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, FontFace, HtmlAudioElement, HtmlCanvasElement, HtmlImageElement};

use super::Platform;
use crate::assets::{AssetError, AssetHandle, AssetKind, AssetLoader, FontId, MusicId, SoundId, TextureId};
use crate::audio::{Audio, AudioLevels};
use crate::game_loop::{Flow, FrameClock, Game, GameLoop};
use crate::input::{FrameInput, Key, KeyTracker};
use crate::renderer::{Canvas, Color, colors};
use crate::settings::Settings;
use crate::sim::Rect;

/// Formats every mainstream browser decodes
const AUDIO_EXTENSIONS: [&str; 3] = ["wav", "ogg", "mp3"];

const DEFAULT_FONT: &str = "sans-serif";

/// Map a `KeyboardEvent.key` value
fn dom_key(key: &str) -> Option<Key> {
    match key {
        "Enter" => Some(Key::Enter),
        " " => Some(Key::Space),
        "p" | "P" => Some(Key::P),
        "ArrowLeft" => Some(Key::Left),
        "ArrowRight" => Some(Key::Right),
        "ArrowUp" => Some(Key::Up),
        "ArrowDown" => Some(Key::Down),
        "Escape" => Some(Key::Escape),
        _ => None,
    }
}

fn has_extension(path: &str, allowed: &[&str]) -> bool {
    path.rsplit_once('.')
        .is_some_and(|(_, ext)| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

/// Canvas 2D, `<audio>` and keyboard events
pub struct WebPlatform {
    document: Document,
    ctx: CanvasRenderingContext2d,
    keys: Rc<RefCell<KeyTracker>>,
    blurred: Rc<Cell<bool>>,
    mute_on_blur: bool,
    levels: AudioLevels,
    show_fps: bool,
    fps: f64,
    next_id: u32,
    images: HashMap<TextureId, HtmlImageElement>,
    fonts: HashMap<FontId, String>,
    sounds: HashMap<SoundId, HtmlAudioElement>,
    music: HashMap<MusicId, HtmlAudioElement>,
}

impl WebPlatform {
    pub fn new(document: Document, ctx: CanvasRenderingContext2d, settings: &Settings) -> Self {
        ctx.set_text_baseline("top");
        Self {
            document,
            ctx,
            keys: Rc::new(RefCell::new(KeyTracker::default())),
            blurred: Rc::new(Cell::new(false)),
            mute_on_blur: settings.mute_on_blur,
            levels: AudioLevels::from_settings(settings),
            show_fps: settings.show_fps,
            fps: 0.0,
            next_id: 0,
            images: HashMap::new(),
            fonts: HashMap::new(),
            sounds: HashMap::new(),
            music: HashMap::new(),
        }
    }

    /// Keyboard and focus listeners feeding the shared key tracker
    fn setup_input_handlers(&self, window: &web_sys::Window) {
        // Key down
        {
            let keys = self.keys.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(key) = dom_key(&event.key()) {
                    // Arrows and space would scroll the page
                    event.prevent_default();
                    keys.borrow_mut().key_down(key);
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let keys = self.keys.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(key) = dom_key(&event.key()) {
                    keys.borrow_mut().key_up(key);
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside, tab switch)
        {
            let keys = self.keys.clone();
            let blurred = self.blurred.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                keys.borrow_mut().reset();
                blurred.set(true);
                log::info!("Window lost focus");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus
        {
            let blurred = self.blurred.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                blurred.set(false);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn set_fill(&self, color: Color) {
        self.ctx.set_fill_style_str(&colors::to_css(color));
    }

    fn audio_element(&self, path: &str, kind: AssetKind) -> Result<HtmlAudioElement, AssetError> {
        if !has_extension(path, &AUDIO_EXTENSIONS) {
            return Err(AssetError::Unsupported { path: path.into(), kind });
        }
        HtmlAudioElement::new_with_src(path).map_err(|e| AssetError::Decode {
            path: path.into(),
            message: format!("{:?}", e),
        })
    }
}

impl Platform for WebPlatform {
    fn exit_requested(&self) -> bool {
        self.keys.borrow().is_pressed(Key::Escape)
    }

    fn poll_input(&mut self) -> FrameInput {
        if self.mute_on_blur {
            self.levels.set_muted(self.blurred.get());
        }
        self.keys.borrow_mut().take_frame()
    }

    fn begin_frame(&mut self) {
        self.ctx.set_global_alpha(1.0);
    }

    fn end_frame(&mut self) {
        if self.show_fps {
            self.text(&format!("FPS: {:.0}", self.fps), Vec2::new(10.0, 10.0), 20.0, colors::LIME);
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

impl Canvas for WebPlatform {
    fn clear(&mut self, color: Color) {
        let Some(canvas) = self.ctx.canvas() else {
            return;
        };
        self.set_fill(color);
        self.ctx.fill_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
    }

    fn rect(&mut self, rect: Rect, color: Color) {
        self.set_fill(color);
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.set_fill(color);
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.fill();
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.ctx.set_stroke_style_str(&colors::to_css(color));
        self.ctx.set_line_width(1.0);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.set_fill(color);
        self.ctx.set_font(&format!("{}px {}", size, DEFAULT_FONT));
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }

    fn text_ex(&mut self, font: FontId, text: &str, pos: Vec2, size: f32, spacing: f32, color: Color) {
        let Some(family) = self.fonts.get(&font) else {
            self.text(text, pos, size, color);
            return;
        };
        self.set_fill(color);
        self.ctx.set_font(&format!("{}px \"{}\", {}", size, family, DEFAULT_FONT));
        let mut x = pos.x as f64;
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let glyph = ch.encode_utf8(&mut buf);
            let _ = self.ctx.fill_text(glyph, x, pos.y as f64);
            let advance = self.ctx.measure_text(glyph).map(|m| m.width()).unwrap_or(0.0);
            x += advance + spacing as f64;
        }
    }

    /// Canvas 2D cannot multiply colors; only the tint's alpha applies
    fn texture(&mut self, texture: TextureId, pos: Vec2, tint: Color) {
        if let Some(image) = self.images.get(&texture) {
            self.ctx.set_global_alpha(tint[3] as f64);
            let _ = self
                .ctx
                .draw_image_with_html_image_element(image, pos.x as f64, pos.y as f64);
            self.ctx.set_global_alpha(1.0);
        }
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        self.ctx.set_font(&format!("{}px {}", size, DEFAULT_FONT));
        self.ctx
            .measure_text(text)
            .map(|m| m.width() as f32)
            .unwrap_or(0.0)
    }

    fn texture_size(&self, texture: TextureId) -> Option<Vec2> {
        let image = self.images.get(&texture)?;
        // Still downloading
        if !image.complete() || image.natural_width() == 0 {
            return None;
        }
        Some(Vec2::new(image.natural_width() as f32, image.natural_height() as f32))
    }
}

impl Audio for WebPlatform {
    fn play_sound(&mut self, sound: SoundId) {
        if let Some(element) = self.sounds.get(&sound) {
            element.set_current_time(0.0);
            element.set_volume(self.levels.sfx() as f64);
            // Rejected until the first user gesture; nothing to do about it
            let _ = element.play();
        }
    }

    fn play_music(&mut self, music: MusicId) {
        if let Some(element) = self.music.get(&music) {
            element.set_loop(true);
            element.set_volume(self.levels.music() as f64);
            let _ = element.play();
        }
    }

    fn update_music(&mut self, music: MusicId) {
        if let Some(element) = self.music.get(&music) {
            element.set_volume(self.levels.music() as f64);
            // Autoplay may have blocked the first attempt
            if element.paused() && !self.levels.is_muted() {
                let _ = element.play();
            }
        }
    }

    fn stop_music(&mut self, music: MusicId) {
        if let Some(element) = self.music.get(&music) {
            let _ = element.pause();
            element.set_current_time(0.0);
        }
    }
}

impl AssetLoader for WebPlatform {
    fn load_texture(&mut self, path: &str) -> Result<TextureId, AssetError> {
        let image = HtmlImageElement::new().map_err(|e| AssetError::Decode {
            path: path.into(),
            message: format!("{:?}", e),
        })?;
        image.set_src(path);
        let id = TextureId(self.next());
        self.images.insert(id, image);
        Ok(id)
    }

    fn load_font(&mut self, path: &str) -> Result<FontId, AssetError> {
        let id = FontId(self.next());
        let family = format!("arcade-font-{}", id.0);
        let face = FontFace::new_with_str(&family, &format!("url({})", path)).map_err(|e| AssetError::Decode {
            path: path.into(),
            message: format!("{:?}", e),
        })?;
        let _ = self.document.fonts().add(&face);
        // Text falls back to the default family until this resolves
        let _ = face.load();
        self.fonts.insert(id, family);
        Ok(id)
    }

    fn load_sound(&mut self, path: &str) -> Result<SoundId, AssetError> {
        let element = self.audio_element(path, AssetKind::Sound)?;
        let id = SoundId(self.next());
        self.sounds.insert(id, element);
        Ok(id)
    }

    fn load_music(&mut self, path: &str) -> Result<MusicId, AssetError> {
        let element = self.audio_element(path, AssetKind::Music)?;
        let id = MusicId(self.next());
        self.music.insert(id, element);
        Ok(id)
    }

    fn release(&mut self, handle: AssetHandle) {
        match handle {
            AssetHandle::Texture(id) => {
                if let Some(image) = self.images.remove(&id) {
                    image.set_src("");
                }
            }
            AssetHandle::Font(id) => {
                self.fonts.remove(&id);
            }
            AssetHandle::Sound(id) => {
                if let Some(element) = self.sounds.remove(&id) {
                    let _ = element.pause();
                }
            }
            AssetHandle::Music(id) => {
                if let Some(element) = self.music.remove(&id) {
                    let _ = element.pause();
                }
            }
        }
    }
}

/// Everything the animation-frame callback needs between calls
struct WebContext<G: Game> {
    game_loop: Option<GameLoop<G>>,
    platform: WebPlatform,
    clock: FrameClock,
    last_time: f64,
}

impl<G: Game> WebContext<G> {
    /// One animation frame; false once the loop has ended
    fn step(&mut self, time_ms: f64) -> bool {
        let now = time_ms / 1000.0;
        if !self.clock.tick(now) {
            return true;
        }
        if self.last_time > 0.0 {
            self.platform.fps = 1.0 / (now - self.last_time).max(f64::EPSILON);
        }
        self.last_time = now;

        let Some(game_loop) = self.game_loop.as_mut() else {
            return false;
        };
        if game_loop.frame(&mut self.platform) == Flow::Continue {
            return true;
        }
        if let Some(game_loop) = self.game_loop.take() {
            game_loop.shutdown(&mut self.platform);
        }
        false
    }
}

/// Start a game on the page's `#canvas` element
pub fn run<G: Game + 'static>(game: G, settings: &Settings) -> Result<(), JsValue> {
    let window = web_sys::window().expect("no window");
    let document = window.document().expect("no document");

    let canvas = document
        .get_element_by_id("canvas")
        .ok_or_else(|| JsValue::from_str("no #canvas element"))?
        .dyn_into::<HtmlCanvasElement>()?;
    let size = game.screen_size();
    canvas.set_width(size.x as u32);
    canvas.set_height(size.y as u32);
    document.set_title(game.title());

    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let mut platform = WebPlatform::new(document, ctx, settings);
    platform.setup_input_handlers(&window);

    let mut game_loop = GameLoop::new(game);
    game_loop.start(&mut platform);

    let context = Rc::new(RefCell::new(WebContext {
        game_loop: Some(game_loop),
        platform,
        clock: FrameClock::new(settings.frame_time()),
        last_time: 0.0,
    }));
    request_animation_frame(context);
    Ok(())
}

fn request_animation_frame<G: Game + 'static>(context: Rc<RefCell<WebContext<G>>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        on_animation_frame(context, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn on_animation_frame<G: Game + 'static>(context: Rc<RefCell<WebContext<G>>>, time: f64) {
    let running = context.borrow_mut().step(time);
    if running {
        request_animation_frame(context);
    } else {
        log::info!("Game loop ended");
    }
}
