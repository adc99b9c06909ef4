//! Pong: player vs a vision-range AI on the four-screen machine

use glam::Vec2;

use crate::assets::{
    AssetKind, AssetLoader, AssetRequest, FontId, MusicId, SoundId, TextureId, optional, release_opt,
};
use crate::audio::Audio;
use crate::consts::PONG_TITLE;
use crate::game_loop::{Flow, Game};
use crate::input::{FrameInput, Key};
use crate::renderer::{Canvas, colors, text_centered, texture_centered};
use crate::screen::{Screen, ScreenState};
use crate::sim::pong::{self, PongEvent, PongInput, PongSession};
use crate::sim::Rect;
use crate::tuning::{EndingAction, PongTuning};

/// The logo sits this far above the screen centre
const LOGO_LIFT: f32 = 40.0;

#[derive(Debug, Default)]
struct PongAssets {
    logo: Option<TextureId>,
    title_font: Option<FontId>,
    start: Option<SoundId>,
    bounce: Option<SoundId>,
    music: Option<MusicId>,
}

impl PongAssets {
    fn load(loader: &mut dyn AssetLoader, tuning: &PongTuning) -> Self {
        let paths = &tuning.assets;
        Self {
            logo: optional(loader.load_texture(&paths.logo)),
            title_font: optional(loader.load_font(&paths.title_font)),
            start: optional(loader.load_sound(&paths.start_sound)),
            bounce: optional(loader.load_sound(&paths.bounce_sound)),
            music: optional(loader.load_music(&paths.music)),
        }
    }

    fn release(self, loader: &mut dyn AssetLoader) {
        release_opt(loader, self.logo);
        release_opt(loader, self.title_font);
        release_opt(loader, self.start);
        release_opt(loader, self.bounce);
        release_opt(loader, self.music);
    }
}

/// Pong game state
#[derive(Debug)]
pub struct PongGame {
    tuning: PongTuning,
    state: ScreenState,
    session: PongSession,
    assets: PongAssets,
}

impl PongGame {
    pub fn new(tuning: PongTuning) -> Self {
        Self {
            session: PongSession::new(&tuning),
            state: ScreenState::new(),
            assets: PongAssets::default(),
            tuning,
        }
    }

    pub fn session(&self) -> &PongSession {
        &self.session
    }

    pub fn screen_state(&self) -> &ScreenState {
        &self.state
    }

    fn play(audio: &mut dyn Audio, sound: Option<SoundId>) {
        if let Some(sound) = sound {
            audio.play_sound(sound);
        }
    }

    // === Update handlers ===

    fn update_logo(&mut self) {
        if self.tuning.logo.finished(self.state.frames) {
            self.state.transition(Screen::Title);
        }
    }

    fn update_title(&mut self, input: &FrameInput, audio: &mut dyn Audio) {
        if input.is_pressed(Key::Enter) {
            Self::play(audio, self.assets.start);
            self.state.transition(Screen::Gameplay);
        }
    }

    fn update_gameplay(&mut self, input: &FrameInput, audio: &mut dyn Audio) {
        let commands = PongInput {
            up: input.is_down(Key::Up),
            down: input.is_down(Key::Down),
            vision_left: input.is_down(Key::Left),
            vision_right: input.is_down(Key::Right),
            pause: input.is_pressed(Key::P),
        };

        for event in pong::tick(&mut self.session, &commands, &self.tuning) {
            match event {
                PongEvent::WallBounce | PongEvent::PaddleHit => Self::play(audio, self.assets.bounce),
                PongEvent::Goal(_) => {}
            }
        }

        if input.is_pressed(Key::Enter) {
            self.state.transition(Screen::Ending);
        }
    }

    fn update_ending(&mut self, input: &FrameInput) -> Flow {
        if !input.is_pressed(Key::Enter) {
            return Flow::Continue;
        }
        match self.tuning.ending {
            EndingAction::Replay => {
                self.session = PongSession::new(&self.tuning);
                log::info!("Pong session reset");
                self.state.transition(Screen::Title);
                Flow::Continue
            }
            EndingAction::Exit => {
                log::info!("Pong finished: {:04} - {:04}", self.session.player_score, self.session.enemy_score);
                Flow::Exit
            }
        }
    }

    // === Draw handlers ===

    fn draw_logo(&self, canvas: &mut dyn Canvas) {
        let alpha = self.tuning.logo.alpha(self.state.frames);
        let center = self.tuning.screen_size() / 2.0 - Vec2::new(0.0, LOGO_LIFT);
        match self.assets.logo {
            Some(logo) => texture_centered(canvas, logo, center, colors::fade(colors::WHITE, alpha)),
            None => text_centered(
                canvas,
                "raylib",
                center.x,
                center.y,
                50.0,
                colors::fade(colors::BLACK, alpha),
            ),
        }
    }

    fn draw_title(&self, canvas: &mut dyn Canvas) {
        let pos = Vec2::new(200.0, 100.0);
        match self.assets.title_font {
            Some(font) => canvas.text_ex(font, PONG_TITLE, pos, 64.0, 4.0, colors::LIME),
            None => canvas.text(PONG_TITLE, pos, 64.0, colors::LIME),
        }
        if self.state.blink_on(false) {
            canvas.text("PRESS ENTER to START", Vec2::new(200.0, 300.0), 30.0, colors::BLACK);
        }
    }

    fn draw_gameplay(&self, canvas: &mut dyn Canvas) {
        let screen = self.tuning.screen_size();
        let session = &self.session;

        canvas.circle(session.ball.pos, session.ball.radius, colors::RED);
        canvas.rect(session.player.bounds, colors::BLUE);
        canvas.rect(session.enemy.bounds, colors::DARK_GREEN);
        canvas.line(
            Vec2::new(session.vision_range, 0.0),
            Vec2::new(session.vision_range, screen.y),
            colors::GRAY,
        );

        // HUD
        canvas.text(
            &format!("{:04}", session.player_score),
            Vec2::new(100.0, 10.0),
            30.0,
            colors::BLUE,
        );
        canvas.text(
            &format!("{:04}", session.enemy_score),
            Vec2::new(screen.x - 200.0, 10.0),
            30.0,
            colors::DARK_GREEN,
        );

        if session.paused {
            canvas.rect(
                Rect::from_pos_size(Vec2::ZERO, screen),
                colors::fade(colors::WHITE, 0.8),
            );
            canvas.text("GAME PAUSED", Vec2::new(320.0, 200.0), 30.0, colors::RED);
        }
    }

    fn draw_ending(&self, canvas: &mut dyn Canvas) {
        let screen = self.tuning.screen_size();
        canvas.rect(Rect::from_pos_size(Vec2::ZERO, screen), colors::RED);
        canvas.text("SCREEN ENDING", Vec2::new(10.0, 10.0), 30.0, colors::MAROON);
    }
}

impl Game for PongGame {
    fn title(&self) -> &'static str {
        PONG_TITLE
    }

    fn screen_size(&self) -> Vec2 {
        self.tuning.screen_size()
    }

    fn screen(&self) -> Screen {
        self.state.screen
    }

    fn manifest(&self) -> Vec<AssetRequest> {
        let paths = &self.tuning.assets;
        vec![
            AssetRequest::new(AssetKind::Texture, &paths.logo),
            AssetRequest::new(AssetKind::Font, &paths.title_font),
            AssetRequest::new(AssetKind::Sound, &paths.start_sound),
            AssetRequest::new(AssetKind::Sound, &paths.bounce_sound),
            AssetRequest::new(AssetKind::Music, &paths.music),
        ]
    }

    fn load(&mut self, loader: &mut dyn AssetLoader) {
        self.assets = PongAssets::load(loader, &self.tuning);
    }

    fn start(&mut self, audio: &mut dyn Audio) {
        if let Some(music) = self.assets.music {
            audio.play_music(music);
        }
    }

    fn stop(&mut self, audio: &mut dyn Audio) {
        if let Some(music) = self.assets.music {
            audio.stop_music(music);
        }
    }

    fn release(&mut self, loader: &mut dyn AssetLoader) {
        std::mem::take(&mut self.assets).release(loader);
    }

    fn update(&mut self, input: &FrameInput, audio: &mut dyn Audio) -> Flow {
        if let Some(music) = self.assets.music {
            audio.update_music(music);
        }

        self.state.tick();
        match self.state.screen {
            Screen::Logo => self.update_logo(),
            Screen::Title => self.update_title(input, audio),
            Screen::Gameplay => self.update_gameplay(input, audio),
            Screen::Ending => return self.update_ending(input),
        }
        Flow::Continue
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear(colors::BACKGROUND);
        match self.state.screen {
            Screen::Logo => self.draw_logo(canvas),
            Screen::Title => self.draw_title(canvas),
            Screen::Gameplay => self.draw_gameplay(canvas),
            Screen::Ending => self.draw_ending(canvas),
        }
    }
}
