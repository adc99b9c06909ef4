//! Blocks: Breakout on the four-screen machine

use glam::Vec2;

use crate::assets::{AssetKind, AssetLoader, AssetRequest, TextureId, optional, release_opt};
use crate::audio::Audio;
use crate::consts::BLOCKS_TITLE;
use crate::game_loop::{Flow, Game};
use crate::input::{FrameInput, Key};
use crate::renderer::{Canvas, colors, text_centered, texture_centered};
use crate::screen::{Screen, ScreenState};
use crate::sim::blocks::{self, BlocksEvent, BlocksInput, BlocksSession, GameResult};
use crate::sim::Rect;
use crate::tuning::{BlocksTuning, DrawStyle, EndingAction};

/// Loaded textures; any of them may be missing
#[derive(Debug, Default)]
struct BlocksAssets {
    logo: Option<TextureId>,
    ball: Option<TextureId>,
    paddle: Option<TextureId>,
    brick: Option<TextureId>,
}

impl BlocksAssets {
    fn load(loader: &mut dyn AssetLoader, tuning: &BlocksTuning) -> Self {
        let paths = &tuning.assets;
        let mut assets = Self {
            logo: optional(loader.load_texture(&paths.logo)),
            ..Default::default()
        };
        // Gameplay textures are only needed for the textured style
        if tuning.draw_style == DrawStyle::Textures {
            assets.ball = optional(loader.load_texture(&paths.ball));
            assets.paddle = optional(loader.load_texture(&paths.paddle));
            assets.brick = optional(loader.load_texture(&paths.brick));
        }
        assets
    }

    fn release(self, loader: &mut dyn AssetLoader) {
        release_opt(loader, self.logo);
        release_opt(loader, self.ball);
        release_opt(loader, self.paddle);
        release_opt(loader, self.brick);
    }
}

/// Breakout game state
#[derive(Debug)]
pub struct BlocksGame {
    tuning: BlocksTuning,
    state: ScreenState,
    session: BlocksSession,
    assets: BlocksAssets,
}

impl BlocksGame {
    pub fn new(tuning: BlocksTuning) -> Self {
        Self {
            session: BlocksSession::new(&tuning),
            state: ScreenState::new(),
            assets: BlocksAssets::default(),
            tuning,
        }
    }

    pub fn session(&self) -> &BlocksSession {
        &self.session
    }

    pub fn screen_state(&self) -> &ScreenState {
        &self.state
    }

    fn reset_session(&mut self) {
        self.session = BlocksSession::new(&self.tuning);
        log::info!("Blocks session reset");
    }

    // === Update handlers ===

    fn update_logo(&mut self) {
        if self.tuning.logo.finished(self.state.frames) {
            self.state.transition(Screen::Title);
        }
    }

    fn update_title(&mut self, input: &FrameInput) {
        if input.is_pressed(Key::Enter) {
            self.state.transition(Screen::Gameplay);
        }
    }

    fn update_gameplay(&mut self, input: &FrameInput) {
        let commands = BlocksInput {
            left: input.is_down(Key::Left),
            right: input.is_down(Key::Right),
            serve: input.is_pressed(Key::Space),
            pause: input.is_pressed(Key::P),
        };

        let events = blocks::tick(&mut self.session, &commands, &self.tuning);
        let run_over = events.iter().any(|e| matches!(e, BlocksEvent::RunOver(_)));

        if run_over || input.is_pressed(Key::Enter) {
            self.state.transition(Screen::Ending);
        }
    }

    fn update_ending(&mut self, input: &FrameInput) -> Flow {
        if !input.is_pressed(Key::Enter) {
            return Flow::Continue;
        }
        match self.tuning.ending {
            EndingAction::Replay => {
                self.reset_session();
                self.state.transition(Screen::Title);
                Flow::Continue
            }
            EndingAction::Exit => Flow::Exit,
        }
    }

    // === Draw handlers ===

    fn draw_logo(&self, canvas: &mut dyn Canvas) {
        let center = self.tuning.screen_size() / 2.0;
        match self.assets.logo {
            Some(logo) => texture_centered(canvas, logo, center, colors::WHITE),
            None => canvas.text("LOGO SCREEN", Vec2::new(20.0, 20.0), 40.0, colors::LIGHT_GRAY),
        }
    }

    fn draw_title(&self, canvas: &mut dyn Canvas) {
        let screen = self.tuning.screen_size();
        canvas.text("TITLE SCREEN", Vec2::new(20.0, 20.0), 40.0, colors::DARK_GREEN);
        if self.state.blink_on(true) {
            text_centered(
                canvas,
                "PRESS [ENTER] to START",
                screen.x / 2.0,
                screen.y / 2.0 + 60.0,
                20.0,
                colors::DARK_GRAY,
            );
        }
    }

    fn draw_gameplay(&self, canvas: &mut dyn Canvas) {
        let screen = self.tuning.screen_size();
        let session = &self.session;
        let textured = self.tuning.draw_style == DrawStyle::Textures;

        // Paddle
        match self.assets.paddle.filter(|_| textured) {
            Some(tex) => canvas.texture(tex, session.paddle.bounds.pos(), colors::WHITE),
            None => canvas.rect(session.paddle.bounds, colors::BLACK),
        }

        // Ball
        let ball = &session.ball;
        match self.assets.ball.filter(|_| textured) {
            Some(tex) => texture_centered(canvas, tex, ball.pos, colors::MAROON),
            None => canvas.circle(ball.pos, ball.radius, colors::MAROON),
        }

        // Bricks, checkerboard tint
        let brick_tex = self.assets.brick.filter(|_| textured);
        for (row, col, brick) in session.bricks.iter_active() {
            let tint = if (row + col) % 2 == 0 {
                colors::GRAY
            } else {
                colors::DARK_GRAY
            };
            match brick_tex {
                Some(tex) => canvas.texture(tex, brick.bounds.pos(), tint),
                None => canvas.rect(brick.bounds, tint),
            }
        }

        // Lives
        for i in 0..session.lives.max(0) {
            canvas.rect(
                Rect::new(20.0 + 40.0 * i as f32, screen.y - 30.0, 35.0, 10.0),
                colors::LIGHT_GRAY,
            );
        }

        if session.paused {
            text_centered(
                canvas,
                "GAME PAUSED",
                screen.x / 2.0,
                screen.y / 2.0 + 60.0,
                40.0,
                colors::GRAY,
            );
        }
    }

    fn draw_ending(&self, canvas: &mut dyn Canvas) {
        let screen = self.tuning.screen_size();
        canvas.text("ENDING SCREEN", Vec2::new(20.0, 20.0), 40.0, colors::DARK_BLUE);

        let verdict = match self.session.result {
            GameResult::Win => Some(("YOU WIN!", colors::DARK_GREEN)),
            GameResult::Loss => Some(("GAME OVER", colors::MAROON)),
            GameResult::Undefined => None,
        };
        if let Some((text, color)) = verdict {
            text_centered(canvas, text, screen.x / 2.0, screen.y / 2.0 - 20.0, 40.0, color);
        }

        if self.state.blink_on(true) {
            let prompt = match self.tuning.ending {
                EndingAction::Replay => "PRESS [ENTER] TO PLAY AGAIN",
                EndingAction::Exit => "PRESS [ENTER] TO EXIT",
            };
            text_centered(canvas, prompt, screen.x / 2.0, screen.y / 2.0 + 80.0, 20.0, colors::GRAY);
        }
    }
}

impl Game for BlocksGame {
    fn title(&self) -> &'static str {
        BLOCKS_TITLE
    }

    fn screen_size(&self) -> Vec2 {
        self.tuning.screen_size()
    }

    fn screen(&self) -> Screen {
        self.state.screen
    }

    fn manifest(&self) -> Vec<AssetRequest> {
        let paths = &self.tuning.assets;
        let mut requests = vec![AssetRequest::new(AssetKind::Texture, &paths.logo)];
        if self.tuning.draw_style == DrawStyle::Textures {
            requests.extend(
                [&paths.ball, &paths.paddle, &paths.brick]
                    .into_iter()
                    .map(|path| AssetRequest::new(AssetKind::Texture, path)),
            );
        }
        requests
    }

    fn load(&mut self, loader: &mut dyn AssetLoader) {
        self.assets = BlocksAssets::load(loader, &self.tuning);
    }

    fn release(&mut self, loader: &mut dyn AssetLoader) {
        std::mem::take(&mut self.assets).release(loader);
    }

    fn update(&mut self, input: &FrameInput, _audio: &mut dyn Audio) -> Flow {
        self.state.tick();
        match self.state.screen {
            Screen::Logo => self.update_logo(),
            Screen::Title => self.update_title(input),
            Screen::Gameplay => self.update_gameplay(input),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_loop::GameLoop;
    use crate::platform::{HeadlessPlatform, Platform};
    use crate::renderer::{DrawCommand, DrawList};
    use crate::sim::Ball;

    fn press(key: Key) -> FrameInput {
        FrameInput::press(key)
    }

    /// A game already past Logo and Title
    fn in_gameplay(tuning: BlocksTuning) -> BlocksGame {
        let mut game = BlocksGame::new(tuning);
        game.state.transition(Screen::Gameplay);
        game
    }

    fn step(game: &mut BlocksGame, input: FrameInput) -> Flow {
        let mut platform = HeadlessPlatform::idle(0);
        game.update(&input, platform.audio())
    }

    fn drawn(game: &BlocksGame) -> DrawList {
        let mut list = DrawList::new();
        game.draw(&mut list);
        list
    }

    #[test]
    fn test_logo_lasts_181_updates() {
        let mut platform = HeadlessPlatform::idle(181);
        let game = GameLoop::new(BlocksGame::new(BlocksTuning::default())).run(&mut platform);

        assert_eq!(game.screen(), Screen::Title);
        assert_eq!(game.screen_state().frames, 0);
        // The 180th update still draws the logo
        assert!(platform.frames()[179].textures().next().is_some());
        assert!(platform.frames()[180].has_text("TITLE SCREEN"));
    }

    #[test]
    fn test_logo_stays_at_threshold() {
        let mut platform = HeadlessPlatform::idle(180);
        let game = GameLoop::new(BlocksGame::new(BlocksTuning::default())).run(&mut platform);
        assert_eq!(game.screen(), Screen::Logo);
        assert_eq!(game.screen_state().frames, 180);
    }

    #[test]
    fn test_same_inputs_same_screens() {
        let script: Vec<FrameInput> = (0..400)
            .map(|i| match i {
                185 => press(Key::Enter),
                190 => press(Key::Space),
                i if i % 7 == 0 => FrameInput::hold(&[Key::Left]),
                i if i % 5 == 0 => FrameInput::hold(&[Key::Right]),
                _ => FrameInput::default(),
            })
            .collect();

        let run = |script: Vec<FrameInput>| {
            let mut platform = HeadlessPlatform::new(script);
            let game = GameLoop::new(BlocksGame::new(BlocksTuning::default())).run(&mut platform);
            (game.screen(), game.session().clone(), platform.frames().len())
        };

        let a = run(script.clone());
        let b = run(script);
        assert_eq!(a, b);
        assert_eq!(a.0, Screen::Gameplay);
    }

    #[test]
    fn test_title_enter_starts_gameplay() {
        let mut game = BlocksGame::new(BlocksTuning::default());
        game.state.transition(Screen::Title);
        step(&mut game, FrameInput::hold(&[Key::Enter]));
        assert_eq!(game.screen(), Screen::Title);
        step(&mut game, press(Key::Enter));
        assert_eq!(game.screen(), Screen::Gameplay);
    }

    #[test]
    fn test_title_prompt_blinks() {
        let mut game = BlocksGame::new(BlocksTuning::default());
        game.state.transition(Screen::Title);
        assert!(drawn(&game).has_text("PRESS [ENTER] to START"));
        game.state.frames = 30;
        assert!(!drawn(&game).has_text("PRESS [ENTER] to START"));
        game.state.frames = 60;
        assert!(drawn(&game).has_text("PRESS [ENTER] to START"));
    }

    #[test]
    fn test_lives_exhausted_goes_to_ending() {
        let tuning = BlocksTuning {
            lives: 0,
            ..Default::default()
        };
        let mut game = in_gameplay(tuning);
        step(&mut game, press(Key::Space));

        // Drop the ball just above the bottom edge
        game.session.ball.pos = Vec2::new(400.0, 445.0);
        game.session.ball.vel = Vec2::new(0.0, 5.0);
        step(&mut game, FrameInput::default());

        assert_eq!(game.screen(), Screen::Ending);
        assert_eq!(game.session.result, GameResult::Loss);
        assert_eq!(game.session.lives, 0);
        assert!(drawn(&game).has_text("GAME OVER"));
    }

    #[test]
    fn test_enter_ends_gameplay() {
        let mut game = in_gameplay(BlocksTuning::default());
        step(&mut game, press(Key::Enter));
        assert_eq!(game.screen(), Screen::Ending);
        assert_eq!(game.session.result, GameResult::Undefined);
    }

    #[test]
    fn test_replay_resets_session() {
        let mut game = in_gameplay(BlocksTuning::default());
        step(&mut game, press(Key::Space));
        for _ in 0..10 {
            step(&mut game, FrameInput::hold(&[Key::Left]));
        }
        step(&mut game, press(Key::Enter));
        assert_eq!(game.screen(), Screen::Ending);

        assert_eq!(step(&mut game, press(Key::Enter)), Flow::Continue);
        assert_eq!(game.screen(), Screen::Title);
        assert_eq!(game.session, BlocksSession::new(&game.tuning));
    }

    #[test]
    fn test_exit_ending() {
        let tuning = BlocksTuning {
            ending: EndingAction::Exit,
            ..Default::default()
        };
        let mut game = in_gameplay(tuning);
        step(&mut game, press(Key::Enter));
        assert!(drawn(&game).has_text("PRESS [ENTER] TO EXIT"));
        assert_eq!(step(&mut game, press(Key::Enter)), Flow::Exit);
    }

    #[test]
    fn test_cleared_row_draws_nothing() {
        let tuning = BlocksTuning {
            draw_style: DrawStyle::Shapes,
            ..Default::default()
        };
        let mut game = in_gameplay(tuning);
        let row_top = game.tuning.bricks_top;
        let row_bottom = row_top + game.tuning.brick_height;

        let before = drawn(&game)
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { rect, .. } if rect.y == row_top))
            .count();
        assert_eq!(before, game.tuning.bricks_per_row);

        let centers: Vec<Vec2> = game.session.bricks.row(0).iter().map(|b| b.bounds.center()).collect();
        for center in centers {
            let probe = Ball::new(center, Vec2::ZERO, 1.0);
            assert!(game.session.bricks.break_first_hit(&probe).is_some());
        }

        let list = drawn(&game);
        let in_row = list
            .commands()
            .iter()
            .filter(|c| match c {
                DrawCommand::Rect { rect, .. } => rect.y >= row_top && rect.y < row_bottom,
                _ => false,
            })
            .count();
        assert_eq!(in_row, 0);
        // Row 1 still drawn
        let next_row = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { rect, .. } if rect.y == row_bottom))
            .count();
        assert_eq!(next_row, game.tuning.bricks_per_row);
    }

    #[test]
    fn test_missing_textures_fall_back_to_shapes() {
        let tuning = BlocksTuning::default();
        let mut platform = HeadlessPlatform::idle(0)
            .with_missing(tuning.assets.ball.clone())
            .with_missing(tuning.assets.brick.clone());
        let mut game = in_gameplay(tuning);
        game.load(platform.assets());

        let list = drawn(&game);
        assert_eq!(list.textures().count(), 1, "only the paddle is textured");
        assert!(list.commands().iter().any(|c| matches!(c, DrawCommand::Circle { .. })));
        assert_eq!(list.rects_with(colors::GRAY).count(), 50);
        assert_eq!(list.rects_with(colors::DARK_GRAY).count(), 50);

        game.release(platform.assets());
        assert_eq!(platform.live_assets(), 0);
        assert_eq!(platform.released().len(), 2);
    }

    #[test]
    fn test_shapes_style_skips_gameplay_textures() {
        let tuning = BlocksTuning {
            draw_style: DrawStyle::Shapes,
            ..Default::default()
        };
        let game = BlocksGame::new(tuning);
        assert_eq!(game.manifest().len(), 1);

        let mut platform = HeadlessPlatform::idle(0);
        let mut game = game;
        game.load(platform.assets());
        assert_eq!(platform.live_assets(), 1);
    }

    #[test]
    fn test_hud_bar_per_life() {
        let mut game = in_gameplay(BlocksTuning::default());
        assert_eq!(drawn(&game).rects_with(colors::LIGHT_GRAY).count(), 5);
        game.session.lives = 2;
        assert_eq!(drawn(&game).rects_with(colors::LIGHT_GRAY).count(), 2);
    }

    #[test]
    fn test_pause_overlay() {
        let mut game = in_gameplay(BlocksTuning::default());
        step(&mut game, press(Key::P));
        assert!(game.session.paused);
        assert!(drawn(&game).has_text("GAME PAUSED"));
    }
}
