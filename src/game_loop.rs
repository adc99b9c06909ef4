//! Paired update/draw frame driver
//!
//! One frame is: exit check, input poll, one `update`, one `draw`. The pair
//! is never split and never repeated, whatever the host's pacing.

use glam::Vec2;

use crate::assets::{AssetLoader, AssetRequest};
use crate::audio::Audio;
use crate::input::FrameInput;
use crate::platform::{FramePacer, Platform};
use crate::renderer::Canvas;
use crate::screen::Screen;

/// Whether the loop keeps going after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// A game driven by `GameLoop`
pub trait Game {
    fn title(&self) -> &'static str;
    fn screen_size(&self) -> Vec2;
    fn screen(&self) -> Screen;

    /// Every asset `load` will ask for, so async backends can fetch ahead
    fn manifest(&self) -> Vec<AssetRequest>;
    /// Acquire assets; failures leave the matching element on its fallback
    fn load(&mut self, loader: &mut dyn AssetLoader);
    /// Start ambient audio once assets are in
    fn start(&mut self, _audio: &mut dyn Audio) {}
    /// Stop ambient audio before release
    fn stop(&mut self, _audio: &mut dyn Audio) {}
    /// Give every acquired asset back to the loader
    fn release(&mut self, loader: &mut dyn AssetLoader);

    /// Advance one frame; screen transitions happen only here
    fn update(&mut self, input: &FrameInput, audio: &mut dyn Audio) -> Flow;
    /// Draw the current screen; never changes state
    fn draw(&self, canvas: &mut dyn Canvas);
}

/// Owns a game and drives it one frame at a time
#[derive(Debug)]
pub struct GameLoop<G: Game> {
    game: G,
    frames: u64,
    started: bool,
}

impl<G: Game> GameLoop<G> {
    pub fn new(game: G) -> Self {
        Self {
            game,
            frames: 0,
            started: false,
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Load assets and start audio
    pub fn start(&mut self, platform: &mut dyn Platform) {
        if self.started {
            return;
        }
        log::info!("{} starting", self.game.title());
        self.game.load(platform.assets());
        self.game.start(platform.audio());
        self.started = true;
    }

    /// Run exactly one frame, or report that the host asked to exit
    pub fn frame(&mut self, platform: &mut dyn Platform) -> Flow {
        if platform.exit_requested() {
            return Flow::Exit;
        }

        let input = platform.poll_input();
        let flow = self.game.update(&input, platform.audio());

        platform.begin_frame();
        self.game.draw(platform.canvas());
        platform.end_frame();

        self.frames += 1;
        flow
    }

    /// Drive a synchronous host until exit, then tear down
    pub fn run<P: Platform + FramePacer>(mut self, platform: &mut P) -> G {
        self.start(platform);
        while self.frame(platform) == Flow::Continue {
            platform.wait_next_frame();
        }
        self.shutdown(platform)
    }

    /// Stop audio and release every asset; hands the game back
    pub fn shutdown(mut self, platform: &mut dyn Platform) -> G {
        if self.started {
            self.game.stop(platform.audio());
            self.game.release(platform.assets());
        }
        log::info!("{} shut down after {} frames", self.game.title(), self.frames);
        self.game
    }
}

/// Longest gap between host callbacks that still counts as elapsed time,
/// unless a single frame is longer
const MAX_GAP: f64 = 0.1;

/// Fixed-rate gate for hosts that call back at their own pace
///
/// `tick` says whether a full frame has accumulated. At most one frame is
/// granted per call and backlog beyond one frame is dropped, so a slow host
/// never triggers a burst of catch-up updates.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_time: f64,
    accumulator: f64,
    last: Option<f64>,
}

impl FrameClock {
    pub fn new(frame_time: f64) -> Self {
        Self {
            frame_time,
            accumulator: 0.0,
            last: None,
        }
    }

    /// Feed the host timestamp (seconds); true when a frame is due
    pub fn tick(&mut self, now: f64) -> bool {
        let elapsed = match self.last {
            Some(last) => (now - last).clamp(0.0, MAX_GAP.max(self.frame_time)),
            None => 0.0,
        };
        self.last = Some(now);
        self.accumulator += elapsed;

        if self.accumulator < self.frame_time {
            return false;
        }
        self.accumulator = (self.accumulator - self.frame_time).min(self.frame_time);
        true
    }
}
