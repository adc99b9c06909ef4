//! Platform boundary
//!
//! Everything the games need from the outside world: key state, a canvas,
//! audio and asset loading. Backends:
//! - `headless`: scripted input and a recording canvas (tests, tooling)
//! - `native`: macroquad window (desktop builds)
//! - `web`: canvas 2D and the browser's animation-frame callback (WASM)

pub mod headless;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::HeadlessPlatform;

use crate::assets::AssetLoader;
use crate::audio::Audio;
use crate::input::FrameInput;
use crate::renderer::Canvas;

/// One presentation backend
pub trait Platform {
    /// Window closed or ESC pressed; checked once at the top of each frame
    fn exit_requested(&self) -> bool;
    /// Snapshot of the keyboard for this frame
    fn poll_input(&mut self) -> FrameInput;
    fn begin_frame(&mut self);
    fn end_frame(&mut self);
    fn canvas(&mut self) -> &mut dyn Canvas;
    fn audio(&mut self) -> &mut dyn Audio;
    fn assets(&mut self) -> &mut dyn AssetLoader;
}

/// Blocks until the next frame is due (synchronous hosts only)
pub trait FramePacer {
    fn wait_next_frame(&mut self);
}
