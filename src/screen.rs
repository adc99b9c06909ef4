//! Screen state machine shared by both games
//!
//! A game is always on exactly one `Screen`. Transitions only happen inside
//! `update`, and every transition resets the per-screen frame counter.

use serde::{Deserialize, Serialize};

use crate::consts::BLINK_FRAMES;

/// One macro-state of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    Logo,
    Title,
    Gameplay,
    Ending,
}

/// Current screen plus its frame counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenState {
    pub screen: Screen,
    /// Updates spent on the current screen
    pub frames: u32,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Logo,
            frames: 0,
        }
    }

    /// Count one update on the current screen
    #[inline]
    pub fn tick(&mut self) {
        self.frames = self.frames.saturating_add(1);
    }

    /// Switch screens and restart the frame counter
    pub fn transition(&mut self, next: Screen) {
        log::debug!("Screen {:?} -> {:?} after {} frames", self.screen, next, self.frames);
        self.screen = next;
        self.frames = 0;
    }

    /// Blink phase for "PRESS ENTER" prompts
    ///
    /// `visible_first` selects whether the prompt starts shown (Blocks) or
    /// hidden (Pong).
    pub fn blink_on(&self, visible_first: bool) -> bool {
        let even = (self.frames / BLINK_FRAMES) % 2 == 0;
        even == visible_first
    }
}

/// How the Logo screen decides it is done
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LogoIntro {
    /// Advance once the frame counter exceeds `frames`
    Timed { frames: u32 },
    /// Fade in over `fade_frames`, hold for `hold_frames`, fade out again
    Fade { fade_frames: u32, hold_frames: u32 },
}

impl LogoIntro {
    /// Whether the logo is done after `frames` updates
    pub fn finished(&self, frames: u32) -> bool {
        match *self {
            LogoIntro::Timed { frames: threshold } => frames > threshold,
            LogoIntro::Fade {
                fade_frames,
                hold_frames,
            } => frames > fade_frames * 2 + hold_frames,
        }
    }

    /// Logo opacity after `frames` updates (always 1.0 for `Timed`)
    pub fn alpha(&self, frames: u32) -> f32 {
        match *self {
            LogoIntro::Timed { .. } => 1.0,
            LogoIntro::Fade {
                fade_frames,
                hold_frames,
            } => {
                let fade = fade_frames.max(1);
                if frames <= fade {
                    frames as f32 / fade as f32
                } else if frames <= fade + hold_frames {
                    1.0
                } else {
                    let out = frames - fade - hold_frames;
                    (1.0 - out as f32 / fade as f32).max(0.0)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_resets_frames() {
        let mut state = ScreenState::new();
        for _ in 0..10 {
            state.tick();
        }
        assert_eq!(state.frames, 10);
        state.transition(Screen::Title);
        assert_eq!(state.screen, Screen::Title);
        assert_eq!(state.frames, 0);
    }

    #[test]
    fn test_timed_logo_threshold() {
        let intro = LogoIntro::Timed { frames: 180 };
        assert!(!intro.finished(180));
        assert!(intro.finished(181));
        assert_eq!(intro.alpha(0), 1.0);
    }

    #[test]
    fn test_fade_logo_ramps() {
        let intro = LogoIntro::Fade {
            fade_frames: 180,
            hold_frames: 200,
        };
        assert_eq!(intro.alpha(0), 0.0);
        assert!((intro.alpha(90) - 0.5).abs() < 1e-6);
        assert_eq!(intro.alpha(180), 1.0);
        assert_eq!(intro.alpha(300), 1.0);
        assert_eq!(intro.alpha(380), 1.0);
        assert!((intro.alpha(470) - 0.5).abs() < 1e-6);
        assert_eq!(intro.alpha(560), 0.0);
        assert!(!intro.finished(560));
        assert!(intro.finished(561));
    }

    #[test]
    fn test_blink_phase() {
        let mut state = ScreenState::new();
        assert!(state.blink_on(true));
        assert!(!state.blink_on(false));
        for _ in 0..BLINK_FRAMES {
            state.tick();
        }
        assert!(!state.blink_on(true));
        assert!(state.blink_on(false));
    }
}
