//! Collision detection and response for axis-aligned geometry
//!
//! Everything in both games is either a circle (the ball) or an
//! axis-aligned rectangle (paddles, bricks, the screen itself).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }
}

/// Check whether a circle overlaps a rectangle (touching counts)
pub fn circle_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let half = rect.size() / 2.0;
    let d = (center - rect.center()).abs();

    if d.x > half.x + radius || d.y > half.y + radius {
        return false;
    }
    if d.x <= half.x || d.y <= half.y {
        return true;
    }

    // Corner region
    let corner = d - half;
    corner.length_squared() <= radius * radius
}

/// Which screen edges a circle touches or crosses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl WallContact {
    /// Touching the left or right edge
    #[inline]
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    /// Touching the top or bottom edge
    #[inline]
    pub fn vertical(&self) -> bool {
        self.top || self.bottom
    }
}

/// Test a circle against the screen edges
///
/// `inclusive` selects `>=`/`<=` comparisons (touching counts) over strict ones.
pub fn wall_contact(center: Vec2, radius: f32, screen: Vec2, inclusive: bool) -> WallContact {
    let (lo, hi) = (center - radius, center + radius);
    if inclusive {
        WallContact {
            left: lo.x <= 0.0,
            right: hi.x >= screen.x,
            top: lo.y <= 0.0,
            bottom: hi.y >= screen.y,
        }
    } else {
        WallContact {
            left: lo.x < 0.0,
            right: hi.x > screen.x,
            top: lo.y < 0.0,
            bottom: hi.y > screen.y,
        }
    }
}

/// Flip the horizontal speed component
#[inline]
pub fn reflect_x(velocity: Vec2) -> Vec2 {
    Vec2::new(-velocity.x, velocity.y)
}

/// Flip the vertical speed component
#[inline]
pub fn reflect_y(velocity: Vec2) -> Vec2 {
    Vec2::new(velocity.x, -velocity.y)
}

/// Clamp a span `[pos, pos + len]` into `[0, limit]`
#[inline]
pub fn clamp_span(pos: f32, len: f32, limit: f32) -> f32 {
    if pos <= 0.0 {
        0.0
    } else if pos + len >= limit {
        limit - len
    } else {
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_circle_rect_overlap() {
        let rect = Rect::new(100.0, 100.0, 50.0, 20.0);

        // Centre inside
        assert!(circle_rect(Vec2::new(120.0, 110.0), 5.0, &rect));
        // Touching the top edge
        assert!(circle_rect(Vec2::new(120.0, 90.0), 10.0, &rect));
        // Clear miss above
        assert!(!circle_rect(Vec2::new(120.0, 80.0), 10.0, &rect));
        // Near a corner but outside the rounded region
        assert!(!circle_rect(Vec2::new(92.0, 92.0), 10.0, &rect));
        // Inside the rounded corner region
        assert!(circle_rect(Vec2::new(95.0, 95.0), 10.0, &rect));
    }

    #[test]
    fn test_wall_contact_inclusive_vs_strict() {
        let screen = Vec2::new(800.0, 450.0);
        let touching_left = Vec2::new(10.0, 200.0);

        assert!(wall_contact(touching_left, 10.0, screen, true).left);
        assert!(!wall_contact(touching_left, 10.0, screen, false).left);

        let contact = wall_contact(Vec2::new(400.0, 445.0), 10.0, screen, false);
        assert!(contact.bottom);
        assert!(contact.vertical());
        assert!(!contact.horizontal());
    }

    #[test]
    fn test_reflect_flips_single_axis() {
        let v = Vec2::new(4.0, 4.0);
        assert_eq!(reflect_y(v), Vec2::new(4.0, -4.0));
        assert_eq!(reflect_x(v), Vec2::new(-4.0, 4.0));
    }

    #[test]
    fn test_clamp_span() {
        assert_eq!(clamp_span(-5.0, 100.0, 800.0), 0.0);
        assert_eq!(clamp_span(750.0, 100.0, 800.0), 700.0);
        assert_eq!(clamp_span(300.0, 100.0, 800.0), 300.0);
    }

    proptest! {
        #[test]
        fn prop_reflection_is_involutive(x in -50.0f32..50.0, y in -50.0f32..50.0) {
            let v = Vec2::new(x, y);
            prop_assert_eq!(reflect_x(reflect_x(v)), v);
            prop_assert_eq!(reflect_y(reflect_y(v)), v);
        }

        #[test]
        fn prop_clamp_span_stays_on_screen(pos in -2000.0f32..2000.0, len in 1.0f32..200.0) {
            let limit = 800.0;
            let clamped = clamp_span(pos, len, limit);
            prop_assert!(clamped >= 0.0);
            prop_assert!(clamped + len <= limit);
        }
    }
}
