//! Recording canvas
//!
//! Captures every primitive a frame issues so headless runs and tests can
//! inspect what would have been drawn.

use std::collections::HashMap;

use glam::Vec2;

use super::{Canvas, Color};
use crate::assets::{FontId, TextureId};
use crate::sim::Rect;

/// Nominal glyph advance relative to font size for measuring without a font
const GLYPH_ADVANCE: f32 = 0.5;

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Rect {
        rect: Rect,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
        font: Option<FontId>,
    },
    Texture {
        texture: TextureId,
        pos: Vec2,
        tint: Color,
    },
}

/// Canvas that records instead of drawing
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    texture_sizes: HashMap<TextureId, Vec2>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `texture_size` answer for `texture`
    pub fn set_texture_size(&mut self, texture: TextureId, size: Vec2) {
        self.texture_sizes.insert(texture, size);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop recorded commands; texture sizes are kept
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// All text strings drawn, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }

    /// Rectangles drawn with exactly `color`
    pub fn rects_with(&self, color: Color) -> impl Iterator<Item = &Rect> {
        self.commands.iter().filter_map(move |cmd| match cmd {
            DrawCommand::Rect { rect, color: c } if *c == color => Some(rect),
            _ => None,
        })
    }

    pub fn textures(&self) -> impl Iterator<Item = TextureId> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Texture { texture, .. } => Some(*texture),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            size,
            color,
            font: None,
        });
    }

    fn text_ex(&mut self, font: FontId, text: &str, pos: Vec2, size: f32, _spacing: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            size,
            color,
            font: Some(font),
        });
    }

    fn texture(&mut self, texture: TextureId, pos: Vec2, tint: Color) {
        self.commands.push(DrawCommand::Texture { texture, pos, tint });
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * GLYPH_ADVANCE
    }

    fn texture_size(&self, texture: TextureId) -> Option<Vec2> {
        self.texture_sizes.get(&texture).copied()
    }
}
