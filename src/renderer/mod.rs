//! Drawing boundary
//!
//! Games issue immediate-mode primitives through `Canvas`; the backend
//! decides how they reach the screen. `DrawList` records them instead.

pub mod colors;
pub mod draw_list;

pub use colors::Color;
pub use draw_list::{DrawCommand, DrawList};

use glam::Vec2;

use crate::assets::{FontId, TextureId};
use crate::sim::Rect;

/// Immediate-mode drawing primitives, screen coordinates, y down
pub trait Canvas {
    fn clear(&mut self, color: Color);
    fn rect(&mut self, rect: Rect, color: Color);
    fn circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);
    /// Default font; `pos` is the top-left of the text box
    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);
    /// Loaded font with extra letter spacing
    fn text_ex(&mut self, font: FontId, text: &str, pos: Vec2, size: f32, spacing: f32, color: Color);
    /// Texture at its natural size, top-left at `pos`
    fn texture(&mut self, texture: TextureId, pos: Vec2, tint: Color);
    /// Width of `text` in the default font
    fn measure_text(&self, text: &str, size: f32) -> f32;
    fn texture_size(&self, texture: TextureId) -> Option<Vec2>;
}

/// Draw `text` horizontally centred on `center_x`
pub fn text_centered(canvas: &mut dyn Canvas, text: &str, center_x: f32, y: f32, size: f32, color: Color) {
    let width = canvas.measure_text(text, size);
    canvas.text(text, Vec2::new(center_x - width / 2.0, y), size, color);
}

/// Draw a texture centred on `center`; nothing if its size is unknown
pub fn texture_centered(canvas: &mut dyn Canvas, texture: TextureId, center: Vec2, tint: Color) {
    if let Some(size) = canvas.texture_size(texture) {
        canvas.texture(texture, center - size / 2.0, tint);
    }
}
