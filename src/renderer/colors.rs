//! Colors for game elements

/// RGBA, each channel 0.0 - 1.0
pub type Color = [f32; 4];

pub const BACKGROUND: Color = [0.96, 0.96, 0.96, 1.0];
pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
pub const LIGHT_GRAY: Color = [0.78, 0.78, 0.78, 1.0];
pub const GRAY: Color = [0.51, 0.51, 0.51, 1.0];
pub const DARK_GRAY: Color = [0.31, 0.31, 0.31, 1.0];
pub const RED: Color = [0.90, 0.16, 0.22, 1.0];
pub const MAROON: Color = [0.75, 0.13, 0.22, 1.0];
pub const LIME: Color = [0.0, 0.62, 0.18, 1.0];
pub const DARK_GREEN: Color = [0.0, 0.46, 0.17, 1.0];
pub const BLUE: Color = [0.0, 0.47, 0.95, 1.0];
pub const DARK_BLUE: Color = [0.0, 0.32, 0.67, 1.0];

/// Same color with its alpha scaled by `alpha`
#[inline]
pub fn fade(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Convert to 8-bit channels
pub fn to_rgba8(color: Color) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// CSS `rgba()` string for canvas-style backends
pub fn to_css(color: Color) -> String {
    let [r, g, b, _] = to_rgba8(color);
    format!("rgba({}, {}, {}, {})", r, g, b, color[3].clamp(0.0, 1.0))
}
