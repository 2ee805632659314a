//! RGBA colors

use serde::{Deserialize, Serialize};

/// A linear RGBA color with components in `0.0..=1.0`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Tint applied to disabled buttons and label backgrounds
    pub const DISABLED: Color = Color::rgb(0.741, 0.741, 0.741);
    /// Text color of disabled labels
    pub const DISABLED_TEXT: Color = Color::rgb(0.459, 0.459, 0.459);
    /// Default label background
    pub const LABEL_BACKGROUND: Color = Color::BLACK.with_alpha(0.8);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub const fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let c = Color::from_hex(0xFF8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 0.502).abs() < 0.01);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_with_alpha_keeps_channels() {
        let c = Color::WHITE.with_alpha(0.25);
        assert_eq!((c.r, c.g, c.b, c.a), (1.0, 1.0, 1.0, 0.25));
        assert_eq!(Color::LABEL_BACKGROUND, Color::rgba(0.0, 0.0, 0.0, 0.8));
    }
}
