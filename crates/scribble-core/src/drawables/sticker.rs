//! Stamped sticker glyph.

use kurbo::Point;

/// Stickers are drawn as text at this size, in canvas units.
pub const STICKER_FONT_SIZE: f64 = 30.0;

/// A glyph stamped at a fixed position. `position` is the left end of the
/// text baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Sticker {
    position: Point,
    glyph: String,
}

impl Sticker {
    pub fn new(position: Point, glyph: impl Into<String>) -> Self {
        Self {
            position,
            glyph: glyph.into(),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn font_size(&self) -> f64 {
        STICKER_FONT_SIZE
    }
}
