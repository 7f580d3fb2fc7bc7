//! Things that can be placed on the canvas.

mod sticker;
mod stroke;

pub use sticker::{STICKER_FONT_SIZE, Sticker};
pub use stroke::Stroke;

/// Discriminant for [`Drawable`], handy for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawableKind {
    Stroke,
    Sticker,
}

/// Anything the history can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Stroke(Stroke),
    Sticker(Sticker),
}

impl Drawable {
    pub fn kind(&self) -> DrawableKind {
        match self {
            Drawable::Stroke(_) => DrawableKind::Stroke,
            Drawable::Sticker(_) => DrawableKind::Sticker,
        }
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            Drawable::Stroke(s) => Some(s),
            Drawable::Sticker(_) => None,
        }
    }

    pub fn as_stroke_mut(&mut self) -> Option<&mut Stroke> {
        match self {
            Drawable::Stroke(s) => Some(s),
            Drawable::Sticker(_) => None,
        }
    }
}

impl From<Stroke> for Drawable {
    fn from(stroke: Stroke) -> Self {
        Drawable::Stroke(stroke)
    }
}

impl From<Sticker> for Drawable {
    fn from(sticker: Sticker) -> Self {
        Drawable::Sticker(sticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_kind() {
        let stroke: Drawable = Stroke::new(Point::ZERO, 2.0).into();
        let sticker: Drawable = Sticker::new(Point::ZERO, "⭐").into();
        assert_eq!(stroke.kind(), DrawableKind::Stroke);
        assert_eq!(sticker.kind(), DrawableKind::Sticker);
    }

    #[test]
    fn test_sticker_is_not_a_stroke() {
        let mut sticker: Drawable = Sticker::new(Point::new(5.0, 5.0), "😊").into();
        assert!(sticker.as_stroke_mut().is_none());
    }
}
