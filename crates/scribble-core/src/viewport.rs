//! Placement of the fixed-size canvas inside the window.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Maps canvas coordinates to window (screen) coordinates.
///
/// Unlike a free camera, the viewport never pans or zooms on its own: the
/// shell recomputes it from the layout each frame via [`Viewport::center_in`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Screen position of the canvas origin.
    pub offset: Vec2,
    /// Screen pixels per canvas unit.
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(offset: Vec2, scale: f64) -> Self {
        Self { offset, scale }
    }

    /// Canvas to screen.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Screen to canvas.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Screen rectangle covered by a canvas of `canvas_size`.
    pub fn screen_rect(&self, canvas_size: Size) -> Rect {
        Rect::from_points(
            self.canvas_to_screen(Point::ZERO),
            self.canvas_to_screen(Point::new(canvas_size.width, canvas_size.height)),
        )
    }

    /// Center a canvas of `canvas_size` horizontally in `area`, aligned to its
    /// top edge plus `top_margin`.
    pub fn center_in(area: Rect, canvas_size: Size, scale: f64, top_margin: f64) -> Self {
        let x = area.x0 + (area.width() - canvas_size.width * scale) / 2.0;
        let y = area.y0 + top_margin;
        Self::new(Vec2::new(x.round(), y.round()), scale)
    }
}
