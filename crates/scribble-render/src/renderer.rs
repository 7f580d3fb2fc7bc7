//! Renderer trait abstraction.

use kurbo::{Rect, Size};
use peniko::Color;
use scribble_core::canvas::Canvas;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Window background around the canvas.
    pub background_color: Color,
    /// Fill of the drawing surface itself.
    pub canvas_color: Color,
    /// Outline drawn around the drawing surface.
    pub border_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(canvas: &'a Canvas, viewport_size: Size) -> Self {
        Self {
            canvas,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(240, 240, 240, 255),
            canvas_color: Color::WHITE,
            border_color: Color::from_rgba8(0, 0, 0, 255),
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the drawing surface color.
    pub fn with_canvas_color(mut self, color: Color) -> Self {
        self.canvas_color = color;
        self
    }

    /// Screen rectangle of the drawing surface.
    pub fn canvas_rect(&self) -> Rect {
        self.canvas.viewport.screen_rect(self.canvas.document.size)
    }
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other rendering engines.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// The whole drawing is replayed every frame; there is no incremental
    /// damage tracking.
    fn build_scene(&mut self, ctx: &RenderContext);
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;
    use scribble_core::Viewport;

    #[test]
    fn test_canvas_rect_follows_viewport() {
        let mut canvas = Canvas::new();
        canvas.viewport = Viewport::new(Vec2::new(10.0, 20.0), 2.0);
        let ctx = RenderContext::new(&canvas, Size::new(800.0, 600.0)).with_scale_factor(2.0);
        assert_eq!(ctx.canvas_rect(), Rect::new(10.0, 20.0, 522.0, 532.0));
    }
}
