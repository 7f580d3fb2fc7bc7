//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use kurbo::{Affine, Cap, Point, Rect, Size, Stroke as StrokeStyle};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use scribble_core::canvas::CanvasDocument;
use scribble_core::drawables::{Drawable, Sticker, Stroke};
use vello::Scene;

/// Result of PNG rendering - contains the raw RGBA pixel data and dimensions.
#[derive(Debug)]
pub struct PngRenderResult {
    /// RGBA pixel data (4 bytes per pixel).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// Create the GPU-side Vello renderer for `device`.
pub fn create_gpu_renderer(device: &vello::wgpu::Device) -> RenderResult<vello::Renderer> {
    vello::Renderer::new(device, vello::RendererOptions::default())
        .map_err(|e| RendererError::InitFailed(e.to_string()))
}

/// Rasterize `scene` into `target`, which must be an `Rgba8Unorm` storage
/// texture view.
pub fn render_scene_to_view(
    renderer: &mut vello::Renderer,
    device: &vello::wgpu::Device,
    queue: &vello::wgpu::Queue,
    scene: &Scene,
    target: &vello::wgpu::TextureView,
    params: &vello::RenderParams,
) -> RenderResult<()> {
    renderer
        .render_to_texture(device, queue, scene, target, params)
        .map_err(|e| RendererError::RenderFailed(e.to_string()))
}

/// Markers are always black.
const INK: Color = Color::BLACK;

/// Arial first, then whatever the system offers for text and emoji.
const STICKER_FONTS: &str = "Arial, sans-serif, emoji";

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Font context for sticker glyphs (system fonts).
    font_cx: FontContext,
    /// Layout context for sticker glyphs.
    layout_cx: LayoutContext<Brush>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Build a scene for export: the drawables only, on a transparent surface.
    ///
    /// `scale` multiplies the canvas size, so a 256x256 canvas at scale 4
    /// exports at 1024x1024. Returns the scene and the output rectangle in
    /// pixels.
    pub fn build_export_scene(&mut self, document: &CanvasDocument, scale: f64) -> (Scene, Rect) {
        self.scene.reset();

        let transform = Affine::scale(scale);
        for drawable in document.drawables() {
            self.render_drawable(drawable, transform);
        }

        let size = Size::new(
            (document.size.width * scale).round(),
            (document.size.height * scale).round(),
        );
        (std::mem::take(&mut self.scene), size.to_rect())
    }

    fn render_drawable(&mut self, drawable: &Drawable, transform: Affine) {
        match drawable {
            Drawable::Stroke(stroke) => self.render_stroke(stroke, transform),
            Drawable::Sticker(sticker) => self.render_sticker(sticker, transform),
        }
    }

    /// Black polyline with round caps. Single-point strokes draw nothing.
    fn render_stroke(&mut self, stroke: &Stroke, transform: Affine) {
        if !stroke.is_renderable() {
            return;
        }
        let style = StrokeStyle::new(stroke.thickness()).with_caps(Cap::Round);
        self.scene
            .stroke(&style, transform, INK, None, &stroke.to_path());
    }

    /// Lay out the sticker glyph with Parley and draw it with its baseline
    /// starting at the sticker position.
    fn render_sticker(&mut self, sticker: &Sticker, transform: Affine) {
        let brush = Brush::Solid(INK);
        let text = sticker.glyph();

        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(sticker.font_size() as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Source(
            STICKER_FONTS.into(),
        )));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        let origin = sticker.position();
        let mut first_baseline: Option<f32> = None;
        let mut glyph_count = 0;

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let baseline = *first_baseline.get_or_insert(y);
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let glyph_xform = run
                    .synthesis()
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();
                glyph_count += glyphs.len();

                if !glyphs.is_empty() {
                    // Layout y grows from the top line; shift so the first
                    // baseline lands on the sticker position.
                    let text_transform = transform
                        * Affine::translate((origin.x, origin.y - baseline as f64));
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        if glyph_count == 0 {
            log::debug!("No font could render sticker {text:?}, drawing a placeholder");
            self.render_sticker_placeholder(sticker, transform);
        }
    }

    /// Outline box where the glyph would sit.
    fn render_sticker_placeholder(&mut self, sticker: &Sticker, transform: Affine) {
        let size = sticker.font_size();
        let Point { x, y } = sticker.position();
        let rect = Rect::new(x, y - size * 0.8, x + size, y + size * 0.2);
        self.scene.stroke(
            &StrokeStyle::new(1.0),
            transform,
            Color::from_rgba8(255, 100, 100, 200),
            None,
            &rect,
        );
    }

    /// Cover everything outside `canvas_rect` with the window background, so
    /// stroke caps and stickers near the edge do not spill over.
    fn mask_outside(&mut self, canvas_rect: Rect, viewport: Size, color: Color) {
        let bands = [
            Rect::new(0.0, 0.0, viewport.width, canvas_rect.y0),
            Rect::new(0.0, canvas_rect.y1, viewport.width, viewport.height),
            Rect::new(0.0, canvas_rect.y0, canvas_rect.x0, canvas_rect.y1),
            Rect::new(canvas_rect.x1, canvas_rect.y0, viewport.width, canvas_rect.y1),
        ];
        for band in bands.iter().filter(|r| r.area() > 0.0) {
            self.scene
                .fill(Fill::NonZero, Affine::IDENTITY, color, None, band);
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();

        let viewport_rect = ctx.viewport_size.to_rect();
        let canvas_rect = ctx.canvas_rect();
        let transform = ctx.canvas.viewport.transform();

        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            ctx.background_color,
            None,
            &viewport_rect,
        );
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, ctx.canvas_color, None, &canvas_rect);

        // The in-progress stroke is simply the last drawable.
        for drawable in ctx.canvas.document.drawables() {
            self.render_drawable(drawable, transform);
        }

        self.mask_outside(canvas_rect, ctx.viewport_size, ctx.background_color);

        let border = StrokeStyle::new(ctx.scale_factor.max(1.0));
        self.scene.stroke(
            &border,
            Affine::IDENTITY,
            ctx.border_color,
            None,
            &canvas_rect.inflate(0.5, 0.5),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribble_core::canvas::Canvas;

    #[test]
    fn test_renderer_creation() {
        let mut renderer = VelloRenderer::new();
        assert!(renderer.take_scene().encoding().is_empty());
    }

    #[test]
    fn test_build_empty_scene() {
        let mut renderer = VelloRenderer::new();
        let canvas = Canvas::new();
        let ctx = RenderContext::new(&canvas, Size::new(640.0, 640.0));

        renderer.build_scene(&ctx);
        // Background, canvas and border are always drawn.
        assert!(!renderer.take_scene().encoding().is_empty());
    }

    #[test]
    fn test_build_scene_with_drawables() {
        let mut renderer = VelloRenderer::new();
        let mut canvas = Canvas::new();
        canvas.start_stroke(Point::new(10.0, 10.0));
        canvas.extend_stroke(Point::new(40.0, 40.0));
        canvas.end_stroke();
        canvas.place_sticker_at("⭐", Point::new(100.0, 100.0));

        let ctx = RenderContext::new(&canvas, Size::new(640.0, 640.0));
        renderer.build_scene(&ctx);
        assert!(!renderer.take_scene().encoding().is_empty());
    }

    #[test]
    fn test_export_scene_size() {
        let mut renderer = VelloRenderer::new();
        let canvas = Canvas::new();

        let (scene, bounds) = renderer.build_export_scene(&canvas.document, 4.0);
        assert_eq!(bounds, Rect::new(0.0, 0.0, 1024.0, 1024.0));
        // Nothing drawn: the export background stays transparent.
        assert!(scene.encoding().is_empty());
    }

    #[test]
    fn test_export_skips_single_point_stroke() {
        let mut renderer = VelloRenderer::new();
        let mut canvas = Canvas::new();
        canvas.start_stroke(Point::new(10.0, 10.0));
        canvas.end_stroke();

        let (scene, _) = renderer.build_export_scene(&canvas.document, 4.0);
        assert!(scene.encoding().is_empty());
    }

    /// Paths plus glyph runs encoded in `scene`.
    fn drawn_items(scene: &Scene) -> usize {
        let encoding = scene.encoding();
        encoding.n_paths as usize + encoding.resources.glyph_runs.len()
    }

    /// Draw a stroke, then a sticker, then undo and redo the sticker,
    /// counting what `draw` encodes at each step.
    fn count_through_history(mut draw: impl FnMut(&Canvas) -> usize) {
        let mut canvas = Canvas::new();
        let empty = draw(&canvas);

        canvas.start_stroke(Point::new(10.0, 10.0));
        canvas.extend_stroke(Point::new(60.0, 40.0));
        canvas.end_stroke();
        let stroke_only = draw(&canvas);

        canvas.place_sticker_at("⭐", Point::new(100.0, 100.0));
        let full = draw(&canvas);

        assert!(stroke_only > empty);
        assert!(full > stroke_only);

        assert!(canvas.undo());
        assert_eq!(draw(&canvas), stroke_only);
        assert!(canvas.redo());
        assert_eq!(draw(&canvas), full);

        assert!(canvas.undo());
        assert!(canvas.undo());
        assert_eq!(draw(&canvas), empty);
    }

    #[test]
    fn test_export_draws_only_active_drawables() {
        let mut renderer = VelloRenderer::new();
        count_through_history(|canvas| {
            let (scene, _) = renderer.build_export_scene(&canvas.document, 4.0);
            drawn_items(&scene)
        });
    }

    #[test]
    fn test_redraw_replays_only_active_drawables() {
        let mut renderer = VelloRenderer::new();
        count_through_history(|canvas| {
            let ctx = RenderContext::new(canvas, Size::new(640.0, 640.0));
            renderer.build_scene(&ctx);
            drawn_items(&renderer.take_scene())
        });
    }
}
