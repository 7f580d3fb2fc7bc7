//! Canvas document and drawing state.

use crate::config::CanvasConfig;
use crate::drawables::{Drawable, Sticker, Stroke};
use crate::events::{CanvasEvent, EventQueue};
use crate::history::History;
use crate::input::{MouseButton, PointerEvent};
use crate::stickers::{StickerEntry, StickerError, StickerPalette};
use crate::tools::{MarkerThickness, ToolManager};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size};

/// A fixed-size drawing and its undo/redo history.
#[derive(Debug, Clone)]
pub struct CanvasDocument {
    /// Document name, used as the export file stem.
    pub name: String,
    /// Drawing surface size.
    pub size: Size,
    history: History,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self::new(CanvasConfig::default().size)
    }
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new(size: Size) -> Self {
        Self {
            name: "drawing".to_string(),
            size,
            history: History::new(),
        }
    }

    /// Drawing surface rectangle in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        self.size.to_rect()
    }

    /// Whether `point` lies on the drawing surface.
    pub fn contains(&self, point: Point) -> bool {
        let b = self.bounds();
        point.x >= b.x0 && point.x < b.x1 && point.y >= b.y0 && point.y < b.y1
    }

    /// Drawables in paint order (back to front).
    pub fn drawables(&self) -> &[Drawable] {
        self.history.drawables()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Get the number of drawables.
    pub fn len(&self) -> usize {
        self.history.len()
    }
}

/// The canvas state including document, marker and viewport.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// The document being edited.
    pub document: CanvasDocument,
    /// Marker selection and drawing state.
    pub tool_manager: ToolManager,
    /// Where the canvas sits on screen.
    pub viewport: Viewport,
    /// Stickers available for stamping.
    pub palette: StickerPalette,
    events: EventQueue,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a new canvas with an empty document.
    pub fn new() -> Self {
        Self::with_config(&CanvasConfig::default())
    }

    pub fn with_config(config: &CanvasConfig) -> Self {
        Self {
            document: CanvasDocument::new(config.size),
            tool_manager: ToolManager::new(config),
            viewport: Viewport::default(),
            palette: StickerPalette::new(),
            events: EventQueue::new(),
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.tool_manager.is_active()
    }

    /// Begin a new stroke at `point` with the current marker thickness.
    pub fn start_stroke(&mut self, point: Point) {
        self.end_stroke();

        let stroke = Stroke::new(point, self.tool_manager.current_width());
        self.document.history.push(stroke.into());
        self.tool_manager.begin();
        self.events.emit(CanvasEvent::DrawingChanged);
    }

    /// Append `point` to the stroke in progress. Ignored when not drawing.
    pub fn extend_stroke(&mut self, point: Point) {
        if !self.tool_manager.is_active() {
            return;
        }

        let Some(stroke) = self
            .document
            .history
            .last_mut()
            .and_then(Drawable::as_stroke_mut)
        else {
            // The stroke was taken off the top; nothing left to extend.
            self.tool_manager.end();
            return;
        };

        stroke.add_point(point);
        self.events.emit(CanvasEvent::DrawingChanged);
    }

    /// Stop drawing. Safe to call when not drawing.
    pub fn end_stroke(&mut self) {
        if self.tool_manager.end() {
            log::debug!("stroke finished ({} drawables)", self.document.len());
        }
    }

    /// Select the marker used by strokes started from now on.
    pub fn set_thickness(&mut self, thickness: MarkerThickness) {
        if self.tool_manager.thickness != thickness {
            self.tool_manager.thickness = thickness;
            self.events.emit(CanvasEvent::ThicknessChanged(thickness));
        }
    }

    pub fn thickness(&self) -> MarkerThickness {
        self.tool_manager.thickness
    }

    /// Stamp `glyph` at a uniformly random spot on the canvas.
    /// Returns the chosen position.
    pub fn place_sticker(&mut self, glyph: &str, rng: &mut fastrand::Rng) -> Point {
        let size = self.document.size;
        let position = Point::new(rng.f64() * size.width, rng.f64() * size.height);
        self.place_sticker_at(glyph, position);
        position
    }

    /// Stamp `glyph` with its baseline starting at `position`.
    pub fn place_sticker_at(&mut self, glyph: &str, position: Point) {
        self.end_stroke();
        self.document
            .history
            .push(Sticker::new(position, glyph).into());
        self.events.emit(CanvasEvent::DrawingChanged);
    }

    /// Add a custom sticker to the palette.
    pub fn add_custom_sticker(&mut self, icon: &str) -> Result<StickerEntry, StickerError> {
        let entry = self.palette.add_custom(icon)?.clone();
        self.events.emit(CanvasEvent::PaletteChanged);
        Ok(entry)
    }

    /// Undo the last placed drawable.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.end_stroke();
        let changed = self.document.history.undo();
        if changed {
            self.events.emit(CanvasEvent::DrawingChanged);
        }
        changed
    }

    /// Redo the last undone drawable.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.end_stroke();
        let changed = self.document.history.redo();
        if changed {
            self.events.emit(CanvasEvent::DrawingChanged);
        }
        changed
    }

    /// Remove everything, including the redo buffer.
    pub fn clear(&mut self) {
        self.end_stroke();
        self.document.history.clear();
        log::info!("Canvas cleared");
        self.events.emit(CanvasEvent::DrawingChanged);
    }

    /// Take the events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<CanvasEvent> {
        self.events.drain()
    }

    pub fn has_pending_events(&self) -> bool {
        self.events.has_pending()
    }

    /// Route a pointer event (in canvas coordinates) to the marker.
    ///
    /// Presses outside the drawing surface are ignored, and moving off the
    /// surface while drawing ends the stroke.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => {
                if self.document.contains(position) {
                    self.start_stroke(position);
                }
            }
            PointerEvent::Move { position } => {
                if !self.is_drawing() {
                    return;
                }
                if self.document.contains(position) {
                    self.extend_stroke(position);
                } else {
                    self.end_stroke();
                }
            }
            PointerEvent::Up {
                button: MouseButton::Left,
                ..
            }
            | PointerEvent::Leave => self.end_stroke(),
            PointerEvent::Down { .. } | PointerEvent::Up { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawables::DrawableKind;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn changes(canvas: &mut Canvas) -> usize {
        canvas
            .drain_events()
            .iter()
            .filter(|e| **e == CanvasEvent::DrawingChanged)
            .count()
    }

    #[test]
    fn test_stroke_lifecycle() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer(down(10.0, 10.0));
        canvas.handle_pointer(moved(20.0, 10.0));
        canvas.handle_pointer(moved(20.0, 30.0));
        canvas.handle_pointer(up(20.0, 30.0));

        assert!(!canvas.is_drawing());
        assert_eq!(canvas.document.len(), 1);
        let stroke = canvas.document.drawables()[0].as_stroke().unwrap();
        assert_eq!(stroke.len(), 3);
        assert!((stroke.thickness() - 2.0).abs() < f64::EPSILON);
        assert_eq!(changes(&mut canvas), 3);
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer(moved(20.0, 10.0));
        assert!(canvas.document.is_empty());
        assert!(!canvas.has_pending_events());
    }

    #[test]
    fn test_thickness_applies_to_new_strokes_only() {
        let mut canvas = Canvas::new();
        canvas.start_stroke(Point::new(1.0, 1.0));
        canvas.set_thickness(MarkerThickness::Thick);
        canvas.extend_stroke(Point::new(2.0, 2.0));
        canvas.end_stroke();
        canvas.start_stroke(Point::new(3.0, 3.0));
        canvas.end_stroke();

        let widths: Vec<f64> = canvas
            .document
            .drawables()
            .iter()
            .filter_map(|d| d.as_stroke().map(Stroke::thickness))
            .collect();
        assert_eq!(widths, vec![2.0, 5.0]);
    }

    #[test]
    fn test_set_same_thickness_is_silent() {
        let mut canvas = Canvas::new();
        canvas.set_thickness(MarkerThickness::Thin);
        assert!(!canvas.has_pending_events());

        canvas.set_thickness(MarkerThickness::Thick);
        assert_eq!(
            canvas.drain_events(),
            vec![CanvasEvent::ThicknessChanged(MarkerThickness::Thick)]
        );
    }

    #[test]
    fn test_place_sticker_within_bounds() {
        let mut canvas = Canvas::new();
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..50 {
            let p = canvas.place_sticker("⭐", &mut rng);
            assert!(canvas.document.contains(p));
        }
        assert_eq!(canvas.document.len(), 50);
        assert!(
            canvas
                .document
                .drawables()
                .iter()
                .all(|d| d.kind() == DrawableKind::Sticker)
        );
    }

    #[test]
    fn test_place_sticker_clears_redo() {
        let mut canvas = Canvas::new();
        canvas.place_sticker_at("⭐", Point::new(5.0, 5.0));
        canvas.undo();
        assert!(canvas.document.can_redo());

        canvas.place_sticker_at("😊", Point::new(6.0, 6.0));
        assert!(!canvas.document.can_redo());
        assert!(!canvas.redo());
    }

    #[test]
    fn test_undo_redo_notify_only_on_change() {
        let mut canvas = Canvas::new();
        assert!(!canvas.undo());
        assert!(!canvas.redo());
        assert!(!canvas.has_pending_events());

        canvas.place_sticker_at("⭐", Point::new(5.0, 5.0));
        canvas.drain_events();

        assert!(canvas.undo());
        assert_eq!(changes(&mut canvas), 1);
        assert!(canvas.redo());
        assert_eq!(changes(&mut canvas), 1);
    }

    #[test]
    fn test_undo_while_drawing_ends_stroke() {
        let mut canvas = Canvas::new();
        canvas.place_sticker_at("⭐", Point::new(5.0, 5.0));
        canvas.handle_pointer(down(10.0, 10.0));
        canvas.handle_pointer(moved(11.0, 11.0));

        assert!(canvas.undo());
        assert!(!canvas.is_drawing());

        // Further motion must not touch the sticker that is now on top.
        canvas.handle_pointer(moved(12.0, 12.0));
        assert_eq!(canvas.document.len(), 1);
        assert_eq!(canvas.document.drawables()[0].kind(), DrawableKind::Sticker);
        assert_eq!(canvas.document.history().undone()[0].as_stroke().unwrap().len(), 2);
    }

    #[test]
    fn test_clear_always_notifies() {
        let mut canvas = Canvas::new();
        canvas.clear();
        assert_eq!(changes(&mut canvas), 1);

        canvas.place_sticker_at("⭐", Point::new(5.0, 5.0));
        canvas.undo();
        canvas.clear();
        assert!(!canvas.document.can_undo());
        assert!(!canvas.document.can_redo());
    }

    #[test]
    fn test_press_outside_canvas_is_ignored() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer(down(-5.0, 10.0));
        canvas.handle_pointer(down(300.0, 10.0));
        assert!(!canvas.is_drawing());
        assert!(canvas.document.is_empty());
    }

    #[test]
    fn test_leaving_canvas_ends_stroke() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer(down(250.0, 10.0));
        canvas.handle_pointer(moved(255.0, 10.0));
        canvas.handle_pointer(moved(260.0, 10.0));
        assert!(!canvas.is_drawing());

        canvas.handle_pointer(down(10.0, 10.0));
        canvas.handle_pointer(PointerEvent::Leave);
        assert!(!canvas.is_drawing());
        assert_eq!(canvas.document.len(), 2);
    }

    #[test]
    fn test_right_button_does_not_draw() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer(PointerEvent::Down {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Right,
        });
        assert!(canvas.document.is_empty());
    }

    #[test]
    fn test_add_custom_sticker() {
        let mut canvas = Canvas::new();
        let entry = canvas.add_custom_sticker("🐸").unwrap();
        assert_eq!(entry.name, "Custom Sticker 4");
        assert_eq!(canvas.drain_events(), vec![CanvasEvent::PaletteChanged]);

        assert_eq!(canvas.add_custom_sticker(" "), Err(StickerError::Empty));
        assert!(!canvas.has_pending_events());
    }
}
