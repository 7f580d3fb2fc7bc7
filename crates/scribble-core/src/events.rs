//! Change notifications raised by the canvas.

use crate::tools::MarkerThickness;

/// Something the shell may need to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasEvent {
    /// The set of visible drawables changed; the canvas must be repainted.
    DrawingChanged,
    /// A sticker was added to the palette.
    PaletteChanged,
    /// The marker thickness selection changed.
    ThicknessChanged(MarkerThickness),
}

/// FIFO of pending events, drained once per event-loop turn.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: Vec<CanvasEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: CanvasEvent) {
        self.pending.push(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Whether a drained batch requires a repaint.
pub fn needs_redraw(events: &[CanvasEvent]) -> bool {
    events.iter().any(|e| matches!(e, CanvasEvent::DrawingChanged))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = EventQueue::new();
        queue.emit(CanvasEvent::DrawingChanged);
        queue.emit(CanvasEvent::PaletteChanged);

        assert_eq!(
            queue.drain(),
            vec![CanvasEvent::DrawingChanged, CanvasEvent::PaletteChanged]
        );
        assert!(!queue.has_pending());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_needs_redraw() {
        assert!(!needs_redraw(&[CanvasEvent::ThicknessChanged(MarkerThickness::Thick)]));
        assert!(needs_redraw(&[
            CanvasEvent::PaletteChanged,
            CanvasEvent::DrawingChanged
        ]));
    }
}
