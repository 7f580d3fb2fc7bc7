//! Two-stack undo/redo history over placed drawables.

use crate::drawables::Drawable;

/// The active drawing plus a redo buffer.
///
/// Undo and redo move whole drawables between the two stacks; nothing is
/// snapshotted. Pushing a new drawable invalidates the redo buffer.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Drawables currently on the canvas, back to front.
    active: Vec<Drawable>,
    /// Drawables taken off by undo, most recent last.
    undone: Vec<Drawable>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new drawable on top and clear the redo buffer.
    pub fn push(&mut self, drawable: Drawable) {
        log::debug!(
            "history: push {:?} (dropping {} redo entries)",
            drawable.kind(),
            self.undone.len()
        );
        self.active.push(drawable);
        self.undone.clear();
    }

    /// Move the top drawable to the redo buffer.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.active.pop() {
            Some(drawable) => {
                log::debug!("history: undo {:?}", drawable.kind());
                self.undone.push(drawable);
                true
            }
            None => false,
        }
    }

    /// Move the most recently undone drawable back on top.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.undone.pop() {
            Some(drawable) => {
                log::debug!("history: redo {:?}", drawable.kind());
                self.active.push(drawable);
                true
            }
            None => false,
        }
    }

    /// Empty both stacks.
    pub fn clear(&mut self) {
        self.active.clear();
        self.undone.clear();
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.active.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Active drawables in paint order.
    pub fn drawables(&self) -> &[Drawable] {
        &self.active
    }

    /// The redo buffer, most recently undone last.
    pub fn undone(&self) -> &[Drawable] {
        &self.undone
    }

    /// Mutable access to the top of the active stack.
    pub fn last_mut(&mut self) -> Option<&mut Drawable> {
        self.active.last_mut()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawables::{Sticker, Stroke};
    use kurbo::Point;

    fn sticker(glyph: &str) -> Drawable {
        Sticker::new(Point::new(1.0, 2.0), glyph).into()
    }

    #[test]
    fn test_undo_redo_moves_between_stacks() {
        let mut history = History::new();
        history.push(sticker("a"));
        history.push(sticker("b"));

        assert!(history.undo());
        assert_eq!(history.drawables(), &[sticker("a")]);
        assert_eq!(history.undone(), &[sticker("b")]);

        assert!(history.redo());
        assert_eq!(history.drawables(), &[sticker("a"), sticker("b")]);
        assert!(history.undone().is_empty());
    }

    #[test]
    fn test_redo_order_is_last_undone_first() {
        let mut history = History::new();
        history.push(sticker("a"));
        history.push(sticker("b"));
        history.push(sticker("c"));

        history.undo();
        history.undo();
        history.redo();
        assert_eq!(history.drawables(), &[sticker("a"), sticker("b")]);
        assert_eq!(history.undone(), &[sticker("c")]);
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = History::new();
        history.push(sticker("a"));
        history.undo();
        assert!(history.can_redo());

        history.push(Stroke::new(Point::ZERO, 2.0).into());
        assert!(!history.can_redo());
        assert!(!history.redo());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history = History::new();
        assert!(!history.undo());
        assert!(!history.redo());
        assert!(history.is_empty());
    }

    #[test]
    fn test_clear_empties_both() {
        let mut history = History::new();
        history.push(sticker("a"));
        history.push(sticker("b"));
        history.undo();

        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
