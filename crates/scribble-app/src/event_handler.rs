//! Translation of window input into canvas operations.

use kurbo::Point;
use scribble_core::canvas::Canvas;
use scribble_core::input::{InputState, Modifiers, MouseButton, PointerEvent};
use winit::keyboard::{Key, ModifiersState, NamedKey};

use crate::shortcuts::{Command, ShortcutRegistry};

/// Map a winit mouse button to the core button, ignoring extra buttons.
pub fn map_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

pub fn map_modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

/// Name used by the shortcut registry for a logical key.
pub fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Character(c) => Some(c.to_uppercase()),
        Key::Named(NamedKey::Delete) => Some("Delete".to_string()),
        Key::Named(NamedKey::Backspace) => Some("Backspace".to_string()),
        _ => None,
    }
}

/// Tracks the pointer in window coordinates and feeds canvas-space pointer
/// events to the canvas.
#[derive(Debug, Default)]
pub struct EventHandler {
    /// Pointer and modifier state, in canvas coordinates.
    pub input: InputState,
    /// Last cursor position in physical window pixels.
    cursor: Point,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn dispatch(&mut self, canvas: &mut Canvas, event: PointerEvent) {
        self.input.handle_pointer_event(event);
        canvas.handle_pointer(event);
    }

    /// Cursor moved to `screen` (physical pixels) while the UI owns the
    /// pointer: remember where it is, but treat it as off the canvas.
    pub fn cursor_over_ui(&mut self, canvas: &mut Canvas, screen: Point) {
        self.cursor = screen;
        self.pointer_left(canvas);
    }

    /// Cursor moved to `screen` (physical pixels).
    pub fn cursor_moved(&mut self, canvas: &mut Canvas, screen: Point) {
        self.cursor = screen;
        let position = canvas.viewport.screen_to_canvas(screen);

        if canvas.document.contains(position) {
            self.dispatch(canvas, PointerEvent::Move { position });
        } else if self.input.inside {
            self.dispatch(canvas, PointerEvent::Leave);
        }
    }

    /// Mouse button pressed or released at the last cursor position.
    pub fn mouse_input(&mut self, canvas: &mut Canvas, button: MouseButton, pressed: bool) {
        let position = canvas.viewport.screen_to_canvas(self.cursor);
        let event = if pressed {
            PointerEvent::Down { position, button }
        } else {
            PointerEvent::Up { position, button }
        };
        self.dispatch(canvas, event);
    }

    /// The cursor left the window, or the UI took the pointer over.
    pub fn pointer_left(&mut self, canvas: &mut Canvas) {
        if self.input.inside || canvas.is_drawing() {
            self.dispatch(canvas, PointerEvent::Leave);
        }
    }

    pub fn modifiers_changed(&mut self, modifiers: Modifiers) {
        self.input.set_modifiers(modifiers);
    }

    /// Shortcut bound to `key` under the current modifiers.
    pub fn shortcut_for(&self, key: &Key) -> Option<Command> {
        let name = key_name(key)?;
        let mods = self.input.modifiers;
        ShortcutRegistry::find(&name, mods.command(), mods.shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;
    use scribble_core::Viewport;

    fn canvas_at(offset: Vec2, scale: f64) -> Canvas {
        let mut canvas = Canvas::new();
        canvas.viewport = Viewport::new(offset, scale);
        canvas
    }

    #[test]
    fn test_drag_maps_to_canvas_coordinates() {
        let mut canvas = canvas_at(Vec2::new(100.0, 50.0), 2.0);
        let mut handler = EventHandler::new();

        handler.cursor_moved(&mut canvas, Point::new(120.0, 70.0));
        handler.mouse_input(&mut canvas, MouseButton::Left, true);
        handler.cursor_moved(&mut canvas, Point::new(140.0, 90.0));
        handler.mouse_input(&mut canvas, MouseButton::Left, false);

        let stroke = canvas.document.drawables()[0].as_stroke().unwrap();
        assert_eq!(stroke.points(), &[Point::new(10.0, 10.0), Point::new(20.0, 20.0)]);
        assert!(!canvas.is_drawing());
    }

    #[test]
    fn test_press_outside_canvas_draws_nothing() {
        let mut canvas = canvas_at(Vec2::new(100.0, 100.0), 1.0);
        let mut handler = EventHandler::new();

        handler.cursor_moved(&mut canvas, Point::new(10.0, 10.0));
        handler.mouse_input(&mut canvas, MouseButton::Left, true);
        handler.cursor_moved(&mut canvas, Point::new(150.0, 150.0));

        assert!(canvas.document.is_empty());
    }

    #[test]
    fn test_leaving_canvas_ends_stroke() {
        let mut canvas = canvas_at(Vec2::ZERO, 1.0);
        let mut handler = EventHandler::new();

        handler.cursor_moved(&mut canvas, Point::new(250.0, 10.0));
        handler.mouse_input(&mut canvas, MouseButton::Left, true);
        handler.cursor_moved(&mut canvas, Point::new(300.0, 10.0));
        assert!(!canvas.is_drawing());
        assert!(!handler.input.inside);

        // Re-entering with the button still held does not resume drawing.
        handler.cursor_moved(&mut canvas, Point::new(200.0, 10.0));
        assert!(!canvas.is_drawing());
        assert_eq!(canvas.document.drawables()[0].as_stroke().unwrap().len(), 1);
    }

    #[test]
    fn test_pointer_left_ends_stroke() {
        let mut canvas = canvas_at(Vec2::ZERO, 1.0);
        let mut handler = EventHandler::new();

        handler.cursor_moved(&mut canvas, Point::new(20.0, 20.0));
        handler.mouse_input(&mut canvas, MouseButton::Left, true);
        handler.pointer_left(&mut canvas);
        assert!(!canvas.is_drawing());
    }

    #[test]
    fn test_click_after_ui_uses_latest_cursor() {
        let mut canvas = canvas_at(Vec2::ZERO, 1.0);
        let mut handler = EventHandler::new();

        handler.cursor_moved(&mut canvas, Point::new(10.0, 10.0));
        // The UI covers the canvas while the pointer travels.
        handler.cursor_over_ui(&mut canvas, Point::new(80.0, 90.0));
        handler.mouse_input(&mut canvas, MouseButton::Left, true);

        let stroke = canvas.document.drawables()[0].as_stroke().unwrap();
        assert_eq!(stroke.points(), &[Point::new(80.0, 90.0)]);
    }

    #[test]
    fn test_shortcut_uses_modifiers() {
        let mut handler = EventHandler::new();
        let z = Key::Character("z".into());
        assert_eq!(handler.shortcut_for(&z), None);

        handler.modifiers_changed(Modifiers {
            ctrl: true,
            ..Modifiers::default()
        });
        assert_eq!(handler.shortcut_for(&z), Some(Command::Undo));

        handler.modifiers_changed(Modifiers {
            ctrl: true,
            shift: true,
            ..Modifiers::default()
        });
        assert_eq!(handler.shortcut_for(&Key::Character("Z".into())), Some(Command::Redo));
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(key_name(&Key::Named(NamedKey::Delete)).as_deref(), Some("Delete"));
        assert_eq!(key_name(&Key::Named(NamedKey::Enter)), None);
    }
}
