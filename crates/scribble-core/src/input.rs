//! Pointer and modifier state, independent of the windowing backend.

use kurbo::Point;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer events, positions in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
    /// The pointer left the drawing surface.
    Leave,
}

/// Where the pointer is and which modifiers are held.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    /// Last pointer position in canvas coordinates.
    pub pointer_position: Point,
    /// Whether the pointer is over the drawing surface.
    pub inside: bool,
    pub modifiers: Modifiers,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, .. } | PointerEvent::Move { position } => {
                self.pointer_position = position;
                self.inside = true;
            }
            PointerEvent::Up { position, .. } => self.pointer_position = position,
            PointerEvent::Leave => self.inside = false,
        }
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }
}
