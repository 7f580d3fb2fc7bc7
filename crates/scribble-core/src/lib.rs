//! Scribble Core Library
//!
//! Platform-agnostic drawing model: strokes and stickers on a fixed-size
//! canvas with a two-stack undo/redo history.

pub mod canvas;
pub mod config;
pub mod drawables;
pub mod events;
pub mod history;
pub mod input;
pub mod stickers;
pub mod tools;
pub mod viewport;

pub use canvas::{Canvas, CanvasDocument};
pub use config::CanvasConfig;
pub use drawables::{Drawable, DrawableKind, Sticker, Stroke};
pub use events::{CanvasEvent, EventQueue};
pub use history::History;
pub use input::{InputState, Modifiers, MouseButton, PointerEvent};
pub use stickers::{StickerEntry, StickerError, StickerPalette};
pub use tools::{MarkerThickness, ToolManager};
pub use viewport::Viewport;
