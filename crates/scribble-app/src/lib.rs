//! Scribble Application
//!
//! The application shell: window, GPU surface, egui toolbar, input routing
//! and PNG export, for native and WASM.

mod app;
mod event_handler;
pub mod export;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig, apply_action};
pub use export::ExportError;
pub use shortcuts::{Command, Shortcut, ShortcutRegistry};
pub use ui::{CanvasStatus, UiAction, UiState, render_ui};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
