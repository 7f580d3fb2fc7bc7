//! egui toolbar and the custom sticker prompt.

use egui::{Align2, Color32, Context, Pos2, Vec2};
use scribble_core::stickers::{DEFAULT_CUSTOM_ICON, StickerEntry};
use scribble_core::tools::MarkerThickness;
use scribble_widgets::{
    ActionButton, StickerButton, ToggleButton, dialog_frame, panel_frame, section_label,
    vertical_separator,
};

use crate::shortcuts::{Command, ShortcutRegistry};

/// Gap between the toolbar and the top of the canvas, in points.
pub const TOOLBAR_GAP: f32 = 12.0;

/// UI state that persists between frames.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Whether the custom sticker prompt is showing.
    pub sticker_prompt_open: bool,
    /// Text in the custom sticker prompt.
    pub sticker_input: String,
    /// Focus the prompt's text field on the next frame.
    focus_pending: bool,
    /// Bottom edge of the toolbar in points, used to place the canvas.
    pub toolbar_bottom: f32,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sticker_prompt_open: false,
            sticker_input: DEFAULT_CUSTOM_ICON.to_string(),
            focus_pending: false,
            toolbar_bottom: 0.0,
        }
    }
}

impl UiState {
    /// Show the custom sticker prompt, pre-filled with the default icon.
    pub fn open_sticker_prompt(&mut self) {
        self.sticker_prompt_open = true;
        self.sticker_input = DEFAULT_CUSTOM_ICON.to_string();
        self.focus_pending = true;
    }

    /// Close the prompt and hand back what was typed.
    fn submit_sticker_prompt(&mut self) -> UiAction {
        self.sticker_prompt_open = false;
        UiAction::AddCustomSticker(std::mem::take(&mut self.sticker_input))
    }

    fn cancel_sticker_prompt(&mut self) {
        self.sticker_prompt_open = false;
    }
}

/// Canvas state the toolbar reflects.
pub struct CanvasStatus<'a> {
    pub thickness: MarkerThickness,
    pub can_undo: bool,
    pub can_redo: bool,
    pub stickers: &'a [StickerEntry],
}

/// Actions the UI asks the app to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SetThickness(MarkerThickness),
    PlaceSticker(String),
    OpenStickerPrompt,
    AddCustomSticker(String),
    Clear,
    Undo,
    Redo,
    ExportPng,
}

impl From<Command> for UiAction {
    fn from(command: Command) -> Self {
        match command {
            Command::Undo => UiAction::Undo,
            Command::Redo => UiAction::Redo,
            Command::ExportPng => UiAction::ExportPng,
            Command::ThinMarker => UiAction::SetThickness(MarkerThickness::Thin),
            Command::ThickMarker => UiAction::SetThickness(MarkerThickness::Thick),
            Command::Clear => UiAction::Clear,
        }
    }
}

fn hint(command: Command) -> String {
    ShortcutRegistry::hint(command).unwrap_or_default()
}

/// Render the whole UI. Returns at most one action per frame.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState, status: &CanvasStatus) -> Option<UiAction> {
    let toolbar_action = render_toolbar(ctx, ui_state, status);
    let prompt_action = if ui_state.sticker_prompt_open {
        render_sticker_prompt(ctx, ui_state)
    } else {
        None
    };

    // The prompt is modal: toolbar clicks behind it are dropped.
    if ui_state.sticker_prompt_open || prompt_action.is_some() {
        return prompt_action;
    }
    toolbar_action
}

fn render_toolbar(ctx: &Context, ui_state: &mut UiState, status: &CanvasStatus) -> Option<UiAction> {
    let mut action = None;

    let response = egui::Area::new(egui::Id::new("toolbar"))
        .anchor(Align2::CENTER_TOP, Vec2::new(0.0, TOOLBAR_GAP))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(
                        egui::RichText::new("Drawing App")
                            .size(18.0)
                            .strong()
                            .color(Color32::from_gray(30)),
                    );
                });
                ui.add_space(6.0);

                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing.x = 4.0;

                    if ActionButton::new("Create Custom Sticker").show(ui) {
                        action = Some(UiAction::OpenStickerPrompt);
                    }
                    vertical_separator(ui);

                    for thickness in MarkerThickness::ALL {
                        let command = match thickness {
                            MarkerThickness::Thin => Command::ThinMarker,
                            MarkerThickness::Thick => Command::ThickMarker,
                        };
                        let shortcut = hint(command);
                        let selected = status.thickness == thickness;
                        if ToggleButton::new(thickness.label(), selected)
                            .shortcut(&shortcut)
                            .min_width(48.0)
                            .show(ui)
                        {
                            action = Some(UiAction::SetThickness(thickness));
                        }
                    }
                    vertical_separator(ui);

                    let clear_hint = hint(Command::Clear);
                    if ActionButton::new("Clear").shortcut(&clear_hint).show(ui) {
                        action = Some(UiAction::Clear);
                    }
                    let undo_hint = hint(Command::Undo);
                    if ActionButton::new("Undo")
                        .enabled(status.can_undo)
                        .shortcut(&undo_hint)
                        .show(ui)
                    {
                        action = Some(UiAction::Undo);
                    }
                    let redo_hint = hint(Command::Redo);
                    if ActionButton::new("Redo")
                        .enabled(status.can_redo)
                        .shortcut(&redo_hint)
                        .show(ui)
                    {
                        action = Some(UiAction::Redo);
                    }
                    vertical_separator(ui);

                    let export_hint = hint(Command::ExportPng);
                    if ActionButton::new("Export").shortcut(&export_hint).show(ui) {
                        action = Some(UiAction::ExportPng);
                    }
                });

                ui.add_space(6.0);

                ui.horizontal(|ui| {
                    section_label(ui, "Stickers");
                    ui.add_space(4.0);
                    for entry in status.stickers {
                        if StickerButton::new(&entry.icon, &entry.name).show(ui) {
                            action = Some(UiAction::PlaceSticker(entry.icon.clone()));
                        }
                    }
                });
            });
        })
        .response;

    ui_state.toolbar_bottom = response.rect.bottom();
    action
}

fn render_sticker_prompt(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    // Backdrop
    egui::Area::new(egui::Id::new("sticker_prompt_backdrop"))
        .fixed_pos(Pos2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            let screen_rect = ctx.input(|i| i.content_rect());
            let response = ui.allocate_rect(screen_rect, egui::Sense::click());
            ui.painter()
                .rect_filled(screen_rect, 0.0, Color32::from_black_alpha(80));
            if response.clicked() {
                ui_state.cancel_sticker_prompt();
            }
        });

    egui::Area::new(egui::Id::new("sticker_prompt"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Tooltip)
        .show(ctx, |ui| {
            dialog_frame().show(ui, |ui| {
                ui.set_width(260.0);
                ui.label(
                    egui::RichText::new("Enter a custom emoji:")
                        .size(14.0)
                        .strong()
                        .color(Color32::from_gray(30)),
                );
                ui.add_space(10.0);

                let response = ui.add(
                    egui::TextEdit::singleline(&mut ui_state.sticker_input)
                        .desired_width(f32::INFINITY)
                        .font(egui::FontId::proportional(18.0)),
                );
                if std::mem::take(&mut ui_state.focus_pending) {
                    response.request_focus();
                }
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    if ActionButton::new("Cancel").show(ui) {
                        ui_state.cancel_sticker_prompt();
                    }
                    if ActionButton::new("Add").show(ui) || submitted {
                        action = Some(ui_state.submit_sticker_prompt());
                    }
                });

                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    ui_state.cancel_sticker_prompt();
                }
            });
        });

    action
}
