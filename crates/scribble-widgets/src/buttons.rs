//! Button components: toggle buttons, action buttons, sticker buttons.

use egui::{Align2, Color32, CornerRadius, CursorIcon, FontId, Response, Sense, Ui, vec2};

use crate::{sizing, theme};

/// Width of `label` in `font_id` plus horizontal padding.
fn padded_text_width(ui: &Ui, label: &str, font_id: &FontId) -> f32 {
    let galley = ui.painter().layout_no_wrap(
        label.to_string(),
        font_id.clone(),
        Color32::PLACEHOLDER, // Color doesn't matter for sizing
    );
    galley.size().x + 16.0
}

/// Attach the tooltip, with an optional shortcut hint after it.
fn with_tooltip(response: Response, tooltip: Option<&str>, shortcut: Option<&str>) -> Response {
    match (tooltip, shortcut) {
        (Some(tooltip), Some(shortcut)) => response.on_hover_ui(|ui| {
            ui.horizontal(|ui| {
                ui.label(tooltip);
                ui.label(
                    egui::RichText::new(format!("({shortcut})"))
                        .color(Color32::from_gray(128))
                        .small(),
                );
            });
        }),
        (Some(tooltip), None) => response.on_hover_text(tooltip),
        (None, Some(shortcut)) => response.on_hover_text(shortcut),
        (None, None) => response,
    }
}

/// A toggle button with text label.
/// Uses solid blue background when selected.
pub struct ToggleButton<'a> {
    label: &'a str,
    selected: bool,
    shortcut: Option<&'a str>,
    min_width: Option<f32>,
    height: f32,
}

impl<'a> ToggleButton<'a> {
    /// Create a new toggle button.
    pub fn new(label: &'a str, selected: bool) -> Self {
        Self {
            label,
            selected,
            shortcut: None,
            min_width: None,
            height: sizing::BUTTON_HEIGHT,
        }
    }

    /// Set keyboard shortcut (shown in hover tooltip).
    pub fn shortcut(mut self, shortcut: &'a str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Set minimum width.
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = FontId::proportional(12.0);
        let text_width = padded_text_width(ui, self.label, &font_id);
        let width = self.min_width.unwrap_or(text_width).max(text_width);

        let (rect, response) = ui.allocate_exact_size(vec2(width, self.height), Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                theme::ACCENT
            } else if response.hovered() {
                theme::HOVER_BG
            } else {
                theme::BUTTON_BG
            };
            let text_color = if self.selected {
                Color32::WHITE
            } else {
                theme::TEXT
            };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter()
                .text(rect.center(), Align2::CENTER_CENTER, self.label, font_id, text_color);
        }

        let clicked = response.clicked();
        with_tooltip(response, None, self.shortcut).on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// A plain command button that can be disabled.
pub struct ActionButton<'a> {
    label: &'a str,
    enabled: bool,
    shortcut: Option<&'a str>,
}

impl<'a> ActionButton<'a> {
    /// Create a new action button.
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            enabled: true,
            shortcut: None,
        }
    }

    /// Grey the button out and ignore clicks when `enabled` is false.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Add a shortcut hint.
    pub fn shortcut(mut self, shortcut: &'a str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Show the button and return true if clicked while enabled.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = FontId::proportional(12.0);
        let width = padded_text_width(ui, self.label, &font_id);
        let sense = if self.enabled {
            Sense::click()
        } else {
            Sense::hover()
        };
        let (rect, response) =
            ui.allocate_exact_size(vec2(width, sizing::BUTTON_HEIGHT), sense);

        if ui.is_rect_visible(rect) {
            let bg_color = if self.enabled && response.hovered() {
                theme::HOVER_BG
            } else {
                theme::BUTTON_BG
            };
            let text_color = if self.enabled {
                theme::TEXT
            } else {
                theme::TEXT_DISABLED
            };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter()
                .text(rect.center(), Align2::CENTER_CENTER, self.label, font_id, text_color);
        }

        let clicked = self.enabled && response.clicked();
        let response = with_tooltip(response, None, self.shortcut);
        if self.enabled {
            response.on_hover_cursor(CursorIcon::PointingHand);
        }
        clicked
    }
}

/// A square button showing a sticker glyph, named in its tooltip.
pub struct StickerButton<'a> {
    icon: &'a str,
    name: &'a str,
}

impl<'a> StickerButton<'a> {
    pub fn new(icon: &'a str, name: &'a str) -> Self {
        Self { icon, name }
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let size = vec2(sizing::STICKER, sizing::STICKER);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if response.hovered() {
                theme::HOVER_BG
            } else {
                theme::BUTTON_BG
            };
            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.icon,
                FontId::proportional(20.0),
                theme::TEXT,
            );
        }

        let clicked = response.clicked();
        with_tooltip(response, Some(self.name), None).on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}
