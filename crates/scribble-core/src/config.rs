//! Canvas configuration.

use kurbo::Size;

/// Fixed canvas dimensions and marker presets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasConfig {
    /// Drawing surface size in canvas units.
    pub size: Size,
    /// Line width of the thin marker.
    pub thin_width: f64,
    /// Line width of the thick marker.
    pub thick_width: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            size: Size::new(256.0, 256.0),
            thin_width: 2.0,
            thick_width: 5.0,
        }
    }
}

impl CanvasConfig {
    /// Use a different canvas size, keeping the marker presets.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }
}
