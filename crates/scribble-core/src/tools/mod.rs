//! Marker tool state.

use crate::config::CanvasConfig;

/// Marker thickness presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MarkerThickness {
    #[default]
    Thin,
    Thick,
}

impl MarkerThickness {
    pub const ALL: [MarkerThickness; 2] = [MarkerThickness::Thin, MarkerThickness::Thick];

    pub fn label(&self) -> &'static str {
        match self {
            MarkerThickness::Thin => "Thin",
            MarkerThickness::Thick => "Thick",
        }
    }
}

/// State of a marker interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolState {
    /// Waiting for a pointer press.
    #[default]
    Idle,
    /// A stroke is in progress; the history top is the stroke being drawn.
    Drawing,
}

/// Selected marker and the drawing state machine.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected thickness.
    pub thickness: MarkerThickness,
    /// Current state of the tool.
    pub state: ToolState,
    thin_width: f64,
    thick_width: f64,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl ToolManager {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            thickness: MarkerThickness::default(),
            state: ToolState::Idle,
            thin_width: config.thin_width,
            thick_width: config.thick_width,
        }
    }

    /// Line width of the selected thickness.
    pub fn current_width(&self) -> f64 {
        self.width_of(self.thickness)
    }

    pub fn width_of(&self, thickness: MarkerThickness) -> f64 {
        match thickness {
            MarkerThickness::Thin => self.thin_width,
            MarkerThickness::Thick => self.thick_width,
        }
    }

    /// Begin a tool interaction.
    pub fn begin(&mut self) {
        self.state = ToolState::Drawing;
    }

    /// End the current interaction. Returns whether one was active.
    pub fn end(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = ToolState::Idle;
        was_active
    }

    /// Check if currently in an active interaction.
    pub fn is_active(&self) -> bool {
        self.state == ToolState::Drawing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_thin() {
        let tools = ToolManager::default();
        assert_eq!(tools.thickness, MarkerThickness::Thin);
        assert!((tools.current_width() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_thick_width() {
        let mut tools = ToolManager::default();
        tools.thickness = MarkerThickness::Thick;
        assert!((tools.current_width() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tool_lifecycle() {
        let mut tools = ToolManager::default();
        assert!(!tools.is_active());

        tools.begin();
        assert!(tools.is_active());
        assert_eq!(tools.state, ToolState::Drawing);

        assert!(tools.end());
        assert!(!tools.is_active());
        assert!(!tools.end());
    }

    #[test]
    fn test_thickness_change_keeps_state() {
        let mut tools = ToolManager::default();
        tools.begin();
        tools.thickness = MarkerThickness::Thick;
        assert!(tools.is_active());
        assert!((tools.current_width() - 5.0).abs() < f64::EPSILON);
    }
}
