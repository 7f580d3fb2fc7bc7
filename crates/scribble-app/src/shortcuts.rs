//! Keyboard shortcut registry and documentation.

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Undo,
    Redo,
    ExportPng,
    ThinMarker,
    ThickMarker,
    Clear,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
    pub command: Command,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
        command: Command,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
            command,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Key names compare case-insensitively; modifiers must match exactly.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        self.ctrl == ctrl && self.shift == shift && self.key.eq_ignore_ascii_case(key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, "Undo", Command::Undo),
            Shortcut::new("Z", true, true, "Redo", Command::Redo),
            Shortcut::new("Y", true, false, "Redo", Command::Redo),
            Shortcut::new("E", true, false, "Export to PNG", Command::ExportPng),
            Shortcut::new("1", false, false, "Thin marker", Command::ThinMarker),
            Shortcut::new("2", false, false, "Thick marker", Command::ThickMarker),
            Shortcut::new("Delete", false, false, "Clear canvas", Command::Clear),
            Shortcut::new("Backspace", false, false, "Clear canvas", Command::Clear),
        ]
    }

    /// Find the command bound to `key` with the given modifiers.
    pub fn find(key: &str, ctrl: bool, shift: bool) -> Option<Command> {
        Self::all()
            .into_iter()
            .find(|s| s.matches(key, ctrl, shift))
            .map(|s| s.command)
    }

    /// Display string of the first shortcut bound to `command`.
    pub fn hint(command: Command) -> Option<String> {
        Self::all()
            .into_iter()
            .find(|s| s.command == command)
            .map(|s| s.format())
    }

    /// Log all shortcuts.
    pub fn log_all() {
        for shortcut in Self::all() {
            log::info!("  {:16} {}", shortcut.format(), shortcut.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_bindings() {
        assert_eq!(ShortcutRegistry::find("z", true, false), Some(Command::Undo));
        assert_eq!(ShortcutRegistry::find("Z", true, true), Some(Command::Redo));
        assert_eq!(ShortcutRegistry::find("y", true, false), Some(Command::Redo));
    }

    #[test]
    fn test_modifiers_must_match() {
        assert_eq!(ShortcutRegistry::find("z", false, false), None);
        assert_eq!(ShortcutRegistry::find("1", true, false), None);
        assert_eq!(ShortcutRegistry::find("1", false, false), Some(Command::ThinMarker));
    }

    #[test]
    fn test_clear_keys() {
        assert_eq!(ShortcutRegistry::find("Delete", false, false), Some(Command::Clear));
        assert_eq!(ShortcutRegistry::find("Backspace", false, false), Some(Command::Clear));
    }

    #[test]
    fn test_hint_format() {
        assert_eq!(ShortcutRegistry::hint(Command::Redo).as_deref(), Some("Ctrl+Shift+Z"));
        assert_eq!(ShortcutRegistry::hint(Command::ExportPng).as_deref(), Some("Ctrl+E"));
    }
}
