//! Sticker palette.

use thiserror::Error;

/// Icon the custom-sticker prompt starts with.
pub const DEFAULT_CUSTOM_ICON: &str = "💬";

/// Errors from editing the palette.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StickerError {
    #[error("sticker icon is empty")]
    Empty,
}

/// A named glyph the user can stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerEntry {
    pub name: String,
    pub icon: String,
}

impl StickerEntry {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
        }
    }
}

/// Ordered list of available stickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerPalette {
    entries: Vec<StickerEntry>,
}

impl Default for StickerPalette {
    fn default() -> Self {
        Self {
            entries: vec![
                StickerEntry::new("Star", "⭐"),
                StickerEntry::new("Heart", "❤️"),
                StickerEntry::new("Smiley", "😊"),
            ],
        }
    }
}

impl StickerPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[StickerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a user-supplied sticker named after its position in the palette.
    ///
    /// The icon is stored as typed; only blank input is rejected.
    pub fn add_custom(&mut self, icon: &str) -> Result<&StickerEntry, StickerError> {
        if icon.trim().is_empty() {
            return Err(StickerError::Empty);
        }

        let name = format!("Custom Sticker {}", self.entries.len() + 1);
        log::info!("Added sticker {name:?} ({icon})");
        self.entries.push(StickerEntry::new(name, icon));
        Ok(&self.entries[self.entries.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_entries() {
        let palette = StickerPalette::new();
        let names: Vec<&str> = palette.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Star", "Heart", "Smiley"]);
        assert_eq!(palette.entries()[0].icon, "⭐");
    }

    #[test]
    fn test_add_custom_numbers_after_existing() {
        let mut palette = StickerPalette::new();
        let entry = palette.add_custom("🐸").unwrap();
        assert_eq!(entry.name, "Custom Sticker 4");
        assert_eq!(entry.icon, "🐸");

        let entry = palette.add_custom("🍕").unwrap();
        assert_eq!(entry.name, "Custom Sticker 5");
        assert_eq!(palette.len(), 5);
    }

    #[test]
    fn test_add_custom_rejects_blank() {
        let mut palette = StickerPalette::new();
        assert_eq!(palette.add_custom(""), Err(StickerError::Empty));
        assert_eq!(palette.add_custom("   "), Err(StickerError::Empty));
        assert_eq!(palette.len(), 3);
    }
}
