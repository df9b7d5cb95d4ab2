//! Visual schemes
//!
//! A scheme is the read-only visual configuration an element is painted
//! with. An element without a resolvable scheme has nothing to draw.

use heapless::Vec;

use super::asset::FontId;
use crate::geometry::Color;

/// Scheme identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SchemeId(pub u8);

/// Border drawn inside an element's rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BorderStyle {
    pub color: Color,
    /// Thickness in pixels
    pub width: u8,
}

/// Visual configuration shared by elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scheme {
    /// Background fill (`None` = transparent, background not drawn)
    pub background: Option<Color>,
    /// Fill used while an element is pressed/active
    pub active_background: Option<Color>,
    /// Text color
    pub foreground: Color,
    /// Indicator and cursor color
    pub accent: Color,
    /// Border, if any
    pub border: Option<BorderStyle>,
    /// Text font (`None` = text not drawn)
    pub font: Option<FontId>,
    /// Space between border and content (pixels)
    pub padding: u8,
}

impl Scheme {
    /// Pixels from the element edge to its content area
    pub fn content_inset(&self) -> u32 {
        self.border.map_or(0, |b| b.width as u32) + self.padding as u32
    }
}

impl Default for Scheme {
    fn default() -> Self {
        Self {
            background: Some(Color::WHITE),
            active_background: None,
            foreground: Color::BLACK,
            accent: Color::BLACK,
            border: None,
            font: None,
            padding: 2,
        }
    }
}

/// Scheme lookup consulted once per element per frame
pub trait SchemeLookup {
    fn scheme(&self, id: SchemeId) -> Option<&Scheme>;
}

/// Fixed-capacity scheme table
#[derive(Debug, Clone, Default)]
pub struct SchemeTable<const N: usize> {
    entries: Vec<(SchemeId, Scheme), N>,
}

impl<const N: usize> SchemeTable<N> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace a scheme
    ///
    /// Returns the scheme back if the table is full.
    pub fn insert(&mut self, id: SchemeId, scheme: Scheme) -> Result<(), Scheme> {
        if let Some(entry) = self.entries.iter_mut().find(|(i, _)| *i == id) {
            entry.1 = scheme;
            return Ok(());
        }
        self.entries.push((id, scheme)).map_err(|(_, s)| s)
    }

    /// Remove a scheme; elements using it stop drawing on their next frame
    pub fn remove(&mut self, id: SchemeId) -> Option<Scheme> {
        let index = self.entries.iter().position(|(i, _)| *i == id)?;
        Some(self.entries.swap_remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<const N: usize> SchemeLookup for SchemeTable<N> {
    fn scheme(&self, id: SchemeId) -> Option<&Scheme> {
        self.entries.iter().find(|(i, _)| *i == id).map(|(_, s)| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut table: SchemeTable<2> = SchemeTable::new();
        assert!(table.insert(SchemeId(1), Scheme::default()).is_ok());
        assert!(table.scheme(SchemeId(1)).is_some());
        assert!(table.scheme(SchemeId(2)).is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut table: SchemeTable<1> = SchemeTable::new();
        let _ = table.insert(SchemeId(1), Scheme::default());
        let dark = Scheme {
            background: Some(Color::BLACK),
            ..Default::default()
        };
        assert!(table.insert(SchemeId(1), dark).is_ok());
        assert_eq!(table.len(), 1);
        assert_eq!(table.scheme(SchemeId(1)).map(|s| s.background), Some(Some(Color::BLACK)));
    }

    #[test]
    fn test_full_table_rejects() {
        let mut table: SchemeTable<1> = SchemeTable::new();
        let _ = table.insert(SchemeId(1), Scheme::default());
        assert!(table.insert(SchemeId(2), Scheme::default()).is_err());
    }

    #[test]
    fn test_content_inset() {
        let scheme = Scheme {
            border: Some(BorderStyle {
                color: Color::BLACK,
                width: 2,
            }),
            padding: 3,
            ..Default::default()
        };
        assert_eq!(scheme.content_inset(), 5);
    }
}
