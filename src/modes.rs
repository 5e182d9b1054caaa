//! Cursor mode registry
//!
//! Maps an editing-mode name ("normal", "insert", ...) to the cursor
//! rendering descriptor the pixel surface should use while that mode is
//! active. Shape and size come straight out of the mode-info instruction;
//! the color arrives later through asynchronous highlight resolution and
//! may land after any number of subsequent batches.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::color::RgbColor;

/// Cursor visual style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorShape {
    /// Block cursor (filled cell)
    #[default]
    Block,
    /// Underline cursor
    Underline,
    /// Vertical bar cursor
    Bar,
}

impl CursorShape {
    /// Map the wire vocabulary to a shape, defaulting to block for
    /// unrecognized or missing values
    pub fn from_wire(name: Option<&str>) -> Self {
        match name {
            Some("block") => CursorShape::Block,
            Some("horizontal") => CursorShape::Underline,
            Some("vertical") => CursorShape::Bar,
            _ => CursorShape::Block,
        }
    }
}

/// Cursor rendering descriptor for one editing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModeInfo {
    pub shape: CursorShape,
    /// Cell percentage for underline/bar shapes
    pub size: Option<u8>,
    /// Resolved cursor color; `None` until (and unless) resolution lands
    pub color: Option<RgbColor>,
}

/// Mode descriptors keyed by mode name
#[derive(Debug, Clone, Default)]
pub struct ModeRegistry {
    modes: HashMap<String, ModeInfo>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, info: ModeInfo) {
        self.modes.insert(name, info);
    }

    pub fn get(&self, name: &str) -> Option<&ModeInfo> {
        self.modes.get(name)
    }

    /// Merge a resolved color into a mode's descriptor.
    ///
    /// Accepted unconditionally, last writer wins: a completion that
    /// arrives after the mode table was replaced still lands.
    pub fn set_color(&mut self, name: &str, color: RgbColor) {
        trace!(mode = name, %color, "resolved cursor color");
        self.modes.entry(name.to_string()).or_default().color = Some(color);
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_vocabulary() {
        assert_eq!(CursorShape::from_wire(Some("block")), CursorShape::Block);
        assert_eq!(
            CursorShape::from_wire(Some("horizontal")),
            CursorShape::Underline
        );
        assert_eq!(CursorShape::from_wire(Some("vertical")), CursorShape::Bar);
    }

    #[test]
    fn test_shape_defaults_to_block() {
        assert_eq!(CursorShape::from_wire(None), CursorShape::Block);
        assert_eq!(CursorShape::from_wire(Some("wedge")), CursorShape::Block);
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = ModeRegistry::new();
        registry.insert(
            "insert".to_string(),
            ModeInfo {
                shape: CursorShape::Bar,
                size: Some(25),
                color: None,
            },
        );
        let info = registry.get("insert").unwrap();
        assert_eq!(info.shape, CursorShape::Bar);
        assert_eq!(info.size, Some(25));
        assert!(info.color.is_none());
        assert!(registry.get("replace").is_none());
    }

    #[test]
    fn test_set_color_merges_into_entry() {
        let mut registry = ModeRegistry::new();
        registry.insert(
            "normal".to_string(),
            ModeInfo {
                shape: CursorShape::Block,
                size: None,
                color: None,
            },
        );
        registry.set_color("normal", RgbColor::new(1, 2, 3));
        let info = registry.get("normal").unwrap();
        assert_eq!(info.shape, CursorShape::Block);
        assert_eq!(info.color, Some(RgbColor::new(1, 2, 3)));
    }

    #[test]
    fn test_set_color_last_writer_wins() {
        let mut registry = ModeRegistry::new();
        registry.set_color("normal", RgbColor::new(1, 1, 1));
        registry.set_color("normal", RgbColor::new(2, 2, 2));
        assert_eq!(
            registry.get("normal").unwrap().color,
            Some(RgbColor::new(2, 2, 2))
        );
    }
}
