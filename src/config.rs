//! Renderer configuration
//!
//! Grid geometry and the startup palette, loadable from a JSON file. The
//! grid size is fixed for the renderer's lifetime, so configuration is
//! read once when a session starts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::RgbColor;
use crate::state::ScreenColors;
use crate::Dimensions;

/// Renderer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grid width in cells
    pub cols: usize,
    /// Grid height in cells
    pub rows: usize,
    /// Startup palette
    pub colors: PaletteConfig,
}

/// Startup screen colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub foreground: (u8, u8, u8),
    pub background: (u8, u8, u8),
    pub special: (u8, u8, u8),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 24,
            colors: PaletteConfig::default(),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            foreground: (0xcc, 0xcc, 0xcc),
            background: (0x22, 0x22, 0x22),
            special: (0xff, 0x00, 0x00),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.cols, self.rows)
    }

    pub fn screen_colors(&self) -> ScreenColors {
        let (fr, fg, fb) = self.colors.foreground;
        let (br, bg, bb) = self.colors.background;
        let (sr, sg, sb) = self.colors.special;
        ScreenColors {
            foreground: RgbColor::new(fr, fg, fb),
            background: RgbColor::new(br, bg, bb),
            special: RgbColor::new(sr, sg, sb),
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
