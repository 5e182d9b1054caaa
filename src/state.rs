//! Renderer screen state
//!
//! The mutable state a redraw batch reads and writes: the three screen
//! colors, the current highlight attributes, the cursor position, and the
//! last declared scroll region. Everything lives in one owned
//! [`RendererState`] value constructed per grid session, so tests get a
//! fresh state per case and no state leaks between sessions.

use serde::{Deserialize, Serialize};

use crate::color::RgbColor;
use crate::Dimensions;

/// The three live screen colors, each independently updatable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenColors {
    pub foreground: RgbColor,
    pub background: RgbColor,
    pub special: RgbColor,
}

impl Default for ScreenColors {
    fn default() -> Self {
        Self {
            foreground: RgbColor::new(0xcc, 0xcc, 0xcc),
            background: RgbColor::new(0x22, 0x22, 0x22),
            special: RgbColor::new(0xff, 0x00, 0x00),
        }
    }
}

impl ScreenColors {
    /// Update the foreground; negative (unset) values are a no-op
    pub fn set_foreground(&mut self, packed: i64) {
        if let Some(color) = RgbColor::unpack(packed) {
            self.foreground = color;
        }
    }

    /// Update the background; negative (unset) values are a no-op
    pub fn set_background(&mut self, packed: i64) {
        if let Some(color) = RgbColor::unpack(packed) {
            self.background = color;
        }
    }

    /// Update the special (underline/undercurl) color; negative is a no-op
    pub fn set_special(&mut self, packed: i64) {
        if let Some(color) = RgbColor::unpack(packed) {
            self.special = color;
        }
    }
}

/// Resolved highlight attributes applied to subsequent glyph writes
///
/// Fully replaced on every highlight-set instruction; `reverse` is applied
/// while resolving, so the stored value already has fg/bg swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attrs {
    pub foreground: RgbColor,
    pub background: RgbColor,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub undercurl: bool,
}

impl Attrs {
    /// Plain attributes carrying the screen's default colors
    pub fn from_colors(colors: &ScreenColors) -> Self {
        Self {
            foreground: colors.foreground,
            background: colors.background,
            bold: false,
            italic: false,
            underline: false,
            undercurl: false,
        }
    }
}

/// Cursor position in grid cells (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    /// Move to an absolute position, clamping to grid bounds
    pub fn move_to(&mut self, row: usize, col: usize, dims: Dimensions) {
        self.row = row.min(dims.rows.saturating_sub(1));
        self.col = col.min(dims.cols.saturating_sub(1));
    }
}

/// Scroll region bounds in grid cells, all inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollRegion {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl ScrollRegion {
    /// The region covering the whole grid
    pub fn full(dims: Dimensions) -> Self {
        Self {
            top: 0,
            bottom: dims.rows.saturating_sub(1),
            left: 0,
            right: dims.cols.saturating_sub(1),
        }
    }

    /// Clamp the bounds into the grid so surface calls stay in range
    pub fn clamped(mut self, dims: Dimensions) -> Self {
        self.bottom = self.bottom.min(dims.rows.saturating_sub(1));
        self.right = self.right.min(dims.cols.saturating_sub(1));
        self.top = self.top.min(self.bottom);
        self.left = self.left.min(self.right);
        self
    }

    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }
}

/// All mutable per-session renderer state
#[derive(Debug, Clone)]
pub struct RendererState {
    /// Current screen colors
    pub colors: ScreenColors,
    /// The single live "next attrs" value used by glyph writes
    pub attrs: Attrs,
    /// Cursor cell position
    pub cursor: Cursor,
    /// Last declared scroll region; consumed by the next scroll and also
    /// cleared at the end of every batch
    pub scroll_region: Option<ScrollRegion>,
}

impl RendererState {
    pub fn new(colors: ScreenColors) -> Self {
        Self {
            colors,
            attrs: Attrs::from_colors(&colors),
            cursor: Cursor::default(),
            scroll_region: None,
        }
    }
}

impl Default for RendererState {
    fn default() -> Self {
        Self::new(ScreenColors::default())
    }
}
