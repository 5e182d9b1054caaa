//! Neoscreen - incremental screen renderer for the Neovim redraw protocol
//!
//! This crate sits between a Neovim process and a pixel display surface.
//! Neovim emits ordered batches of abstract screen-update instructions
//! (clear, write glyphs, change colors, scroll, move cursor, change cursor
//! shape); neoscreen applies them to a fixed-size character grid and
//! materializes them as pixel-surface calls:
//!
//! - `color`: packed-integer color codec
//! - `state`: screen colors, highlight attributes, cursor, scroll region
//! - `modes`: cursor mode registry (shape, size, resolved color)
//! - `event`: redraw instruction decoding from the transport's JSON form
//! - `render`: the batch dispatcher and incremental grid renderer
//! - `resolver`: asynchronous highlight-id to color resolution
//! - `surface`: the pixel-surface boundary trait
//!
//! The renderer is deterministic: given the same sequence of batches and
//! resolver completions, it issues the same sequence of surface calls.
//! Scrolling is a block-copy of already-rendered pixels, never a glyph
//! repaint.

pub mod color;
pub mod config;
pub mod event;
pub mod modes;
pub mod render;
pub mod resolver;
pub mod state;
pub mod surface;

pub use color::RgbColor;
pub use config::{Config, ConfigError};
pub use event::{decode_batch, HighlightAttrs, ModeInfoPayload, ProtocolError, RedrawEvent};
pub use modes::{CursorShape, ModeInfo, ModeRegistry};
pub use render::Renderer;
pub use resolver::{ChannelResolver, ColorResolution, ColorResolver, NullResolver};
pub use state::{Attrs, Cursor, RendererState, ScreenColors, ScrollRegion};
pub use surface::{RecordingSurface, Surface, SurfaceCall};

/// Grid dimensions, fixed for the renderer's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub cols: usize,
    pub rows: usize,
}

impl Dimensions {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self { cols: 80, rows: 24 }
    }
}
