//! Batch dispatcher and incremental grid renderer
//!
//! [`Renderer`] owns the per-session state and applies one ordered redraw
//! batch at a time. Each event goes through a single exhaustive match, so
//! every instruction kind has a handler by construction. Scrolling is a
//! block copy of already-rendered pixels followed by a background fill of
//! the exposed strip - the performance-critical path this renderer exists
//! to get right.
//!
//! Batch processing is synchronous and non-preemptible. Two things run
//! outside it: the coalesced cursor repaint (scheduled at batch end,
//! performed on the next [`Renderer::idle`] tick) and resolver completions
//! (drained between batches via [`Renderer::drain_resolutions`]).

use std::sync::mpsc::Receiver;

use tracing::{debug, trace};

use crate::color::RgbColor;
use crate::event::{HighlightAttrs, ModeInfoPayload, RedrawEvent};
use crate::modes::{CursorShape, ModeInfo, ModeRegistry};
use crate::resolver::{ColorResolution, ColorResolver};
use crate::state::{Attrs, RendererState, ScreenColors, ScrollRegion};
use crate::surface::Surface;
use crate::Dimensions;

/// Applies redraw batches to a pixel surface for one fixed-size grid
pub struct Renderer<S: Surface> {
    dims: Dimensions,
    state: RendererState,
    modes: ModeRegistry,
    active_mode: Option<String>,
    resolver: Box<dyn ColorResolver>,
    pending_cursor_paint: bool,
    surface: S,
}

impl<S: Surface> Renderer<S> {
    pub fn new(dims: Dimensions, surface: S, resolver: Box<dyn ColorResolver>) -> Self {
        Self::with_colors(dims, ScreenColors::default(), surface, resolver)
    }

    pub fn with_colors(
        dims: Dimensions,
        colors: ScreenColors,
        surface: S,
        resolver: Box<dyn ColorResolver>,
    ) -> Self {
        Self {
            dims,
            state: RendererState::new(colors),
            modes: ModeRegistry::new(),
            active_mode: None,
            resolver,
            pending_cursor_paint: false,
            surface,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn state(&self) -> &RendererState {
        &self.state
    }

    pub fn modes(&self) -> &ModeRegistry {
        &self.modes
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The color the cursor renders with right now: the active mode's
    /// resolved color, or the default foreground until one lands
    pub fn cursor_color(&self) -> RgbColor {
        self.active_mode
            .as_deref()
            .and_then(|name| self.modes.get(name))
            .and_then(|info| info.color)
            .unwrap_or(self.state.colors.foreground)
    }

    /// Apply one ordered batch of events.
    ///
    /// After the last event the stored scroll region is invalidated and a
    /// cursor repaint is scheduled for the next idle tick, so several
    /// cursor moves inside one batch coalesce into a single paint.
    pub fn apply_batch(&mut self, events: &[RedrawEvent]) {
        for event in events {
            self.apply_event(event);
        }
        self.state.scroll_region = None;
        self.pending_cursor_paint = true;
    }

    /// Perform the repaint scheduled by the last batch, if any
    pub fn idle(&mut self) {
        if self.pending_cursor_paint {
            self.pending_cursor_paint = false;
            self.surface.repaint_cursor();
        }
    }

    /// Drain resolver completions onto this renderer's registry
    pub fn drain_resolutions(&mut self, rx: &Receiver<ColorResolution>) {
        while let Ok(resolution) = rx.try_recv() {
            self.apply_resolution(resolution);
        }
    }

    /// Merge one resolved color into its mode descriptor.
    ///
    /// May run after any number of batches since the originating
    /// mode-info-set; accepted unconditionally, last writer wins. A lookup
    /// that yielded no background falls back to the current foreground.
    pub fn apply_resolution(&mut self, resolution: ColorResolution) {
        let color = resolution
            .background
            .and_then(RgbColor::unpack)
            .unwrap_or(self.state.colors.foreground);
        self.modes.set_color(&resolution.mode_name, color);
    }

    fn apply_event(&mut self, event: &RedrawEvent) {
        trace!(?event, "dispatch");
        match event {
            RedrawEvent::Clear => {
                self.surface.set_draw_color(self.state.colors.background);
                self.surface.fill_rect(0, 0, self.dims.cols, self.dims.rows);
            }
            RedrawEvent::EolClear => {
                let cursor = self.state.cursor;
                self.surface.set_draw_color(self.state.colors.background);
                self.surface
                    .fill_rect(cursor.col, cursor.row, self.dims.cols - cursor.col, 1);
            }
            RedrawEvent::UpdateFg(packed) => self.state.colors.set_foreground(*packed),
            RedrawEvent::UpdateBg(packed) => self.state.colors.set_background(*packed),
            RedrawEvent::UpdateSp(packed) => self.state.colors.set_special(*packed),
            RedrawEvent::CursorGoto { row, col } => {
                // The contract promises in-bounds coordinates; clamp anyway
                // so a misbehaving peer cannot force out-of-range surface
                // calls
                self.state.cursor.move_to(*row, *col, self.dims);
            }
            RedrawEvent::SetScrollRegion {
                top,
                bottom,
                left,
                right,
            } => {
                self.state.scroll_region = Some(ScrollRegion {
                    top: *top,
                    bottom: *bottom,
                    left: *left,
                    right: *right,
                });
            }
            RedrawEvent::Scroll(amount) => self.scroll(*amount),
            RedrawEvent::Put(cells) => self.put(cells),
            RedrawEvent::HighlightSet(attrs) => self.highlight_set(attrs),
            RedrawEvent::ModeInfoSet(payloads) => self.mode_info_set(payloads),
            RedrawEvent::ModeChange(name) => self.mode_change(name),
        }
    }

    fn highlight_set(&mut self, payload: &HighlightAttrs) {
        let colors = &self.state.colors;
        let mut foreground = payload
            .foreground
            .and_then(RgbColor::unpack)
            .unwrap_or(colors.foreground);
        let mut background = payload
            .background
            .and_then(RgbColor::unpack)
            .unwrap_or(colors.background);
        if payload.reverse {
            std::mem::swap(&mut foreground, &mut background);
        }
        self.state.attrs = Attrs {
            foreground,
            background,
            bold: payload.bold,
            italic: payload.italic,
            underline: payload.underline,
            undercurl: payload.undercurl,
        };
    }

    /// Scroll the active region; the stored region is consumed either way
    fn scroll(&mut self, amount: i64) {
        let region = self
            .state
            .scroll_region
            .take()
            .unwrap_or_else(|| ScrollRegion::full(self.dims))
            .clamped(self.dims);
        if amount > 0 {
            self.move_region_up(amount as usize, region);
        } else if amount < 0 {
            self.move_region_down(amount.unsigned_abs() as usize, region);
        }
    }

    /// Content moves up: new output appears at the region bottom
    fn move_region_up(&mut self, amount: usize, region: ScrollRegion) {
        let width = region.width();
        if amount >= region.height() {
            // Nothing survives the move; paint the whole region
            self.surface.set_draw_color(self.state.colors.background);
            self.surface
                .fill_rect(region.left, region.top, width, region.height());
            return;
        }
        let height = region.height() - amount;
        let block = self
            .surface
            .get_block(region.left, region.top + amount, width, height);
        self.surface
            .put_block(&block, region.left, region.top, width, height);
        self.surface.set_draw_color(self.state.colors.background);
        self.surface
            .fill_rect(region.left, region.bottom + 1 - amount, width, amount);
    }

    /// Content moves down: new output appears at the region top
    fn move_region_down(&mut self, amount: usize, region: ScrollRegion) {
        let width = region.width();
        if amount >= region.height() {
            self.surface.set_draw_color(self.state.colors.background);
            self.surface
                .fill_rect(region.left, region.top, width, region.height());
            return;
        }
        let height = region.height() - amount;
        let block = self.surface.get_block(region.left, region.top, width, height);
        self.surface
            .put_block(&block, region.left, region.top + amount, width, height);
        self.surface.set_draw_color(self.state.colors.background);
        self.surface
            .fill_rect(region.left, region.top, width, amount);
    }

    /// Write a run of glyphs at the cursor, advancing it with wrap
    fn put(&mut self, cells: &[String]) {
        if cells.is_empty() {
            return;
        }
        let attrs = self.state.attrs;
        self.surface.set_draw_color(attrs.background);
        self.surface
            .fill_rect(self.state.cursor.col, self.state.cursor.row, cells.len(), 1);
        self.surface.set_draw_color(attrs.foreground);
        for cell in cells {
            self.surface
                .draw_glyph(cell, self.state.cursor.col, self.state.cursor.row);
            self.state.cursor.col += 1;
            if self.state.cursor.col >= self.dims.cols {
                self.state.cursor.col = 0;
                // Writes never scroll; a run past the last row stays there
                self.state.cursor.row = (self.state.cursor.row + 1).min(self.dims.rows - 1);
            }
        }
    }

    fn mode_info_set(&mut self, payloads: &[ModeInfoPayload]) {
        for payload in payloads {
            let info = ModeInfo {
                shape: CursorShape::from_wire(payload.cursor_shape.as_deref()),
                size: payload.cell_percentage,
                color: None,
            };
            self.modes.insert(payload.name.clone(), info);
            if let Some(hl_id) = payload.hl_id {
                debug!(mode = %payload.name, hl_id, "requesting cursor color");
                self.resolver.request(&payload.name, hl_id);
            }
        }
    }

    fn mode_change(&mut self, name: &str) {
        let Some(info) = self.modes.get(name) else {
            debug!(mode = name, "mode change to unknown mode");
            return;
        };
        self.surface.set_cursor_shape(info.shape, info.size);
        self.active_mode = Some(name.to_string());
    }
}
