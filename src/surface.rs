//! Pixel surface boundary
//!
//! [`Surface`] is the only side-effecting boundary of the renderer: fills,
//! glyph drawing, block copies for scrolling, and cursor presentation. A
//! real frontend implements it over its framebuffer; [`RecordingSurface`]
//! implements it over a cell-level pixel model plus a call log, which is
//! what the tests, benches, and the headless runner observe.

use serde::Serialize;

use crate::color::RgbColor;
use crate::modes::CursorShape;
use crate::Dimensions;

/// The pixel display surface the renderer draws into
///
/// Coordinates are grid cells. `get_block`/`put_block` move already
/// rendered pixels without re-rendering glyphs; the block type is opaque
/// to the renderer.
pub trait Surface {
    /// Opaque captured pixel block
    type Block;

    fn set_draw_color(&mut self, color: RgbColor);
    fn fill_rect(&mut self, col: usize, row: usize, width: usize, height: usize);
    fn draw_glyph(&mut self, text: &str, col: usize, row: usize);
    fn get_block(&mut self, col: usize, row: usize, width: usize, height: usize) -> Self::Block;
    fn put_block(&mut self, block: &Self::Block, col: usize, row: usize, width: usize, height: usize);
    fn set_cursor_shape(&mut self, shape: CursorShape, size: Option<u8>);
    fn repaint_cursor(&mut self);
}

/// One recorded surface call, in issue order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SurfaceCall {
    SetDrawColor(RgbColor),
    FillRect {
        col: usize,
        row: usize,
        width: usize,
        height: usize,
    },
    DrawGlyph {
        text: String,
        col: usize,
        row: usize,
    },
    GetBlock {
        col: usize,
        row: usize,
        width: usize,
        height: usize,
    },
    PutBlock {
        col: usize,
        row: usize,
        width: usize,
        height: usize,
    },
    SetCursorShape {
        shape: CursorShape,
        size: Option<u8>,
    },
    RepaintCursor,
}

/// The rendered content of one grid cell
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Texel {
    /// Last fill color covering this cell
    pub bg: Option<RgbColor>,
    /// Draw color of the last glyph, if any
    pub fg: Option<RgbColor>,
    /// Last glyph drawn over the fill, if any
    pub glyph: Option<String>,
}

/// A captured rectangle of texels, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexelBlock {
    width: usize,
    height: usize,
    texels: Vec<Texel>,
}

/// In-memory surface that models pixels at cell granularity
///
/// Out-of-range coordinates are clipped rather than panicking, matching
/// what a real framebuffer boundary would do.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    dims: Dimensions,
    draw_color: RgbColor,
    texels: Vec<Texel>,
    calls: Vec<SurfaceCall>,
    cursor_shape: CursorShape,
    cursor_size: Option<u8>,
}

impl RecordingSurface {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            draw_color: RgbColor::new(0, 0, 0),
            texels: vec![Texel::default(); dims.cols * dims.rows],
            calls: Vec::new(),
            cursor_shape: CursorShape::default(),
            cursor_size: None,
        }
    }

    /// Recorded calls in issue order
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// The rendered content of one cell; `None` when out of range
    pub fn texel(&self, col: usize, row: usize) -> Option<&Texel> {
        if col >= self.dims.cols || row >= self.dims.rows {
            return None;
        }
        Some(&self.texels[row * self.dims.cols + col])
    }

    pub fn cursor_shape(&self) -> (CursorShape, Option<u8>) {
        (self.cursor_shape, self.cursor_size)
    }

    /// Render the glyph layer as text, one line per grid row
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity((self.dims.cols + 1) * self.dims.rows);
        for row in 0..self.dims.rows {
            for col in 0..self.dims.cols {
                match &self.texels[row * self.dims.cols + col].glyph {
                    Some(glyph) => text.push_str(glyph),
                    None => text.push(' '),
                }
            }
            text.push('\n');
        }
        text
    }

    fn clip(&self, col: usize, row: usize, width: usize, height: usize) -> (usize, usize) {
        let width = width.min(self.dims.cols.saturating_sub(col));
        let height = height.min(self.dims.rows.saturating_sub(row));
        (width, height)
    }
}

impl Surface for RecordingSurface {
    type Block = TexelBlock;

    fn set_draw_color(&mut self, color: RgbColor) {
        self.calls.push(SurfaceCall::SetDrawColor(color));
        self.draw_color = color;
    }

    fn fill_rect(&mut self, col: usize, row: usize, width: usize, height: usize) {
        self.calls.push(SurfaceCall::FillRect {
            col,
            row,
            width,
            height,
        });
        let (width, height) = self.clip(col, row, width, height);
        for r in row..row + height {
            for c in col..col + width {
                self.texels[r * self.dims.cols + c] = Texel {
                    bg: Some(self.draw_color),
                    fg: None,
                    glyph: None,
                };
            }
        }
    }

    fn draw_glyph(&mut self, text: &str, col: usize, row: usize) {
        self.calls.push(SurfaceCall::DrawGlyph {
            text: text.to_string(),
            col,
            row,
        });
        if col >= self.dims.cols || row >= self.dims.rows {
            return;
        }
        let texel = &mut self.texels[row * self.dims.cols + col];
        texel.fg = Some(self.draw_color);
        texel.glyph = Some(text.to_string());
    }

    fn get_block(&mut self, col: usize, row: usize, width: usize, height: usize) -> TexelBlock {
        self.calls.push(SurfaceCall::GetBlock {
            col,
            row,
            width,
            height,
        });
        let (width, height) = self.clip(col, row, width, height);
        let mut texels = Vec::with_capacity(width * height);
        for r in row..row + height {
            for c in col..col + width {
                texels.push(self.texels[r * self.dims.cols + c].clone());
            }
        }
        TexelBlock {
            width,
            height,
            texels,
        }
    }

    fn put_block(
        &mut self,
        block: &TexelBlock,
        col: usize,
        row: usize,
        width: usize,
        height: usize,
    ) {
        self.calls.push(SurfaceCall::PutBlock {
            col,
            row,
            width,
            height,
        });
        let width = width.min(block.width);
        let height = height.min(block.height);
        let (width, height) = self.clip(col, row, width, height);
        for r in 0..height {
            for c in 0..width {
                self.texels[(row + r) * self.dims.cols + (col + c)] =
                    block.texels[r * block.width + c].clone();
            }
        }
    }

    fn set_cursor_shape(&mut self, shape: CursorShape, size: Option<u8>) {
        self.calls.push(SurfaceCall::SetCursorShape { shape, size });
        self.cursor_shape = shape;
        self.cursor_size = size;
    }

    fn repaint_cursor(&mut self) {
        self.calls.push(SurfaceCall::RepaintCursor);
    }
}
