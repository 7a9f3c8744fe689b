#![forbid(unsafe_code)]

//! Layered screen buffer.
//!
//! A [`ScreenBuffer`] owns any number of z-indexed layers, each a full
//! `width × height` grid of `Option<Cell>`. Widgets draw into the layer
//! matching their z-index; [`ScreenBuffer::merge`] flattens the layers into
//! a single grid (higher z wins, unset positions fall back to
//! [`Cell::DEFAULT`]) and [`ScreenBuffer::render`] serializes that grid.
//!
//! # Invariants
//!
//! 1. Every layer and the merged grid hold exactly `width * height` cells.
//! 2. Writes outside `[0, width) × [0, height)` never mutate anything.
//! 3. After `merge`, each merged cell is the highest-z non-empty layer cell,
//!    or the default cell.
//! 4. `render` emits a whole frame with a single `write_all`.
//!
//! # Frame format
//!
//! ```text
//! ESC[H  { (bg fg ch)* ESC[E }*  ESC[0m
//! ```

use std::collections::BTreeMap;
use std::io::{self, Write};

use stui_core::{Color, Rect};

use crate::ansi;
use crate::cell::Cell;

/// Bytes per cell in a rendered frame, worst case: two 6-byte escapes plus
/// a 4-byte UTF-8 character.
const MAX_CELL_BYTES: usize = 16;

#[derive(Debug, Clone)]
struct Layer {
    cells: Vec<Option<Cell>>,
}

impl Layer {
    fn new(len: usize) -> Self {
        Self {
            cells: vec![None; len],
        }
    }

    fn clear(&mut self) {
        self.cells.fill(None);
    }
}

/// The compositor for one session's screen.
#[derive(Debug, Clone)]
pub struct ScreenBuffer {
    width: u16,
    height: u16,
    layers: BTreeMap<i32, Layer>,
    merged: Vec<Cell>,
}

impl ScreenBuffer {
    /// Create a buffer with no layers. The merged grid starts out default.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            layers: BTreeMap::new(),
            merged: vec![Cell::DEFAULT; Self::grid_len(width, height)],
        }
    }

    #[inline]
    fn grid_len(width: u16, height: u16) -> usize {
        usize::from(width) * usize::from(height)
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The whole screen as a rectangle at the origin.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Row-major index, or `None` when `(x, y)` is off-screen.
    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        // Both non-negative and below u16::MAX here.
        Some(y as usize * usize::from(self.width) + x as usize)
    }

    fn layer_mut(&mut self, z: i32) -> &mut Layer {
        let len = Self::grid_len(self.width, self.height);
        self.layers.entry(z).or_insert_with(|| Layer::new(len))
    }

    /// Ensure a layer exists at `z`. Existing layers are left untouched.
    pub fn add_layer(&mut self, z: i32) {
        self.layer_mut(z);
    }

    #[inline]
    pub fn has_layer(&self, z: i32) -> bool {
        self.layers.contains_key(&z)
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Put `cell` at `(x, y)` on layer `z`, creating the layer if needed.
    ///
    /// Off-screen positions are logged and ignored.
    pub fn set_cell(&mut self, x: i32, y: i32, z: i32, cell: Cell) {
        let Some(idx) = self.index(x, y) else {
            stui_core::warn!(
                x,
                y,
                z,
                width = self.width,
                height = self.height,
                "set_cell out of bounds"
            );
            return;
        };
        self.layer_mut(z).cells[idx] = Some(cell);
    }

    /// Write `text` left to right starting at `(x, y)` on layer `z`.
    ///
    /// Characters that would land at or past the right edge are dropped; the
    /// text never wraps. An off-screen start position is logged and ignored.
    pub fn set_text(&mut self, x: i32, y: i32, text: &str, fg: Color, bg: Color, z: i32) {
        let Some(start) = self.index(x, y) else {
            stui_core::warn!(
                x,
                y,
                z,
                width = self.width,
                height = self.height,
                "set_text out of bounds"
            );
            return;
        };
        let room = usize::from(self.width) - x as usize;
        let layer = self.layer_mut(z);
        for (slot, ch) in layer.cells[start..start + room].iter_mut().zip(text.chars()) {
            *slot = Some(Cell::new(ch, fg, bg));
        }
    }

    /// Unset one position on layer `z`. Off-screen or missing layer: no-op.
    pub fn clear_cell_at(&mut self, x: i32, y: i32, z: i32) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        if let Some(layer) = self.layers.get_mut(&z) {
            layer.cells[idx] = None;
        }
    }

    /// Unset every position on layer `z`.
    pub fn clear_layer(&mut self, z: i32) {
        if let Some(layer) = self.layers.get_mut(&z) {
            layer.clear();
        }
    }

    /// Unset the part of `rect` that is on-screen, on every layer.
    pub fn clear_rect(&mut self, rect: Rect) {
        let x0 = rect.x.clamp(0, i32::from(self.width));
        let x1 = rect.right().clamp(0, i32::from(self.width));
        let y0 = rect.y.clamp(0, i32::from(self.height));
        let y1 = rect.bottom().clamp(0, i32::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let width = usize::from(self.width);
        for layer in self.layers.values_mut() {
            for y in y0..y1 {
                let row = y as usize * width;
                layer.cells[row + x0 as usize..row + x1 as usize].fill(None);
            }
        }
    }

    /// Unset every position on every layer. Layers stay registered.
    pub fn clear_layers(&mut self) {
        for layer in self.layers.values_mut() {
            layer.clear();
        }
    }

    /// Paint the background of layer `z`.
    ///
    /// Empty positions become blanks on `bg`; drawn positions keep their
    /// character and foreground and take `bg`.
    pub fn set_bg_color(&mut self, bg: Color, z: i32) {
        let blank = Cell::new(' ', Color::TEXT_BLACK, bg);
        for slot in &mut self.layer_mut(z).cells {
            *slot = Some(match *slot {
                Some(cell) => cell.with_bg(bg),
                None => blank,
            });
        }
    }

    /// Change dimensions. All drawn content is discarded; layer keys survive.
    pub fn resize(&mut self, width: u16, height: u16) {
        let len = Self::grid_len(width, height);
        self.width = width;
        self.height = height;
        for layer in self.layers.values_mut() {
            *layer = Layer::new(len);
        }
        self.merged = vec![Cell::DEFAULT; len];
        stui_core::debug!(width, height, layers = self.layers.len(), "screen resized");
    }

    /// Flatten the layers into the merged grid, lowest z first.
    pub fn merge(&mut self) {
        self.merged.fill(Cell::DEFAULT);
        for layer in self.layers.values() {
            for (dst, src) in self.merged.iter_mut().zip(&layer.cells) {
                if let Some(cell) = src {
                    *dst = *cell;
                }
            }
        }
    }

    /// The merged cell at `(x, y)` as of the last [`merge`](Self::merge).
    pub fn merged_cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.merged[idx])
    }

    /// The cell drawn at `(x, y)` on layer `z`, if any.
    pub fn layer_cell(&self, x: i32, y: i32, z: i32) -> Option<Cell> {
        let idx = self.index(x, y)?;
        self.layers.get(&z)?.cells[idx]
    }

    /// Upper bound on the size of one rendered frame.
    pub fn frame_capacity(&self) -> usize {
        let rows = usize::from(self.height);
        ansi::CURSOR_HOME.len()
            + self.merged.len() * MAX_CELL_BYTES
            + rows * ansi::NEXT_LINE.len()
            + ansi::SGR_RESET.len()
    }

    /// Serialize the merged grid into `frame`, appending.
    fn encode_frame(&self, frame: &mut Vec<u8>) -> io::Result<()> {
        ansi::cursor_home(frame)?;
        if self.width > 0 {
            for row in self.merged.chunks_exact(usize::from(self.width)) {
                for cell in row {
                    ansi::cell(frame, cell.ch, cell.fg, cell.bg)?;
                }
                ansi::next_line(frame)?;
            }
        }
        ansi::sgr_reset(frame)
    }

    /// Write the merged grid as one frame.
    ///
    /// The frame is assembled in memory first so the sink sees exactly one
    /// `write_all`, never a partial frame.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let frame = self.render_to_vec();
        out.write_all(&frame)
    }

    /// The bytes [`render`](Self::render) would write.
    pub fn render_to_vec(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(self.frame_capacity());
        // Writing into a Vec cannot fail.
        let _ = self.encode_frame(&mut frame);
        frame
    }

    /// Merge, render, and flush.
    pub fn refresh<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.merge();
        self.render(out)?;
        out.flush()
    }
}
