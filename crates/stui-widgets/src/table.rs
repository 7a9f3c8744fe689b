#![forbid(unsafe_code)]

//! Fixed grid of text cells.

use stui_core::{Color, Rect};
use stui_render::{Cell, ScreenBuffer};

use crate::{Component, Focusable, span};

/// Cells laid out row by row in `columns` columns, framed with `+`, `-`
/// and `|`.
///
/// Each column is as wide as its widest cell. A short last row leaves its
/// trailing columns blank.
#[derive(Debug, Clone)]
pub struct Table {
    cells: Vec<String>,
    columns: usize,
    x: i32,
    y: i32,
    z: i32,
    fg: Color,
    bg: Color,
    visible: bool,
}

impl Table {
    pub fn new<I, S>(x: i32, y: i32, columns: usize, cells: I, z: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            columns: columns.max(1),
            x,
            y,
            z,
            fg: Color::TEXT_BLACK,
            bg: Color::BG_BLUE,
            visible: true,
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len().div_ceil(self.columns)
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths = vec![0; self.columns];
        for (i, cell) in self.cells.iter().enumerate() {
            let col = i % self.columns;
            widths[col] = widths[col].max(cell.chars().count());
        }
        widths
    }

    /// The rendered rows, separators included.
    pub fn lines(&self) -> Vec<String> {
        if self.cells.is_empty() {
            return Vec::new();
        }
        let widths = self.column_widths();
        let separator = widths.iter().fold(String::from("+"), |mut line, w| {
            line.push_str(&"-".repeat(w + 2));
            line.push('+');
            line
        });

        let mut lines = vec![separator.clone()];
        for row in self.cells.chunks(self.columns) {
            let mut line = String::from("|");
            for (col, width) in widths.iter().enumerate() {
                let text = row.get(col).map_or("", String::as_str);
                line.push_str(&format!(" {text:<width$} |"));
            }
            lines.push(line);
            lines.push(separator.clone());
        }
        lines
    }
}

impl Focusable for Table {
    fn is_interactable(&self) -> bool {
        false
    }

    fn set_active(&mut self, _active: bool) {}
}

impl Component for Table {
    fn bounds(&self) -> Rect {
        let lines = self.lines();
        let width = lines.first().map_or(0, |l| l.chars().count());
        Rect::new(self.x, self.y, span(width), span(lines.len()))
    }

    fn z_index(&self) -> i32 {
        self.z
    }

    fn draw(&self, screen: &mut ScreenBuffer) {
        for (y, line) in (self.y..).zip(self.lines()) {
            for (x, ch) in (self.x..).zip(line.chars()) {
                screen.set_cell(x, y, self.z, Cell::new(ch, self.fg, self.bg));
            }
        }
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
