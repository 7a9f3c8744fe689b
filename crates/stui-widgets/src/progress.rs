#![forbid(unsafe_code)]

//! Horizontal progress bar.

use stui_core::{Color, Rect};
use stui_render::{Cell, ScreenBuffer};

use crate::{Component, Focusable, span};

/// A one-row bar with a centered percentage, framed by `-` and `|`.
///
/// The frame sits outside the bar: one row above and below, one column
/// left and right.
#[derive(Debug, Clone)]
pub struct ProgressBar {
    x: i32,
    y: i32,
    width: u16,
    z: i32,
    progress: f64,
    filled_bg: Color,
    empty_bg: Color,
    fg: Color,
    frame_bg: Color,
    visible: bool,
}

impl ProgressBar {
    pub fn new(x: i32, y: i32, width: u16, z: i32) -> Self {
        Self {
            x,
            y,
            width,
            z,
            progress: 0.0,
            filled_bg: Color::BG_GREEN,
            empty_bg: Color::BG_BLUE,
            fg: Color::TEXT_WHITE,
            frame_bg: Color::BG_BRIGHT_WHITE,
            visible: true,
        }
    }

    /// Set the fraction complete, clamped to `0.0..=1.0`.
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
    }

    #[must_use]
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.set_progress(progress);
        self
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Columns painted with the filled color.
    pub fn filled_width(&self) -> u16 {
        // progress is in [0, 1], so the product fits in u16.
        (f64::from(self.width) * self.progress).round() as u16
    }

    pub fn label(&self) -> String {
        format!("{:.0}%", self.progress * 100.0)
    }
}

impl Focusable for ProgressBar {
    fn is_interactable(&self) -> bool {
        false
    }

    fn set_active(&mut self, _active: bool) {}
}

impl Component for ProgressBar {
    fn bounds(&self) -> Rect {
        Rect::new(self.x - 1, self.y - 1, self.width.saturating_add(2), 3)
    }

    fn z_index(&self) -> i32 {
        self.z
    }

    fn draw(&self, screen: &mut ScreenBuffer) {
        let filled = self.filled_width();
        let bg_at = |offset: u16| {
            if offset < filled {
                self.filled_bg
            } else {
                self.empty_bg
            }
        };

        for (offset, x) in (0..self.width).zip(self.x..) {
            screen.set_cell(x, self.y, self.z, Cell::new(' ', self.fg, bg_at(offset)));
        }

        let label = self.label();
        let start = self.width.saturating_sub(span(label.len())) / 2;
        for (offset, ch) in (start..).zip(label.chars()) {
            let x = self.x + i32::from(offset);
            screen.set_cell(x, self.y, self.z, Cell::new(ch, self.fg, bg_at(offset)));
        }

        let edge = Cell::new('-', self.fg, self.frame_bg);
        for x in (self.x..).take(usize::from(self.width)) {
            screen.set_cell(x, self.y - 1, self.z, edge);
            screen.set_cell(x, self.y + 1, self.z, edge);
        }
        let side = Cell::new('|', self.fg, self.frame_bg);
        screen.set_cell(self.x - 1, self.y, self.z, side);
        screen.set_cell(self.x + i32::from(self.width), self.y, self.z, side);
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
