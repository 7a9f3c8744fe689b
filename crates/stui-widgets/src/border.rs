#![forbid(unsafe_code)]

//! Box outline that tracks the window size.

use stui_core::{Color, Rect};
use stui_render::{Cell, ScreenBuffer};

use crate::{Component, Focusable};

const HORIZONTAL: char = '─';
const VERTICAL: char = '│';
const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';

/// A rectangle outline.
///
/// On resize the border shrinks so its right and bottom edges stay inside
/// the window, and grows back towards its initial size when there is room.
#[derive(Debug, Clone)]
pub struct Border {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    initial_width: i32,
    initial_height: i32,
    z: i32,
    fg: Color,
    bg: Color,
    visible: bool,
}

impl Border {
    pub fn new(x: i32, y: i32, width: u16, height: u16, z: i32) -> Self {
        Self {
            x,
            y,
            width: i32::from(width),
            height: i32::from(height),
            initial_width: i32::from(width),
            initial_height: i32::from(height),
            z,
            fg: Color::TEXT_WHITE,
            bg: Color::BG_BLUE,
            visible: true,
        }
    }

    #[must_use]
    pub fn colors(mut self, fg: Color, bg: Color) -> Self {
        self.fg = fg;
        self.bg = bg;
        self
    }

    /// One axis of the resize rule: `pos + len` must fit in `window`.
    fn fit(pos: i32, len: i32, initial: i32, window: i32) -> i32 {
        let edge = pos + len;
        let fitted = if window < edge {
            len + (window - edge)
        } else if window != edge {
            (window - pos).min(initial)
        } else {
            len
        };
        fitted.max(0)
    }
}

impl Focusable for Border {
    fn is_interactable(&self) -> bool {
        false
    }

    fn set_active(&mut self, _active: bool) {}
}

impl Component for Border {
    fn bounds(&self) -> Rect {
        let w = u16::try_from(self.width).unwrap_or(0);
        let h = u16::try_from(self.height).unwrap_or(0);
        Rect::new(self.x, self.y, w, h)
    }

    fn z_index(&self) -> i32 {
        self.z
    }

    fn draw(&self, screen: &mut ScreenBuffer) {
        if self.width <= 0 || self.height <= 0 {
            return;
        }
        let (left, top) = (self.x, self.y);
        let right = left + self.width - 1;
        let bottom = top + self.height - 1;
        let cell = |ch| Cell::new(ch, self.fg, self.bg);

        for x in left..=right {
            screen.set_cell(x, top, self.z, cell(HORIZONTAL));
            screen.set_cell(x, bottom, self.z, cell(HORIZONTAL));
        }
        for y in top..=bottom {
            screen.set_cell(left, y, self.z, cell(VERTICAL));
            screen.set_cell(right, y, self.z, cell(VERTICAL));
        }
        screen.set_cell(left, top, self.z, cell(TOP_LEFT));
        screen.set_cell(right, top, self.z, cell(TOP_RIGHT));
        screen.set_cell(left, bottom, self.z, cell(BOTTOM_LEFT));
        screen.set_cell(right, bottom, self.z, cell(BOTTOM_RIGHT));
    }

    fn window_resized(&mut self, width: u16, height: u16) {
        self.width = Self::fit(self.x, self.width, self.initial_width, i32::from(width));
        self.height = Self::fit(self.y, self.height, self.initial_height, i32::from(height));
        stui_core::trace!(width = self.width, height = self.height, "border resized");
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
