#![forbid(unsafe_code)]

//! Decorative vertical scrollbar.

use stui_core::{Color, Rect};
use stui_render::{Cell, ScreenBuffer};

use crate::{Component, Focusable};

/// A column of `|` drawn one cell to the right of another component.
#[derive(Debug, Clone)]
pub struct ScrollBar {
    x: i32,
    y: i32,
    height: u16,
    z: i32,
    fg: Color,
    bg: Color,
    visible: bool,
}

impl ScrollBar {
    pub fn new(x: i32, y: i32, height: u16, z: i32) -> Self {
        Self {
            x,
            y,
            height,
            z,
            fg: Color::TEXT_WHITE,
            bg: Color::BG_BRIGHT_BLUE,
            visible: true,
        }
    }

    /// Place the bar beside `target`, spanning its height.
    pub fn beside(target: Rect, z: i32) -> Self {
        Self::new(target.right() + 1, target.y, target.height, z)
    }
}

impl Focusable for ScrollBar {
    fn is_interactable(&self) -> bool {
        false
    }

    fn set_active(&mut self, _active: bool) {}
}

impl Component for ScrollBar {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, 1, self.height)
    }

    fn z_index(&self) -> i32 {
        self.z
    }

    fn draw(&self, screen: &mut ScreenBuffer) {
        let cell = Cell::new('|', self.fg, self.bg);
        for y in (self.y..).take(usize::from(self.height)) {
            screen.set_cell(self.x, y, self.z, cell);
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
