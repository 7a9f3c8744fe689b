#![forbid(unsafe_code)]

//! Static bulleted list.

use stui_core::{Color, Rect};
use stui_render::{Cell, ScreenBuffer};

use crate::{Component, Focusable, span};

/// Items drawn one per row as `| item`, padded to the longest item.
#[derive(Debug, Clone)]
pub struct List {
    items: Vec<String>,
    x: i32,
    y: i32,
    z: i32,
    fg: Color,
    bg: Color,
    visible: bool,
}

impl List {
    pub fn new<I, S>(items: I, x: i32, y: i32, z: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            x,
            y,
            z,
            fg: Color::TEXT_BLACK,
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

    pub fn items(&self) -> &[String] {
        &self.items
    }

    fn item_width(&self) -> usize {
        self.items
            .iter()
            .map(|item| item.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// The rendered rows.
    pub fn lines(&self) -> Vec<String> {
        let width = self.item_width();
        self.items
            .iter()
            .map(|item| format!("| {item:<width$}"))
            .collect()
    }
}

impl Focusable for List {
    fn is_interactable(&self) -> bool {
        false
    }

    fn set_active(&mut self, _active: bool) {}
}

impl Component for List {
    fn bounds(&self) -> Rect {
        Rect::new(
            self.x,
            self.y,
            span(self.item_width() + 2),
            span(self.items.len()),
        )
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
