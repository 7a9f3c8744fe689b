#![forbid(unsafe_code)]

//! Static text.

use stui_core::{Color, Rect};
use stui_render::ScreenBuffer;

use crate::{Component, Focusable, span};

/// One or more lines of text. Never takes focus.
#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    x: i32,
    y: i32,
    z: i32,
    fg: Color,
    bg: Color,
    visible: bool,
}

impl Label {
    /// Black text on `bg`. Embedded `\n`s start new lines.
    pub fn new(text: impl Into<String>, x: i32, y: i32, z: i32, bg: Color) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            z,
            fg: Color::TEXT_BLACK,
            bg,
            visible: true,
        }
    }

    /// Set the text color.
    #[must_use]
    pub fn fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn colors(&self) -> (Color, Color) {
        (self.fg, self.bg)
    }
}

impl Focusable for Label {
    fn is_interactable(&self) -> bool {
        false
    }

    fn set_active(&mut self, _active: bool) {}
}

impl Component for Label {
    fn bounds(&self) -> Rect {
        let width = self.text.split('\n').map(|l| l.chars().count()).max().unwrap_or(0);
        let height = self.text.split('\n').count();
        Rect::new(self.x, self.y, span(width), span(height))
    }

    fn z_index(&self) -> i32 {
        self.z
    }

    fn draw(&self, screen: &mut ScreenBuffer) {
        for (row, line) in (self.y..).zip(self.text.split('\n')) {
            screen.set_text(self.x, row, line, self.fg, self.bg, self.z);
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
