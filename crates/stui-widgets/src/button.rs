#![forbid(unsafe_code)]

//! Push button.

use std::fmt;

use stui_core::{Color, Rect};
use stui_render::{Cell, ScreenBuffer};

use crate::{Action, Cmd, Component, Focusable, WidgetResult, span};

const BG: Color = Color::BG_RED;
const FG: Color = Color::TEXT_WHITE;
const BG_HIGHLIGHT: Color = Color::BG_YELLOW;
const FG_HIGHLIGHT: Color = Color::TEXT_BLACK;

/// A single-row button with centered text and an optional action.
pub struct Button {
    text: String,
    x: i32,
    y: i32,
    width: u16,
    height: u16,
    z: i32,
    fg: Color,
    bg: Color,
    active: bool,
    visible: bool,
    action: Option<Action>,
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("text", &self.text)
            .field("bounds", &self.bounds())
            .field("active", &self.active)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

impl Button {
    pub fn new(text: impl Into<String>, x: i32, y: i32, width: u16, height: u16, z: i32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            height,
            z,
            fg: FG,
            bg: BG,
            active: false,
            visible: true,
            action: None,
        }
    }

    /// Run `action` when the button is pressed.
    #[must_use]
    pub fn on_press<F>(mut self, action: F) -> Self
    where
        F: FnMut() -> WidgetResult<Cmd> + Send + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn colors(&self) -> (Color, Color) {
        (self.fg, self.bg)
    }

    /// The text centered in `width` columns, padded on both sides.
    fn padded(&self) -> String {
        let width = usize::from(self.width);
        let len = self.text.chars().count();
        let left = width.saturating_sub(len) / 2;
        let mut out = String::with_capacity(width.max(len));
        out.extend(std::iter::repeat_n(' ', left));
        out.push_str(&self.text);
        let right = width.saturating_sub(left + len);
        out.extend(std::iter::repeat_n(' ', right));
        out
    }
}

impl Focusable for Button {
    fn is_interactable(&self) -> bool {
        true
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
        if active {
            self.highlight();
        } else {
            self.reset_highlight();
        }
    }
}

impl Component for Button {
    fn bounds(&self) -> Rect {
        let width = self.width.max(span(self.text.chars().count()));
        Rect::new(self.x, self.y, width, self.height.max(1))
    }

    fn z_index(&self) -> i32 {
        self.z
    }

    fn draw(&self, screen: &mut ScreenBuffer) {
        for (x, ch) in (self.x..).zip(self.padded().chars()) {
            screen.set_cell(x, self.y, self.z, Cell::new(ch, self.fg, self.bg));
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn highlight(&mut self) {
        self.fg = FG_HIGHLIGHT;
        self.bg = BG_HIGHLIGHT;
    }

    fn reset_highlight(&mut self) {
        self.fg = FG;
        self.bg = BG;
    }

    fn perform_action(&mut self) -> WidgetResult<Cmd> {
        stui_core::debug!(button = %self.text, "button pressed");
        match self.action.as_mut() {
            Some(action) => action(),
            None => Ok(Cmd::None),
        }
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.active = false;
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WidgetError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn text_is_centered() {
        let button = Button::new("OK", 0, 0, 10, 1, 0);
        assert_eq!(button.padded(), "    OK    ");
        let odd = Button::new("abc", 0, 0, 6, 1, 0);
        assert_eq!(odd.padded(), " abc  ");
    }

    #[test]
    fn text_wider_than_button_is_not_truncated() {
        let button = Button::new("CANCEL", 0, 0, 4, 1, 0);
        assert_eq!(button.padded(), "CANCEL");
        assert_eq!(button.bounds().width, 6);
    }

    #[test]
    fn highlight_follows_focus() {
        let mut button = Button::new("OK", 0, 0, 10, 1, 0);
        assert_eq!(button.colors(), (FG, BG));
        button.set_active(true);
        assert!(button.is_active());
        assert_eq!(button.colors(), (FG_HIGHLIGHT, BG_HIGHLIGHT));
        button.set_active(false);
        assert_eq!(button.colors(), (FG, BG));
    }

    #[test]
    fn draw_uses_current_colors() {
        let mut screen = ScreenBuffer::new(12, 2);
        let mut button = Button::new("Go", 1, 1, 4, 1, 3);
        button.highlight();
        button.draw(&mut screen);
        assert_eq!(
            screen.layer_cell(2, 1, 3),
            Some(Cell::new('G', FG_HIGHLIGHT, BG_HIGHLIGHT))
        );
        assert_eq!(
            screen.layer_cell(1, 1, 3),
            Some(Cell::new(' ', FG_HIGHLIGHT, BG_HIGHLIGHT))
        );
    }

    #[test]
    fn action_runs_on_press() {
        let presses = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&presses);
        let mut button = Button::new("Go", 0, 0, 4, 1, 0).on_press(move || {
            counter.fetch_add(1, Ordering::Relaxed);
            Ok(Cmd::Render)
        });
        assert!(matches!(button.perform_action(), Ok(Cmd::Render)));
        button.perform_action().unwrap();
        assert_eq!(presses.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn action_errors_propagate() {
        let mut button =
            Button::new("Bad", 0, 0, 4, 1, 0).on_press(|| Err(WidgetError::action("nope")));
        assert!(button.perform_action().is_err());
    }

    #[test]
    fn without_action_press_is_noop() {
        let mut button = Button::new("Idle", 0, 0, 4, 1, 0);
        assert!(button.perform_action().unwrap().is_none());
    }

    #[test]
    fn hide_drops_focus() {
        let mut button = Button::new("x", 0, 0, 4, 1, 0);
        button.set_active(true);
        button.hide();
        assert!(!button.is_active());
        assert!(!button.is_visible());
    }
}
