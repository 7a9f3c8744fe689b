#![forbid(unsafe_code)]

//! Single-line text input.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use stui_core::{Color, KeyEvent, KeyLabel, Rect};
use stui_render::{Cell, ScreenBuffer};

use crate::{Action, Capabilities, Cmd, Component, Focusable, WidgetResult};

const BG: Color = Color::BG_RED;
const FG: Color = Color::TEXT_WHITE;
const BG_HIGHLIGHT: Color = Color::BG_YELLOW;
const FG_HIGHLIGHT: Color = Color::TEXT_BLACK;

/// Shared handle to a text field's contents.
///
/// The field owns one handle and callers may clone more, typically to read
/// the input from a button action.
#[derive(Debug, Clone, Default)]
pub struct TextValue {
    inner: Arc<Mutex<String>>,
}

impl TextValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> String {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = text.into();
    }

    /// The contents as a number, or `0.0` when they do not parse.
    pub fn parsed_number(&self) -> f64 {
        let text = self.get();
        let value = text.parse().unwrap_or(0.0);
        stui_core::debug!(%text, value, "parsed text field");
        value
    }

    fn with<R>(&self, f: impl FnOnce(&mut String) -> R) -> R {
        f(&mut self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// An editable field showing the tail of its contents.
pub struct TextField {
    x: i32,
    y: i32,
    width: u16,
    z: i32,
    numeric: bool,
    fg: Color,
    bg: Color,
    active: bool,
    value: TextValue,
    on_submit: Option<Action>,
    visible: bool,
}

impl fmt::Debug for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextField")
            .field("bounds", &self.bounds())
            .field("numeric", &self.numeric)
            .field("value", &self.value.get())
            .finish()
    }
}

impl TextField {
    pub fn new(x: i32, y: i32, width: u16, z: i32) -> Self {
        Self {
            x,
            y,
            width,
            z,
            numeric: false,
            fg: FG,
            bg: BG,
            active: false,
            value: TextValue::new(),
            on_submit: None,
            visible: true,
        }
    }

    /// Accept only digits and a single `.`.
    #[must_use]
    pub fn numeric(mut self, numeric: bool) -> Self {
        self.numeric = numeric;
        self
    }

    /// Run `action` on ENTER.
    #[must_use]
    pub fn on_submit<F>(mut self, action: F) -> Self
    where
        F: FnMut() -> WidgetResult<Cmd> + Send + 'static,
    {
        self.on_submit = Some(Box::new(action));
        self
    }

    /// Another handle to the contents.
    pub fn value(&self) -> TextValue {
        self.value.clone()
    }

    pub fn text(&self) -> String {
        self.value.get()
    }

    pub fn parsed_number(&self) -> f64 {
        self.value.parsed_number()
    }

    pub fn colors(&self) -> (Color, Color) {
        (self.fg, self.bg)
    }

    fn accepts(&self, text: &str, input: &str) -> bool {
        if !self.numeric {
            return true;
        }
        match input {
            "." => !text.contains('.'),
            s => s.len() == 1 && s.bytes().all(|b| b.is_ascii_digit()),
        }
    }
}

impl Focusable for TextField {
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

impl Component for TextField {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, 1)
    }

    fn z_index(&self) -> i32 {
        self.z
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::INTERACTABLE | Capabilities::CHAR_INPUT
    }

    fn draw(&self, screen: &mut ScreenBuffer) {
        let text = self.value.get();
        let width = usize::from(self.width);
        let len = text.chars().count();
        let visible = text.chars().skip(len.saturating_sub(width));
        let blank = Cell::new(' ', self.fg, self.bg);
        let mut chars = visible.chain(std::iter::repeat(' '));
        for x in (self.x..).take(width) {
            let ch = chars.next().unwrap_or(' ');
            screen.set_cell(x, self.y, self.z, Cell { ch, ..blank });
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
        stui_core::debug!(text = %self.value.get(), "text field submitted");
        match self.on_submit.as_mut() {
            Some(action) => action(),
            None => Ok(Cmd::None),
        }
    }

    fn handle_char(&mut self, event: &KeyEvent) -> bool {
        if event.label() == KeyLabel::Delete {
            return self.value.with(|text| text.pop().is_some());
        }
        if event.is_functional() {
            return false;
        }
        let input = event.value();
        self.value.with(|text| {
            if !self.accepts(text, input) {
                return false;
            }
            text.push_str(input);
            true
        })
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
