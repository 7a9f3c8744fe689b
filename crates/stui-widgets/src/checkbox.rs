#![forbid(unsafe_code)]

//! Framed checkboxes grouped into exclusive radio sets.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use stui_core::{Color, Rect};
use stui_render::ScreenBuffer;

use crate::{Cmd, Component, Focusable, WidgetResult, span};

const NONE_SELECTED: usize = usize::MAX;

#[derive(Debug, Default)]
struct GroupInner {
    selected: AtomicUsize,
    values: Mutex<Vec<String>>,
}

/// Shared selection for a set of checkboxes. At most one member is checked.
///
/// Cloning yields another handle to the same group, so an action callback
/// can read the selection while the checkboxes live in a tab.
#[derive(Debug, Clone)]
pub struct RadioGroup {
    inner: Arc<GroupInner>,
}

impl Default for RadioGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioGroup {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(GroupInner {
                selected: AtomicUsize::new(NONE_SELECTED),
                values: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Register a member and return its index.
    fn join(&self, value: &str) -> usize {
        let mut values = self.inner.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.push(value.to_owned());
        values.len() - 1
    }

    pub fn select(&self, member: usize) {
        self.inner.selected.store(member, Ordering::Release);
    }

    /// Index of the checked member.
    pub fn selected(&self) -> Option<usize> {
        match self.inner.selected.load(Ordering::Acquire) {
            NONE_SELECTED => None,
            i => Some(i),
        }
    }

    /// Value of the checked member.
    pub fn selected_value(&self) -> Option<String> {
        let i = self.selected()?;
        let values = self.inner.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.get(i).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.values.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A boxed `[X] label` entry belonging to a [`RadioGroup`].
#[derive(Debug)]
pub struct CheckBox {
    label: String,
    value: String,
    x: i32,
    y: i32,
    height: u16,
    z: i32,
    fg: Color,
    bg: Color,
    active: bool,
    group: RadioGroup,
    member: usize,
    visible: bool,
}

impl CheckBox {
    pub fn new(
        label: impl Into<String>,
        value: impl Into<String>,
        x: i32,
        y: i32,
        height: u16,
        z: i32,
        group: &RadioGroup,
    ) -> Self {
        let value = value.into();
        let member = group.join(&value);
        Self {
            label: label.into(),
            value,
            x,
            y,
            height,
            z,
            fg: Color::TEXT_WHITE,
            bg: Color::BG_BLUE,
            active: false,
            group: group.clone(),
            member,
            visible: true,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_checked(&self) -> bool {
        self.group.selected() == Some(self.member)
    }

    /// Check this box, unchecking the rest of the group.
    pub fn check(&self) {
        self.group.select(self.member);
        stui_core::info!(label = %self.label, "checkbox selected");
    }

    fn frame_width(&self) -> usize {
        self.label.chars().count() + 10
    }

    fn frame_char(&self, row: usize, col: usize, width: usize) -> char {
        let last_row = usize::from(self.height).saturating_sub(1);
        let last_col = width - 1;
        match (row, col) {
            (0, 0) => '┌',
            (0, c) if c == last_col => '┐',
            (r, 0) if r == last_row => '└',
            (r, c) if r == last_row && c == last_col => '┘',
            (r, _) if r == 0 || r == last_row => '-',
            (_, c) if c == 0 || c == last_col => '|',
            _ => ' ',
        }
    }
}

impl Focusable for CheckBox {
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

impl Component for CheckBox {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, span(self.frame_width()), self.height)
    }

    fn z_index(&self) -> i32 {
        self.z
    }

    fn draw(&self, screen: &mut ScreenBuffer) {
        let width = self.frame_width();
        let mut line = String::with_capacity(width);
        for (row, y) in (0..usize::from(self.height)).zip(self.y..) {
            line.clear();
            line.extend((0..width).map(|col| self.frame_char(row, col, width)));
            screen.set_text(self.x, y, &line, self.fg, self.bg, self.z);
        }
        let mark = if self.is_checked() { "[X] " } else { "[ ] " };
        let text = format!("{mark}{}", self.label);
        let mid = self.y + i32::from(self.height / 2);
        screen.set_text(self.x + 2, mid, &text, self.fg, self.bg, self.z);
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn highlight(&mut self) {
        self.bg = Color::BG_BRIGHT_BLUE;
    }

    fn reset_highlight(&mut self) {
        self.bg = Color::BG_BLUE;
    }

    fn perform_action(&mut self) -> WidgetResult<Cmd> {
        self.check();
        Ok(Cmd::Render)
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
