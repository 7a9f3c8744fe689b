#![forbid(unsafe_code)]

//! Modal dialog with OK / CANCEL buttons.
//!
//! A [`Dialog`] is a nested focus scope: while it is focused in its tab it
//! captures every key ([`Capabilities::KEY_CAPTURE`]) and cycles its own two
//! buttons with ARROW_LEFT / ARROW_RIGHT. SPACE presses the focused button.
//!
//! The dialog never touches its tab. Cancelling returns a
//! [`Cmd::Detach`] naming the tab and id it learned in
//! [`Component::on_attach`], and the owner removes it.

use std::fmt;

use stui_core::{Color, KeyEvent, KeyLabel, Rect};
use stui_render::{Cell, ScreenBuffer};

use crate::{
    Action, Button, Capabilities, Cmd, Component, ComponentId, FocusRing, Focusable, TabId,
    WidgetResult, span,
};

const HORIZONTAL: char = '─';
const VERTICAL: char = '│';
const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';

const MIN_BUTTON_WIDTH: u16 = 10;
const TEXT_MARGIN: usize = 4;

const OK: usize = 0;

/// A framed box with a title, a message, and two buttons.
///
/// Confirming either shows the configured score as the message or runs the
/// confirm callback. Cancelling closes the dialog and, if it was opened on
/// behalf of another component, hides that component too.
pub struct Dialog {
    title: String,
    message: String,
    score: Option<f64>,
    x: i32,
    y: i32,
    width: u16,
    height: u16,
    z: i32,
    fg: Color,
    bg: Color,
    buttons: Vec<Button>,
    ring: FocusRing,
    active: bool,
    visible: bool,
    cancelled: bool,
    on_confirm: Option<Action>,
    on_behalf_of: Option<ComponentId>,
    attached: Option<(TabId, ComponentId)>,
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("title", &self.title)
            .field("message", &self.message)
            .field("active", &self.active)
            .field("cancelled", &self.cancelled)
            .field("focused", &self.ring.current())
            .field("attached", &self.attached)
            .finish()
    }
}

impl Dialog {
    pub fn new(
        x: i32,
        y: i32,
        width: u16,
        height: u16,
        z: i32,
        title: impl Into<String>,
    ) -> Self {
        let w = i32::from(width);
        let row = y + i32::from(height) - 3;
        let ok = Button::new("OK", x + w / 4, row, MIN_BUTTON_WIDTH, 1, z + 1);
        let cancel = Button::new(
            "CANCEL",
            x + 3 * w / 4 - i32::from(MIN_BUTTON_WIDTH),
            row,
            MIN_BUTTON_WIDTH,
            1,
            z + 1,
        );
        Self {
            title: title.into(),
            message: String::new(),
            score: None,
            x,
            y,
            width,
            height,
            z,
            fg: Color::TEXT_BLACK,
            bg: Color::BG_WHITE,
            buttons: vec![ok, cancel],
            ring: FocusRing::new(),
            active: false,
            visible: true,
            cancelled: false,
            on_confirm: None,
            on_behalf_of: None,
            attached: None,
        }
    }

    /// Show `score` (two decimals) when OK is pressed.
    #[must_use]
    pub fn score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Run `action` when OK is pressed and no score is set.
    #[must_use]
    pub fn on_confirm<F>(mut self, action: F) -> Self
    where
        F: FnMut() -> WidgetResult<Cmd> + Send + 'static,
    {
        self.on_confirm = Some(Box::new(action));
        self
    }

    /// Hide `component` (in the same tab) when the dialog is cancelled.
    #[must_use]
    pub fn on_behalf_of(mut self, component: ComponentId) -> Self {
        self.on_behalf_of = Some(component);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.message
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Index of the focused button: 0 is OK, 1 is CANCEL.
    pub fn focused_button(&self) -> Option<usize> {
        self.ring.current()
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    fn confirm(&mut self) -> WidgetResult<Cmd> {
        let cmd = match (self.score, self.on_confirm.as_mut()) {
            (Some(score), _) => {
                self.message = format!("{score:.2}");
                Cmd::None
            }
            (None, Some(action)) => action()?,
            (None, None) => Cmd::None,
        };
        stui_core::debug!(title = %self.title, message = %self.message, "dialog confirmed");
        Ok(Cmd::batch(vec![cmd, Cmd::Render]))
    }

    fn cancel(&mut self) -> Cmd {
        stui_core::info!(title = %self.title, "dialog cancelled");
        self.cancelled = true;
        self.active = false;
        for button in &mut self.buttons {
            button.hide();
        }
        self.ring.clear();

        let detach = self.attached.map_or(Cmd::None, |(tab, component)| Cmd::Detach {
            tab,
            component,
        });
        let hide = self.on_behalf_of.map_or(Cmd::None, Cmd::Hide);
        Cmd::batch(vec![detach, hide, Cmd::Render])
    }

    /// Split the message into at most two centered lines.
    fn wrapped(&self) -> (String, String) {
        let limit = usize::from(self.width).saturating_sub(TEXT_MARGIN);
        let chars: Vec<char> = self.message.chars().collect();
        if chars.len() <= limit {
            return (self.message.clone(), String::new());
        }
        let split = chars[..limit]
            .iter()
            .rposition(|&c| c == ' ')
            .unwrap_or(limit);
        let first: String = chars[..split].iter().collect();
        let second: String = chars[split..].iter().collect();
        (first.trim().to_owned(), second.trim().to_owned())
    }

    fn centered_x(&self, text: &str) -> i32 {
        let len = i32::from(span(text.chars().count()));
        self.x + (i32::from(self.width) - len) / 2
    }

    fn frame_char(&self, row: i32, col: i32) -> char {
        let last_row = i32::from(self.height) - 1;
        let last_col = i32::from(self.width) - 1;
        match (row, col) {
            (0, 0) => TOP_LEFT,
            (0, c) if c == last_col => TOP_RIGHT,
            (r, 0) if r == last_row => BOTTOM_LEFT,
            (r, c) if r == last_row && c == last_col => BOTTOM_RIGHT,
            (r, _) if r == 0 || r == last_row => HORIZONTAL,
            (_, c) if c == 0 || c == last_col => VERTICAL,
            _ => ' ',
        }
    }
}

impl Focusable for Dialog {
    fn is_interactable(&self) -> bool {
        true
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Component for Dialog {
    /// The frame plus its one-cell shadow on the right and bottom.
    fn bounds(&self) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.width.saturating_add(1),
            self.height.saturating_add(1),
        )
    }

    fn z_index(&self) -> i32 {
        self.z
    }

    fn capabilities(&self) -> Capabilities {
        if self.cancelled {
            Capabilities::INTERACTABLE
        } else {
            Capabilities::INTERACTABLE | Capabilities::KEY_CAPTURE
        }
    }

    fn draw(&self, screen: &mut ScreenBuffer) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_draw",
            widget = "Dialog",
            title = %self.title,
            cancelled = self.cancelled
        )
        .entered();

        let (w, h) = (i32::from(self.width), i32::from(self.height));
        for row in 0..h {
            for col in 0..w {
                let cell = Cell::new(self.frame_char(row, col), self.fg, self.bg);
                screen.set_cell(self.x + col, self.y + row, self.z, cell);
            }
        }

        let (first, second) = self.wrapped();
        let line_y = self.y + h / 2 - 1;
        screen.set_text(self.centered_x(&first), line_y, &first, self.fg, self.bg, self.z);
        if !second.is_empty() {
            let second_x = self.centered_x(&second);
            let len = i32::from(span(second.chars().count()));
            if second_x >= self.x && second_x + len < self.x + w {
                screen.set_text(second_x, line_y + 1, &second, self.fg, self.bg, self.z);
            } else {
                stui_core::warn!(title = %self.title, "dialog message does not fit");
            }
        }

        let shadow = Cell::new(' ', Color::TEXT_BLACK, Color::BG_BLACK);
        for row in 1..=h {
            screen.set_cell(self.x + w, self.y + row, self.z, shadow);
        }
        for col in 0..=w {
            screen.set_cell(self.x + col, self.y + h, self.z, shadow);
        }

        screen.set_text(
            self.centered_x(&self.title),
            self.y,
            &self.title,
            self.fg,
            self.bg,
            self.z,
        );

        for button in self.buttons.iter().filter(|b| b.is_visible()) {
            button.draw(screen);
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn handle_key(&mut self, event: &KeyEvent) -> WidgetResult<Cmd> {
        let cmd = match event.label() {
            KeyLabel::ArrowLeft if !self.cancelled => {
                self.ring.move_next(&mut self.buttons);
                Cmd::Render
            }
            KeyLabel::ArrowRight if !self.cancelled => {
                self.ring.move_prev(&mut self.buttons);
                Cmd::Render
            }
            KeyLabel::Space if self.active => match self.ring.current() {
                Some(OK) => self.confirm()?,
                Some(_) => self.cancel(),
                None => Cmd::None,
            },
            _ => Cmd::None,
        };
        for button in &mut self.buttons {
            if button.is_active() {
                button.highlight();
            } else {
                button.reset_highlight();
            }
        }
        Ok(cmd)
    }

    fn show(&mut self) {
        if self.cancelled {
            stui_core::debug!(title = %self.title, "cancelled dialog stays hidden");
            return;
        }
        self.visible = true;
        for button in &mut self.buttons {
            button.show();
        }
    }

    fn hide(&mut self) {
        self.active = false;
        self.visible = false;
        for button in &mut self.buttons {
            button.hide();
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn on_attach(&mut self, tab: TabId, id: ComponentId) {
        self.attached = Some((tab, id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn key(label: KeyLabel) -> KeyEvent {
        KeyEvent::functional(label)
    }

    fn space() -> KeyEvent {
        KeyEvent::literal(" ", KeyLabel::Space)
    }

    fn dialog() -> Dialog {
        let mut d = Dialog::new(10, 5, 40, 10, 5, "Result").score(0.4267);
        d.set_active(true);
        d
    }

    #[test]
    fn buttons_are_laid_out_under_the_message() {
        let d = dialog();
        assert_eq!(d.buttons()[0].bounds(), Rect::new(20, 12, 10, 1));
        assert_eq!(d.buttons()[1].bounds(), Rect::new(30, 12, 10, 1));
        assert_eq!(d.buttons()[0].z_index(), 6);
    }

    #[test]
    fn left_focuses_ok_right_focuses_cancel() {
        let mut d = dialog();
        assert!(matches!(d.handle_key(&key(KeyLabel::ArrowLeft)), Ok(Cmd::Render)));
        assert_eq!(d.focused_button(), Some(0));
        assert!(d.buttons()[0].is_active());

        let mut d = dialog();
        d.handle_key(&key(KeyLabel::ArrowRight)).unwrap();
        assert_eq!(d.focused_button(), Some(1));
        d.handle_key(&key(KeyLabel::ArrowRight)).unwrap();
        assert_eq!(d.focused_button(), Some(0));
        assert!(!d.buttons()[1].is_active());
    }

    #[test]
    fn confirm_shows_score() {
        let mut d = dialog();
        d.handle_key(&key(KeyLabel::ArrowLeft)).unwrap();
        let cmd = d.handle_key(&space()).unwrap();
        assert!(matches!(cmd, Cmd::Render));
        assert_eq!(d.text(), "0.43");
        assert!(!d.is_cancelled());
    }

    #[test]
    fn confirm_runs_callback_without_score() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let mut d = Dialog::new(0, 0, 30, 8, 1, "Ask").on_confirm(move || {
            counter.fetch_add(1, Ordering::Relaxed);
            Ok(Cmd::Hide(ComponentId(9)))
        });
        d.set_active(true);
        d.handle_key(&key(KeyLabel::ArrowLeft)).unwrap();
        match d.handle_key(&space()).unwrap() {
            Cmd::Batch(cmds) => {
                assert!(matches!(cmds[0], Cmd::Hide(ComponentId(9))));
                assert!(matches!(cmds[1], Cmd::Render));
            }
            other => panic!("expected batch, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn callback_error_propagates() {
        let mut d = Dialog::new(0, 0, 30, 8, 1, "Ask")
            .on_confirm(|| Err(crate::WidgetError::action("bad input")));
        d.set_active(true);
        d.handle_key(&key(KeyLabel::ArrowLeft)).unwrap();
        assert!(d.handle_key(&space()).is_err());
    }

    #[test]
    fn cancel_detaches_and_hides_requester() {
        let mut d = dialog().on_behalf_of(ComponentId(1));
        d.on_attach(TabId(2), ComponentId(5));
        d.handle_key(&key(KeyLabel::ArrowRight)).unwrap();
        match d.handle_key(&space()).unwrap() {
            Cmd::Batch(cmds) => {
                assert_eq!(cmds.len(), 3);
                assert!(matches!(
                    cmds[0],
                    Cmd::Detach {
                        tab: TabId(2),
                        component: ComponentId(5)
                    }
                ));
                assert!(matches!(cmds[1], Cmd::Hide(ComponentId(1))));
                assert!(matches!(cmds[2], Cmd::Render));
            }
            other => panic!("expected batch, got {other:?}"),
        }
        assert!(d.is_cancelled());
        assert!(d.buttons().iter().all(|b| !b.is_visible()));
    }

    #[test]
    fn cancelled_dialog_stops_capturing() {
        let mut d = dialog();
        assert!(d.capabilities().contains(Capabilities::KEY_CAPTURE));
        d.handle_key(&key(KeyLabel::ArrowRight)).unwrap();
        d.handle_key(&space()).unwrap();
        assert!(!d.capabilities().contains(Capabilities::KEY_CAPTURE));
        assert!(d.handle_key(&key(KeyLabel::ArrowLeft)).unwrap().is_none());
        assert_eq!(d.focused_button(), None);
    }

    #[test]
    fn space_needs_active_dialog() {
        let mut d = Dialog::new(0, 0, 30, 8, 1, "Idle").score(1.0);
        d.handle_key(&key(KeyLabel::ArrowLeft)).unwrap();
        assert!(d.handle_key(&space()).unwrap().is_none());
        assert_eq!(d.text(), "");
    }

    #[test]
    fn long_message_wraps_at_last_space() {
        let d = Dialog::new(0, 0, 20, 8, 1, "T").message("hello wonderful world");
        assert_eq!(
            d.wrapped(),
            ("hello wonderful".to_owned(), "world".to_owned())
        );
        let d = Dialog::new(0, 0, 10, 8, 1, "T").message("abcdefghij");
        assert_eq!(d.wrapped(), ("abcdef".to_owned(), "ghij".to_owned()));
    }

    #[test]
    fn draws_frame_title_shadow_and_buttons() {
        let mut screen = ScreenBuffer::new(60, 20);
        let d = dialog().message("Score");
        d.draw(&mut screen);
        let ch = |x, y| screen.layer_cell(x, y, 5).map(|c| c.ch);
        assert_eq!(ch(10, 5), Some(TOP_LEFT));
        assert_eq!(ch(49, 14), Some(BOTTOM_RIGHT));
        assert_eq!(ch(10, 10), Some(VERTICAL));
        // "Result" centered on the top edge.
        assert_eq!(ch(27, 5), Some('R'));
        // "Score" centered at y + h/2 - 1.
        assert_eq!(ch(27, 9), Some('S'));
        assert_eq!(
            screen.layer_cell(50, 8, 5),
            Some(Cell::new(' ', Color::TEXT_BLACK, Color::BG_BLACK))
        );
        assert_eq!(screen.layer_cell(24, 12, 6).map(|c| c.ch), Some('O'));
        assert_eq!(d.bounds(), Rect::new(10, 5, 41, 11));
    }

    #[test]
    fn hidden_dialog_is_invisible_and_cancelled_stays_hidden() {
        let mut d = dialog();
        d.hide();
        assert!(!d.is_visible());
        d.show();
        assert!(d.is_visible());
        d.handle_key(&key(KeyLabel::ArrowRight)).unwrap();
        // Hidden via hide() above, so re-activate before pressing.
        d.set_active(true);
        d.handle_key(&space()).unwrap();
        d.hide();
        d.show();
        assert!(!d.is_visible());
    }
}
