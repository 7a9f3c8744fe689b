#![forbid(unsafe_code)]

//! The UI root: tabs, the screen buffer, and the render pass.
//!
//! A [`Manager`] belongs to exactly one session and is only ever touched by
//! that session's interpreter thread. Key events go in through
//! [`Manager::dispatch`]; whatever the focused widget hands back as a
//! [`Cmd`] is applied here, so widgets never need a reference to their
//! owner.
//!
//! Rendering is lazy. Anything that changes what is on screen marks the
//! manager dirty, and [`Manager::render_if_dirty`] draws every tab and
//! writes one frame.

use std::io::{self, Write};

use stui_core::{KeyEvent, KeyLabel};
use stui_render::ScreenBuffer;
use stui_widgets::{Capabilities, Cmd, Component, Focusable, Routed, Tab, TabId, WidgetResult};

/// Owns the tabs of one session and the screen they draw into.
#[derive(Debug)]
pub struct Manager {
    screen: ScreenBuffer,
    tabs: Vec<Tab>,
    active: usize,
    dirty: bool,
    next_tab_id: u64,
}

impl Manager {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            screen: ScreenBuffer::new(width, height),
            tabs: Vec::new(),
            active: 0,
            dirty: true,
            next_tab_id: 0,
        }
    }

    /// Adopt `tab`. The first tab added becomes the active one.
    pub fn add_tab(&mut self, mut tab: Tab) -> TabId {
        let id = TabId(self.next_tab_id);
        self.next_tab_id += 1;
        tab.attach(id);
        if self.tabs.is_empty() {
            tab.set_active(true);
            self.active = 0;
        }
        tracing::debug!(tab = %id, title = tab.title(), "tab added");
        self.tabs.push(tab);
        self.dirty = true;
        id
    }

    /// Builder form of [`Manager::add_tab`].
    #[must_use]
    pub fn with_tab(mut self, tab: Tab) -> Self {
        self.add_tab(tab);
        self
    }

    #[inline]
    pub fn size(&self) -> (u16, u16) {
        (self.screen.width(), self.screen.height())
    }

    #[inline]
    pub fn screen(&self) -> &ScreenBuffer {
        &self.screen
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    #[inline]
    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.active)
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        self.tabs.get_mut(self.active)
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id() == id)
    }

    /// Make tab `index` the active one. Out-of-range indices are ignored.
    pub fn select_tab(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            tracing::trace!(index, tabs = self.tabs.len(), "no such tab");
            return false;
        }
        if let Some(old) = self.tabs.get_mut(self.active) {
            old.set_active(false);
        }
        self.screen.clear_layers();
        self.active = index;
        self.tabs[index].set_active(true);
        self.dirty = true;
        tracing::debug!(index, title = self.tabs[index].title(), "tab selected");
        true
    }

    pub fn next_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.select_tab((self.active + 1) % self.tabs.len());
        }
    }

    pub fn prev_tab(&mut self) {
        if !self.tabs.is_empty() {
            let n = self.tabs.len();
            self.select_tab((self.active + n - 1) % n);
        }
    }

    /// Route one key event through the UI.
    ///
    /// Function keys select tabs. Everything else goes to the active tab;
    /// ARROW_LEFT / ARROW_RIGHT switch tabs when the tab leaves them alone.
    pub fn dispatch(&mut self, event: &KeyEvent) -> WidgetResult<()> {
        let label = event.label();
        if let Some(index) = label.function_key_index() {
            self.select_tab(index);
            return Ok(());
        }
        let Some(tab) = self.tabs.get_mut(self.active) else {
            return Ok(());
        };
        match tab.route_key(event)? {
            Routed::Handled(cmd) => self.apply(cmd),
            Routed::Unhandled => match label {
                KeyLabel::ArrowRight => self.next_tab(),
                KeyLabel::ArrowLeft => self.prev_tab(),
                _ => tracing::trace!(key = %event, "key not handled"),
            },
        }
        Ok(())
    }

    /// Apply a widget command.
    pub fn apply(&mut self, cmd: Cmd) {
        if !cmd.is_none() {
            tracing::trace!(cmd = cmd.type_name(), "applying command");
        }
        match cmd {
            Cmd::None => {}
            Cmd::Render => self.dirty = true,
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.apply(cmd);
                }
            }
            Cmd::Detach { tab, component } => {
                let removed = self
                    .tabs
                    .iter_mut()
                    .find(|t| t.id() == tab)
                    .and_then(|t| t.remove(component));
                match removed {
                    Some(removed) => {
                        self.screen.clear_rect(removed.bounds());
                        self.dirty = true;
                    }
                    None => tracing::debug!(%tab, %component, "detach target not found"),
                }
            }
            Cmd::Hide(component) => {
                if let Some(area) = self.active_tab_mut().and_then(|t| t.hide_child(component)) {
                    self.screen.clear_rect(area);
                    self.dirty = true;
                }
            }
            Cmd::Show(component) => {
                if self.active_tab_mut().is_some_and(|t| t.show_child(component)) {
                    self.dirty = true;
                }
            }
            Cmd::Add(component) => {
                let capture = component
                    .capabilities()
                    .contains(Capabilities::KEY_CAPTURE);
                if let Some(tab) = self.tabs.get_mut(self.active) {
                    let id = tab.add(component);
                    if capture {
                        tab.focus(id);
                    }
                    self.dirty = true;
                }
            }
        }
    }

    /// Resize the screen and every tab. The screen content is discarded.
    pub fn resize_ui(&mut self, width: u16, height: u16) {
        tracing::info!(width, height, "resizing UI");
        self.screen.resize(width, height);
        for tab in &mut self.tabs {
            tab.window_resized(width, height);
        }
        self.dirty = true;
    }

    /// Prepare the first frame.
    pub fn initialize(&mut self) {
        if !self.tabs.iter().any(|t| t.is_active()) && !self.tabs.is_empty() {
            self.select_tab(0);
        }
        self.screen.clear_layers();
        self.dirty = true;
    }

    /// Draw every tab and write one frame.
    pub fn render<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for tab in &self.tabs {
            tab.draw(&mut self.screen);
        }
        self.screen.refresh(out)?;
        self.dirty = false;
        Ok(())
    }

    /// Render if something changed since the last frame.
    pub fn render_if_dirty<W: Write>(&mut self, out: &mut W) -> io::Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.render(out)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stui_core::Color;
    use stui_widgets::{Button, ComponentId, Dialog, Label, TextField};

    fn key(label: KeyLabel) -> KeyEvent {
        KeyEvent::functional(label)
    }

    fn three_tabs() -> Manager {
        Manager::new(40, 12)
            .with_tab(Tab::new("One", 0, 0, 40, 12, 0).with(Button::new("A", 2, 3, 6, 1, 1)))
            .with_tab(Tab::new("Two", 9, 0, 40, 12, 0))
            .with_tab(Tab::new("Three", 18, 0, 40, 12, 0))
    }

    #[test]
    fn first_tab_starts_active() {
        let manager = three_tabs();
        assert_eq!(manager.active_index(), 0);
        assert!(manager.tabs()[0].is_active());
        assert!(!manager.tabs()[1].is_active());
        assert_eq!(manager.tabs()[2].id(), TabId(2));
    }

    #[test]
    fn function_keys_select_tabs() {
        let mut manager = three_tabs();
        manager.dispatch(&key(KeyLabel::F3)).unwrap();
        assert_eq!(manager.active_index(), 2);
        assert!(manager.tabs()[2].is_active());
        assert!(!manager.tabs()[0].is_active());
        manager.dispatch(&key(KeyLabel::F9)).unwrap();
        assert_eq!(manager.active_index(), 2);
    }

    #[test]
    fn unhandled_arrows_switch_tabs_with_wrap() {
        let mut manager = three_tabs();
        manager.dispatch(&key(KeyLabel::ArrowLeft)).unwrap();
        assert_eq!(manager.active_index(), 2);
        manager.dispatch(&key(KeyLabel::ArrowRight)).unwrap();
        assert_eq!(manager.active_index(), 0);
        manager.dispatch(&key(KeyLabel::ArrowRight)).unwrap();
        assert_eq!(manager.active_index(), 1);
    }

    #[test]
    fn tab_switch_clears_layers() {
        let mut manager = three_tabs();
        let mut sink = Vec::new();
        manager.render(&mut sink).unwrap();
        assert!(manager.screen().layer_cell(4, 3, 1).is_some());
        manager.select_tab(1);
        assert_eq!(manager.screen().layer_cell(4, 3, 1), None);
        assert!(manager.is_dirty());
    }

    #[test]
    fn render_if_dirty_writes_once() {
        let mut manager = three_tabs();
        let mut sink = Vec::new();
        assert!(manager.render_if_dirty(&mut sink).unwrap());
        let len = sink.len();
        assert!(len > 0);
        assert!(!manager.render_if_dirty(&mut sink).unwrap());
        assert_eq!(sink.len(), len);
    }

    #[test]
    fn focus_moves_mark_dirty() {
        let mut manager = three_tabs();
        manager.render(&mut Vec::new()).unwrap();
        manager.dispatch(&key(KeyLabel::ArrowDown)).unwrap();
        assert!(manager.is_dirty());
        assert_eq!(manager.tabs()[0].focused(), Some(ComponentId(0)));
    }

    #[test]
    fn added_dialog_takes_focus_and_detaches_itself() {
        let mut manager = Manager::new(60, 20);
        let open = Button::new("Open", 2, 3, 8, 1, 1).on_press(|| {
            Ok(Cmd::Add(Box::new(Dialog::new(10, 4, 30, 8, 5, "Hi").score(2.5))))
        });
        manager.add_tab(Tab::new("Main", 0, 0, 60, 20, 0).with(open));
        manager.dispatch(&key(KeyLabel::ArrowDown)).unwrap();
        manager.dispatch(&key(KeyLabel::Enter)).unwrap();
        let tab = manager.active_tab().unwrap();
        assert_eq!(tab.len(), 2);
        assert_eq!(tab.focused(), Some(ComponentId(1)));

        manager.render(&mut Vec::new()).unwrap();
        assert!(manager.screen().layer_cell(10, 4, 5).is_some());

        // The dialog captures ARROW_RIGHT, so the tab does not change.
        manager.dispatch(&key(KeyLabel::ArrowRight)).unwrap();
        assert_eq!(manager.active_index(), 0);
        manager
            .dispatch(&KeyEvent::literal(" ", KeyLabel::Space))
            .unwrap();
        assert_eq!(manager.active_tab().unwrap().len(), 1);
        assert_eq!(manager.screen().layer_cell(10, 4, 5), None);
        assert!(manager.is_dirty());
    }

    #[test]
    fn hide_and_show_through_commands() {
        let mut manager = Manager::new(30, 10);
        manager.add_tab(Tab::new("Main", 0, 0, 30, 10, 0).with(Label::new(
            "note",
            1,
            2,
            1,
            Color::BG_WHITE,
        )));
        manager.render(&mut Vec::new()).unwrap();
        manager.apply(Cmd::Hide(ComponentId(0)));
        assert_eq!(manager.screen().layer_cell(1, 2, 1), None);
        manager.apply(Cmd::Show(ComponentId(0)));
        manager.render(&mut Vec::new()).unwrap();
        assert_eq!(manager.screen().layer_cell(1, 2, 1).map(|c| c.ch), Some('n'));
    }

    #[test]
    fn resize_reaches_tabs_and_screen() {
        let mut manager = three_tabs();
        manager.render(&mut Vec::new()).unwrap();
        manager.resize_ui(20, 6);
        assert_eq!(manager.size(), (20, 6));
        assert_eq!(manager.tabs()[1].bounds().width, 20);
        assert!(manager.is_dirty());
    }

    #[test]
    fn widget_errors_propagate() {
        let mut manager = Manager::new(20, 5);
        manager.add_tab(Tab::new("Main", 0, 0, 20, 5, 0).with(
            TextField::new(1, 2, 8, 1)
                .on_submit(|| Err(stui_widgets::WidgetError::action("invalid amount"))),
        ));
        manager.dispatch(&key(KeyLabel::ArrowDown)).unwrap();
        assert!(manager.dispatch(&key(KeyLabel::Enter)).is_err());
    }

    #[test]
    fn empty_manager_ignores_keys() {
        let mut manager = Manager::new(10, 4);
        manager.dispatch(&key(KeyLabel::ArrowRight)).unwrap();
        manager.dispatch(&key(KeyLabel::F1)).unwrap();
        manager.initialize();
        assert!(manager.render_if_dirty(&mut Vec::new()).unwrap());
    }
}
