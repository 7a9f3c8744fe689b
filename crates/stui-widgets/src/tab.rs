#![forbid(unsafe_code)]

//! Tabs: a titled page that owns its children and their focus cycle.
//!
//! A [`Tab`] is both a [`Component`] (the manager draws it and toggles its
//! highlight) and a container. Children are kept in insertion order, which
//! is also the focus order. Each adopted child gets a [`ComponentId`] that
//! stays valid until the child is removed.
//!
//! # Key routing
//!
//! [`Tab::route_key`] tries, in order:
//!
//! 1. a focused child with [`Capabilities::KEY_CAPTURE`] gets every key;
//! 2. ENTER, ENTER_ALT, or SPACE runs the focused child's action;
//! 3. a focused child with [`Capabilities::CHAR_INPUT`] gets literal keys
//!    and DELETE;
//! 4. ARROW_DOWN / ARROW_UP move the focus.
//!
//! Anything else comes back as [`Routed::Unhandled`] so the owner can use
//! it (the manager switches tabs on ARROW_LEFT / ARROW_RIGHT).

use stui_core::{Color, KeyEvent, KeyLabel, Rect};
use stui_render::{Cell, ScreenBuffer};

use crate::{
    Capabilities, Cmd, Component, ComponentId, FocusRing, Focusable, TabId, WidgetResult, span,
};

const TITLE_BG: Color = Color::BG_YELLOW;
const BODY_FG: Color = Color::TEXT_BLACK;
const BODY_BG: Color = Color::BG_BRIGHT_WHITE;
const FG: Color = Color::TEXT_WHITE;
const FG_HIGHLIGHT: Color = Color::TEXT_RED;

/// Outcome of [`Tab::route_key`].
#[derive(Debug)]
pub enum Routed {
    /// A child or the focus cycle consumed the key.
    Handled(Cmd),
    /// Nothing in the tab wanted the key.
    Unhandled,
}

impl Routed {
    #[inline]
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

struct Child {
    id: ComponentId,
    component: Box<dyn Component>,
}

impl Focusable for Child {
    fn is_interactable(&self) -> bool {
        self.component.is_interactable() && self.component.is_visible()
    }

    fn set_active(&mut self, active: bool) {
        self.component.set_active(active);
    }
}

/// A page of the UI. Only the active tab draws its body and children; every
/// tab draws its title.
pub struct Tab {
    id: TabId,
    title: String,
    x: i32,
    y: i32,
    width: u16,
    height: u16,
    z: i32,
    fg: Color,
    active: bool,
    children: Vec<Child>,
    ring: FocusRing,
    next_id: u64,
}

impl std::fmt::Debug for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tab")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("active", &self.active)
            .field("children", &self.children.len())
            .field("focused", &self.ring.current())
            .finish()
    }
}

impl Tab {
    /// A tab whose title sits at `(x, y)` and whose body covers a window of
    /// `width` × `height`.
    pub fn new(title: impl Into<String>, x: i32, y: i32, width: u16, height: u16, z: i32) -> Self {
        Self {
            id: TabId::default(),
            title: title.into(),
            x,
            y,
            width,
            height,
            z,
            fg: FG,
            active: false,
            children: Vec::new(),
            ring: FocusRing::new(),
            next_id: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Record the id the manager gave this tab and tell every child.
    pub fn attach(&mut self, id: TabId) {
        self.id = id;
        for child in &mut self.children {
            child.component.on_attach(id, child.id);
        }
    }

    /// Adopt `component` at the end of the focus order.
    pub fn add(&mut self, mut component: Box<dyn Component>) -> ComponentId {
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        component.on_attach(self.id, id);
        stui_core::debug!(tab = %self.id, component = %id, "component added");
        self.children.push(Child { id, component });
        id
    }

    /// Builder form of [`Tab::add`].
    #[must_use]
    pub fn with(mut self, component: impl Component + 'static) -> Self {
        self.add(Box::new(component));
        self
    }

    fn position(&self, id: ComponentId) -> Option<usize> {
        self.children.iter().position(|c| c.id == id)
    }

    /// Take a child out of the tab. The focus index follows the remaining
    /// children.
    pub fn remove(&mut self, id: ComponentId) -> Option<Box<dyn Component>> {
        let index = self.position(id)?;
        let child = self.children.remove(index);
        self.ring.on_removed(index);
        stui_core::debug!(tab = %self.id, component = %id, "component removed");
        Some(child.component)
    }

    /// Hide a child and return the area it occupied.
    pub fn hide_child(&mut self, id: ComponentId) -> Option<Rect> {
        let index = self.position(id)?;
        if self.ring.current() == Some(index) {
            self.children[index].component.set_active(false);
            self.ring.clear();
        }
        let component = &mut self.children[index].component;
        component.hide();
        Some(component.bounds())
    }

    pub fn show_child(&mut self, id: ComponentId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.children[index].component.show();
                true
            }
            None => false,
        }
    }

    /// Focus a child directly. Unknown ids are ignored.
    pub fn focus(&mut self, id: ComponentId) {
        if let Some(index) = self.position(id) {
            self.ring.focus(&mut self.children, index);
        }
    }

    /// Id of the focused child.
    pub fn focused(&self) -> Option<ComponentId> {
        self.ring
            .current()
            .and_then(|i| self.children.get(i))
            .map(|c| c.id)
    }

    pub fn focus_next(&mut self) {
        self.ring.move_next(&mut self.children);
    }

    pub fn focus_prev(&mut self) {
        self.ring.move_prev(&mut self.children);
    }

    pub fn child(&self, id: ComponentId) -> Option<&dyn Component> {
        self.children
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.component.as_ref())
    }

    pub fn child_ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.children.iter().map(|c| c.id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Deliver `event` to the focused child or the focus cycle.
    pub fn route_key(&mut self, event: &KeyEvent) -> WidgetResult<Routed> {
        let label = event.label();
        let focused = self.ring.current().filter(|&i| i < self.children.len());

        if let Some(index) = focused {
            let child = &mut self.children[index].component;
            let caps = child.capabilities();

            if caps.contains(Capabilities::KEY_CAPTURE) {
                return child.handle_key(event).map(Routed::Handled);
            }
            if label.is_activation() {
                return child.perform_action().map(Routed::Handled);
            }
            if caps.contains(Capabilities::CHAR_INPUT)
                && (!event.is_functional() || label == KeyLabel::Delete)
            {
                let cmd = if child.handle_char(event) {
                    Cmd::Render
                } else {
                    Cmd::None
                };
                return Ok(Routed::Handled(cmd));
            }
        }

        match label {
            KeyLabel::ArrowDown => {
                self.focus_next();
                Ok(Routed::Handled(Cmd::Render))
            }
            KeyLabel::ArrowUp => {
                self.focus_prev();
                Ok(Routed::Handled(Cmd::Render))
            }
            _ => Ok(Routed::Unhandled),
        }
    }

    fn draw_title(&self, screen: &mut ScreenBuffer) {
        let strip = format!("  {}  ", self.title);
        for (x, ch) in (self.x..).zip(strip.chars()) {
            screen.set_cell(x, self.y, self.z, Cell::new(ch, self.fg, TITLE_BG));
        }
    }

    /// Width of the title strip, for laying out the next tab.
    pub fn title_width(&self) -> u16 {
        span(self.title.chars().count() + 4)
    }
}

impl Focusable for Tab {
    fn is_interactable(&self) -> bool {
        true
    }

    fn set_active(&mut self, active: bool) {
        if active {
            self.highlight();
        } else {
            self.reset_highlight();
        }
    }
}

impl Component for Tab {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn z_index(&self) -> i32 {
        self.z
    }

    fn draw(&self, screen: &mut ScreenBuffer) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_draw",
            widget = "Tab",
            title = %self.title,
            active = self.active
        )
        .entered();

        if self.active {
            let blank = Cell::new(' ', BODY_FG, BODY_BG);
            let width = i32::from(self.width);
            for y in self.y + 1..i32::from(self.height) {
                for x in 0..width {
                    screen.set_cell(x, y, self.z, blank);
                }
            }
        }
        self.draw_title(screen);
        if self.active {
            for child in self.children.iter().filter(|c| c.component.is_visible()) {
                child.component.draw(screen);
            }
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn highlight(&mut self) {
        self.fg = FG_HIGHLIGHT;
        self.active = true;
    }

    fn reset_highlight(&mut self) {
        self.fg = FG;
        self.active = false;
    }

    fn handle_key(&mut self, event: &KeyEvent) -> WidgetResult<Cmd> {
        match self.route_key(event)? {
            Routed::Handled(cmd) => Ok(cmd),
            Routed::Unhandled => Ok(Cmd::None),
        }
    }

    fn window_resized(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        for child in &mut self.children {
            child.component.window_resized(width, height);
        }
    }

    fn on_attach(&mut self, tab: TabId, _id: ComponentId) {
        self.attach(tab);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Button, Label, TextField};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    fn key(label: KeyLabel) -> KeyEvent {
        KeyEvent::functional(label)
    }

    fn digit(d: u8) -> KeyEvent {
        let label = KeyLabel::digit(d).unwrap();
        KeyEvent::literal(d.to_string(), label)
    }

    /// Swallows every key while focused.
    struct Capture {
        keys: Arc<AtomicU32>,
        attached: Arc<Mutex<Option<(TabId, ComponentId)>>>,
    }

    impl Focusable for Capture {
        fn is_interactable(&self) -> bool {
            true
        }

        fn set_active(&mut self, _active: bool) {}
    }

    impl Component for Capture {
        fn bounds(&self) -> Rect {
            Rect::new(0, 0, 1, 1)
        }

        fn z_index(&self) -> i32 {
            0
        }

        fn draw(&self, _screen: &mut ScreenBuffer) {}

        fn capabilities(&self) -> Capabilities {
            Capabilities::INTERACTABLE | Capabilities::KEY_CAPTURE
        }

        fn handle_key(&mut self, _event: &KeyEvent) -> WidgetResult<Cmd> {
            self.keys.fetch_add(1, Ordering::Relaxed);
            Ok(Cmd::None)
        }

        fn on_attach(&mut self, tab: TabId, id: ComponentId) {
            *self.attached.lock().unwrap() = Some((tab, id));
        }
    }

    #[test]
    fn ids_are_assigned_in_order() {
        let mut tab = Tab::new("Main", 0, 0, 80, 24, 0);
        let a = tab.add(Box::new(Label::new("a", 0, 2, 1, Color::BG_WHITE)));
        let b = tab.add(Box::new(Label::new("b", 0, 3, 1, Color::BG_WHITE)));
        assert_eq!((a, b), (ComponentId(0), ComponentId(1)));
        assert_eq!(tab.child_ids().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn attach_reaches_existing_children() {
        let attached = Arc::new(Mutex::new(None));
        let mut tab = Tab::new("Main", 0, 0, 80, 24, 0);
        let id = tab.add(Box::new(Capture {
            keys: Arc::new(AtomicU32::new(0)),
            attached: Arc::clone(&attached),
        }));
        assert_eq!(*attached.lock().unwrap(), Some((TabId(0), id)));
        tab.attach(TabId(7));
        assert_eq!(tab.id(), TabId(7));
        assert_eq!(*attached.lock().unwrap(), Some((TabId(7), id)));
    }

    #[test]
    fn arrows_cycle_over_interactable_children() {
        let mut tab = Tab::new("Main", 0, 0, 80, 24, 0)
            .with(Label::new("skip", 0, 2, 1, Color::BG_WHITE))
            .with(Button::new("A", 0, 3, 4, 1, 1))
            .with(Button::new("B", 0, 4, 4, 1, 1));
        assert!(tab.route_key(&key(KeyLabel::ArrowDown)).unwrap().is_handled());
        assert_eq!(tab.focused(), Some(ComponentId(1)));
        tab.route_key(&key(KeyLabel::ArrowDown)).unwrap();
        assert_eq!(tab.focused(), Some(ComponentId(2)));
        tab.route_key(&key(KeyLabel::ArrowDown)).unwrap();
        assert_eq!(tab.focused(), Some(ComponentId(1)));
        tab.route_key(&key(KeyLabel::ArrowUp)).unwrap();
        assert_eq!(tab.focused(), Some(ComponentId(2)));
    }

    #[test]
    fn left_and_right_are_unhandled() {
        let mut tab = Tab::new("Main", 0, 0, 80, 24, 0).with(Button::new("A", 0, 3, 4, 1, 1));
        tab.focus_next();
        let routed = tab.route_key(&key(KeyLabel::ArrowRight)).unwrap();
        assert!(!routed.is_handled());
        assert!(!tab.route_key(&key(KeyLabel::ArrowLeft)).unwrap().is_handled());
    }

    #[test]
    fn activation_runs_focused_action() {
        let presses = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&presses);
        let mut tab = Tab::new("Main", 0, 0, 80, 24, 0).with(
            Button::new("Go", 0, 3, 4, 1, 1).on_press(move || {
                counter.fetch_add(1, Ordering::Relaxed);
                Ok(Cmd::Render)
            }),
        );
        // Nothing focused yet.
        assert!(!tab.route_key(&key(KeyLabel::Enter)).unwrap().is_handled());
        tab.focus_next();
        for label in [KeyLabel::Enter, KeyLabel::EnterAlt] {
            tab.route_key(&key(label)).unwrap();
        }
        tab.route_key(&KeyEvent::literal(" ", KeyLabel::Space)).unwrap();
        assert_eq!(presses.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn digits_reach_char_input_child() {
        let field = TextField::new(0, 3, 10, 1);
        let value = field.value();
        let mut tab = Tab::new("Main", 0, 0, 80, 24, 0).with(field);
        tab.focus_next();
        assert!(matches!(
            tab.route_key(&digit(4)).unwrap(),
            Routed::Handled(Cmd::Render)
        ));
        tab.route_key(&digit(2)).unwrap();
        tab.route_key(&key(KeyLabel::Delete)).unwrap();
        assert_eq!(value.get(), "4");
    }

    #[test]
    fn digits_without_char_input_are_unhandled() {
        let mut tab = Tab::new("Main", 0, 0, 80, 24, 0).with(Button::new("A", 0, 3, 4, 1, 1));
        tab.focus_next();
        assert!(!tab.route_key(&digit(1)).unwrap().is_handled());
    }

    #[test]
    fn key_capture_takes_everything() {
        let keys = Arc::new(AtomicU32::new(0));
        let mut tab = Tab::new("Main", 0, 0, 80, 24, 0);
        tab.add(Box::new(Button::new("A", 0, 3, 4, 1, 1)));
        let id = tab.add(Box::new(Capture {
            keys: Arc::clone(&keys),
            attached: Arc::default(),
        }));
        tab.focus(id);
        for label in [KeyLabel::ArrowDown, KeyLabel::Enter, KeyLabel::ArrowLeft] {
            assert!(tab.route_key(&key(label)).unwrap().is_handled());
        }
        assert_eq!(keys.load(Ordering::Relaxed), 3);
        assert_eq!(tab.focused(), Some(id));
    }

    #[test]
    fn remove_keeps_focus_on_same_child() {
        let mut tab = Tab::new("Main", 0, 0, 80, 24, 0);
        let a = tab.add(Box::new(Button::new("A", 0, 3, 4, 1, 1)));
        let b = tab.add(Box::new(Button::new("B", 0, 4, 4, 1, 1)));
        tab.focus(b);
        assert!(tab.remove(a).is_some());
        assert_eq!(tab.focused(), Some(b));
        assert!(tab.remove(b).is_some());
        assert_eq!(tab.focused(), None);
        assert!(tab.remove(b).is_none());
        assert!(tab.is_empty());
    }

    #[test]
    fn hidden_children_are_skipped_and_not_drawn() {
        let mut tab = Tab::new("Main", 0, 0, 20, 10, 0);
        let a = tab.add(Box::new(Button::new("A", 0, 3, 4, 1, 1)));
        let b = tab.add(Box::new(Button::new("B", 0, 4, 4, 1, 1)));
        tab.focus(a);
        assert_eq!(tab.hide_child(a), Some(Rect::new(0, 3, 4, 1)));
        assert_eq!(tab.focused(), None);
        tab.focus_next();
        tab.focus_next();
        assert_eq!(tab.focused(), Some(b));

        tab.set_active(true);
        let mut screen = ScreenBuffer::new(20, 10);
        tab.draw(&mut screen);
        assert_eq!(screen.layer_cell(1, 3, 1), None);
        assert!(tab.show_child(a));
        tab.draw(&mut screen);
        assert_eq!(screen.layer_cell(1, 3, 1).map(|c| c.ch), Some('A'));
    }

    fn cells_on_layer(screen: &ScreenBuffer, area: Rect, z: i32) -> usize {
        (area.y..area.bottom())
            .flat_map(|y| (area.x..area.right()).map(move |x| (x, y)))
            .filter(|&(x, y)| screen.layer_cell(x, y, z).is_some())
            .count()
    }

    #[test]
    fn every_widget_kind_can_be_hidden_and_shown() {
        let group = crate::RadioGroup::new();
        let widgets: Vec<Box<dyn Component>> = vec![
            Box::new(Label::new("label", 2, 3, 1, Color::BG_WHITE)),
            Box::new(Button::new("B", 2, 3, 4, 1, 1)),
            Box::new(crate::Table::new(2, 3, 2, ["a", "b"], 1)),
            Box::new(crate::List::new(["one", "two"], 2, 3, 1)),
            Box::new(crate::ScrollBar::new(2, 3, 4, 1)),
            Box::new(crate::ProgressBar::new(2, 3, 10, 1).with_progress(0.5)),
            Box::new(crate::CheckBox::new("Table", "table", 2, 3, 3, 1, &group)),
            Box::new(TextField::new(2, 3, 8, 1)),
            Box::new(crate::Border::new(2, 3, 8, 4, 1)),
        ];
        for widget in widgets {
            let mut tab = Tab::new("Main", 0, 0, 20, 10, 0);
            let id = tab.add(widget);
            tab.set_active(true);

            let area = tab.hide_child(id).unwrap();
            assert!(!tab.child(id).unwrap().is_visible(), "{area:?}");
            let mut screen = ScreenBuffer::new(20, 10);
            tab.draw(&mut screen);
            assert_eq!(cells_on_layer(&screen, area, 1), 0, "hidden {area:?}");

            assert!(tab.show_child(id));
            assert!(tab.child(id).unwrap().is_visible());
            let mut screen = ScreenBuffer::new(20, 10);
            tab.draw(&mut screen);
            assert!(cells_on_layer(&screen, area, 1) > 0, "shown {area:?}");
        }
    }

    #[test]
    fn inactive_tab_draws_only_its_title() {
        let tab = Tab::new("Main", 2, 0, 20, 10, 0).with(Label::new("hi", 5, 5, 1, Color::BG_WHITE));
        let mut screen = ScreenBuffer::new(20, 10);
        tab.draw(&mut screen);
        assert_eq!(
            screen.layer_cell(4, 0, 0),
            Some(Cell::new('M', FG, TITLE_BG))
        );
        assert_eq!(screen.layer_cell(2, 0, 0).map(|c| c.ch), Some(' '));
        assert_eq!(screen.layer_cell(9, 0, 0).map(|c| c.ch), Some(' '));
        assert_eq!(screen.layer_cell(0, 5, 0), None);
        assert!(!screen.has_layer(1));
    }

    #[test]
    fn active_tab_fills_body_and_draws_children() {
        let mut tab =
            Tab::new("Main", 2, 0, 20, 10, 0).with(Label::new("hi", 5, 5, 1, Color::BG_WHITE));
        tab.set_active(true);
        let mut screen = ScreenBuffer::new(20, 10);
        tab.draw(&mut screen);
        assert_eq!(
            screen.layer_cell(0, 5, 0),
            Some(Cell::new(' ', BODY_FG, BODY_BG))
        );
        assert_eq!(
            screen.layer_cell(4, 0, 0),
            Some(Cell::new('M', FG_HIGHLIGHT, TITLE_BG))
        );
        screen.merge();
        assert_eq!(screen.merged_cell(5, 5).map(|c| c.ch), Some('h'));
    }

    #[test]
    fn resize_reaches_children() {
        let mut tab = Tab::new("Main", 0, 0, 80, 24, 0).with(crate::Border::new(0, 1, 80, 23, 1));
        tab.window_resized(40, 12);
        assert_eq!(tab.bounds(), Rect::new(0, 0, 40, 12));
        assert_eq!(
            tab.child(ComponentId(0)).map(|c| c.bounds()),
            Some(Rect::new(0, 1, 40, 11))
        );
    }
}
