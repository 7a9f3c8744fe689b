#![forbid(unsafe_code)]

//! Group container widget.
//!
//! A [`Group`] occupies one slot in its tab and draws whatever children its
//! [`GroupContent`] handle currently holds. The handle is cloneable, so an
//! action can swap the content of a group that already has a
//! [`ComponentId`](crate::ComponentId), and a later `Cmd::Show` / `Cmd::Hide`
//! on that id applies to everything inside.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stui_core::Rect;
use stui_render::ScreenBuffer;

use crate::{Component, Focusable};

/// Shared, replaceable children of a [`Group`].
#[derive(Clone, Default)]
pub struct GroupContent {
    inner: Arc<Mutex<Vec<Box<dyn Component>>>>,
}

impl std::fmt::Debug for GroupContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupContent")
            .field("len", &self.len())
            .field("bounds", &self.bounds())
            .finish()
    }
}

impl GroupContent {
    fn lock(&self) -> MutexGuard<'_, Vec<Box<dyn Component>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop the current children and take `children` instead.
    pub fn replace(&self, children: Vec<Box<dyn Component>>) {
        *self.lock() = children;
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Area covered by every child.
    pub fn bounds(&self) -> Rect {
        self.lock()
            .iter()
            .fold(Rect::default(), |acc, child| acc.union(&child.bounds()))
    }
}

/// Draws its children in insertion order. Never takes focus.
#[derive(Debug)]
pub struct Group {
    content: GroupContent,
    z: i32,
    visible: bool,
}

impl Group {
    pub fn new(z: i32) -> Self {
        Self {
            content: GroupContent::default(),
            z,
            visible: true,
        }
    }

    /// Start hidden until something shows the group.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Handle for replacing the children later.
    pub fn content(&self) -> GroupContent {
        self.content.clone()
    }
}

impl Focusable for Group {
    fn is_interactable(&self) -> bool {
        false
    }

    fn set_active(&mut self, _active: bool) {}
}

impl Component for Group {
    fn bounds(&self) -> Rect {
        self.content.bounds()
    }

    fn z_index(&self) -> i32 {
        self.z
    }

    fn draw(&self, screen: &mut ScreenBuffer) {
        for child in self.content.lock().iter().filter(|c| c.is_visible()) {
            child.draw(screen);
        }
    }

    fn window_resized(&mut self, width: u16, height: u16) {
        for child in self.content.lock().iter_mut() {
            child.window_resized(width, height);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{List, ScrollBar, Table};

    fn list_with_bar() -> Vec<Box<dyn Component>> {
        let list = List::new(["Year  Value", "1  110.00"], 4, 13, 2);
        let bar = ScrollBar::beside(list.bounds(), 2);
        vec![Box::new(list), Box::new(bar)]
    }

    #[test]
    fn empty_group_covers_nothing() {
        let group = Group::new(2);
        assert!(group.bounds().is_empty());
        assert!(group.content().is_empty());
        let mut screen = ScreenBuffer::new(10, 10);
        group.draw(&mut screen);
        assert!(!screen.has_layer(2));
    }

    #[test]
    fn bounds_span_all_children() {
        let group = Group::new(2);
        group.content().replace(list_with_bar());
        let list = List::new(["Year  Value", "1  110.00"], 4, 13, 2).bounds();
        let bar = ScrollBar::beside(list, 2).bounds();
        assert_eq!(group.bounds(), list.union(&bar));
        assert_eq!(group.content().len(), 2);
    }

    #[test]
    fn replace_swaps_what_is_drawn() {
        let group = Group::new(2);
        let content = group.content();
        content.replace(list_with_bar());
        content.replace(vec![Box::new(Table::new(4, 13, 2, ["a", "b"], 2))]);

        let mut screen = ScreenBuffer::new(40, 30);
        group.draw(&mut screen);
        assert_eq!(screen.layer_cell(4, 13, 2).map(|c| c.ch), Some('+'));
        assert_eq!(content.len(), 1);

        content.clear();
        assert!(group.bounds().is_empty());
    }

    #[test]
    fn hidden_builder_and_toggle() {
        let mut group = Group::new(2).hidden();
        assert!(!group.is_visible());
        group.show();
        assert!(group.is_visible());
        group.hide();
        assert!(!group.is_visible());
        assert!(!group.is_interactable());
    }
}
