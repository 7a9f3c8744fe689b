#![forbid(unsafe_code)]

//! Circular focus cycling.
//!
//! [`FocusRing`] walks an ordered slice of [`Focusable`] items, skipping the
//! ones that cannot take focus. Tabs run it over their children and dialogs
//! over their buttons, so both scopes behave identically.
//!
//! # Invariants
//!
//! 1. After a move on a non-empty slice, `current` is `Some(i)` with `i < n`.
//! 2. At most one item is active: the previous one is deactivated before the
//!    next is activated.
//! 3. A scan never loops more than once; if no item is interactable the scan
//!    stops where it started and that index is activated anyway.

use crate::Focusable;

/// Index of the focused item, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusRing {
    current: Option<usize>,
}

impl FocusRing {
    #[inline]
    pub const fn new() -> Self {
        Self { current: None }
    }

    #[inline]
    pub const fn current(&self) -> Option<usize> {
        self.current
    }

    /// Forget the focus without touching any item.
    #[inline]
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Drop a stale index and deactivate the focused item.
    fn release<T: Focusable>(&mut self, items: &mut [T]) {
        if self.current.is_some_and(|i| i >= items.len()) {
            stui_core::warn!(
                current = ?self.current,
                len = items.len(),
                "focus index out of range, resetting"
            );
            self.current = None;
        }
        if let Some(i) = self.current {
            items[i].set_active(false);
        }
    }

    /// Focus the next interactable item, wrapping around.
    pub fn move_next<T: Focusable>(&mut self, items: &mut [T]) {
        let n = items.len();
        if n == 0 {
            return;
        }
        self.release(items);

        let start = self.current.unwrap_or(n - 1);
        let mut i = start;
        loop {
            i = (i + 1) % n;
            if items[i].is_interactable() || i == start {
                break;
            }
        }
        self.activate(items, i);
    }

    /// Focus the previous interactable item, wrapping around.
    pub fn move_prev<T: Focusable>(&mut self, items: &mut [T]) {
        let n = items.len();
        if n == 0 {
            return;
        }
        self.release(items);

        let start = self.current.unwrap_or(0);
        let mut i = start;
        loop {
            i = if i == 0 { n - 1 } else { i - 1 };
            if items[i].is_interactable() || i == start {
                break;
            }
        }
        self.activate(items, i);
    }

    /// Move focus straight to `index`. Out-of-range indices are ignored.
    pub fn focus<T: Focusable>(&mut self, items: &mut [T], index: usize) {
        if index >= items.len() {
            return;
        }
        self.release(items);
        self.activate(items, index);
    }

    fn activate<T: Focusable>(&mut self, items: &mut [T], index: usize) {
        self.current = Some(index);
        items[index].set_active(true);
        stui_core::trace!(index, "focus moved");
    }

    /// Keep the index pointing at the same item after `removed` is taken
    /// out of the slice. Removing the focused item clears the focus.
    pub fn on_removed(&mut self, removed: usize) {
        self.current = match self.current {
            Some(i) if i == removed => None,
            Some(i) if i > removed => Some(i - 1),
            other => other,
        };
    }
}
