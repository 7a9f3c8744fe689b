#![forbid(unsafe_code)]

//! Widgets for stui.
//!
//! Every widget implements [`Component`]: it knows its footprint, draws
//! itself into a [`ScreenBuffer`], and reacts to keys. Widgets never hold a
//! reference to whatever owns them. When an action needs to change the tree
//! (close a dialog, add a result label) it returns a [`Cmd`] and the owner
//! applies it.
//!
//! Input routing is driven by [`Capabilities`] rather than by asking which
//! concrete widget is focused.

pub mod border;
pub mod button;
pub mod checkbox;
pub mod dialog;
pub mod focus;
pub mod group;
pub mod label;
pub mod list;
pub mod progress;
pub mod scrollbar;
pub mod tab;
pub mod table;
pub mod text_field;

use std::fmt;

use bitflags::bitflags;
use stui_core::{KeyEvent, Rect};
use stui_render::ScreenBuffer;

pub use border::Border;
pub use button::Button;
pub use checkbox::{CheckBox, RadioGroup};
pub use dialog::Dialog;
pub use focus::FocusRing;
pub use group::{Group, GroupContent};
pub use label::Label;
pub use list::List;
pub use progress::ProgressBar;
pub use scrollbar::ScrollBar;
pub use tab::{Routed, Tab};
pub use table::Table;
pub use text_field::{TextField, TextValue};

/// Handle for a component inside a [`Tab`]. Unique within its tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ComponentId(pub u64);

/// Handle for a tab inside its manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TabId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

bitflags! {
    /// How a component takes part in input routing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// Can receive focus.
        const INTERACTABLE = 0b0000_0001;
        /// Accepts literal keys and DELETE through `handle_char`.
        const CHAR_INPUT   = 0b0000_0010;
        /// Receives every key through `handle_key` while focused.
        const KEY_CAPTURE  = 0b0000_0100;
    }
}

/// Error raised by a widget action.
#[derive(Debug)]
pub enum WidgetError {
    /// An action callback failed.
    Action(String),
    /// I/O error while acting.
    Io(std::io::Error),
}

impl WidgetError {
    pub fn action(msg: impl Into<String>) -> Self {
        Self::Action(msg.into())
    }
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::Action(msg) => write!(f, "widget action failed: {msg}"),
            WidgetError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for WidgetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WidgetError::Action(_) => None,
            WidgetError::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for WidgetError {
    fn from(e: std::io::Error) -> Self {
        WidgetError::Io(e)
    }
}

/// Result type for widget actions.
pub type WidgetResult<T> = Result<T, WidgetError>;

/// Boxed action callback run by buttons, text fields, and dialogs.
pub type Action = Box<dyn FnMut() -> WidgetResult<Cmd> + Send>;

/// An effect for the component's owner to apply.
#[derive(Default)]
pub enum Cmd {
    /// Nothing to do.
    #[default]
    None,
    /// Something visible changed; render a frame.
    Render,
    /// Apply several commands in order.
    Batch(Vec<Cmd>),
    /// Remove `component` from `tab` and clear its footprint.
    Detach { tab: TabId, component: ComponentId },
    /// Hide a component of the active tab.
    Hide(ComponentId),
    /// Show a previously hidden component of the active tab.
    Show(ComponentId),
    /// Adopt a new component into the active tab.
    Add(Box<dyn Component>),
}

impl Cmd {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn render() -> Self {
        Self::Render
    }

    /// Combine commands, dropping `None`s. Zero or one survivor collapses.
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Short name for logging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Render => "Render",
            Self::Batch(_) => "Batch",
            Self::Detach { .. } => "Detach",
            Self::Hide(_) => "Hide",
            Self::Show(_) => "Show",
            Self::Add(_) => "Add",
        }
    }
}

impl fmt::Debug for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Render => write!(f, "Render"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Detach { tab, component } => f
                .debug_struct("Detach")
                .field("tab", tab)
                .field("component", component)
                .finish(),
            Self::Hide(id) => f.debug_tuple("Hide").field(id).finish(),
            Self::Show(id) => f.debug_tuple("Show").field(id).finish(),
            Self::Add(c) => write!(f, "Add({:?})", c.bounds()),
        }
    }
}

/// The part of a component the focus cycle needs.
pub trait Focusable {
    fn is_interactable(&self) -> bool;

    /// Gain or lose focus. Implementations update their highlight to match.
    fn set_active(&mut self, active: bool);
}

impl<T: Focusable + ?Sized> Focusable for Box<T> {
    fn is_interactable(&self) -> bool {
        (**self).is_interactable()
    }

    fn set_active(&mut self, active: bool) {
        (**self).set_active(active);
    }
}

/// A drawable, possibly focusable, unit of the UI.
///
/// Only `bounds`, `z_index`, and `draw` are required; the rest default to
/// an inert, always-visible widget.
pub trait Component: Focusable + Send {
    /// Footprint on screen. Used to clear the area when the component goes away.
    fn bounds(&self) -> Rect;

    /// Layer this component draws into.
    fn z_index(&self) -> i32;

    fn draw(&self, screen: &mut ScreenBuffer);

    fn capabilities(&self) -> Capabilities {
        if self.is_interactable() {
            Capabilities::INTERACTABLE
        } else {
            Capabilities::empty()
        }
    }

    fn is_active(&self) -> bool {
        false
    }

    fn highlight(&mut self) {}

    fn reset_highlight(&mut self) {}

    /// ENTER, ENTER_ALT, or SPACE on the focused component.
    fn perform_action(&mut self) -> WidgetResult<Cmd> {
        Ok(Cmd::None)
    }

    fn window_resized(&mut self, _width: u16, _height: u16) {}

    fn show(&mut self) {}

    fn hide(&mut self) {}

    fn is_visible(&self) -> bool {
        true
    }

    /// A literal key or DELETE. Returns whether the component changed.
    fn handle_char(&mut self, _event: &KeyEvent) -> bool {
        false
    }

    /// Any key, for components with [`Capabilities::KEY_CAPTURE`].
    fn handle_key(&mut self, _event: &KeyEvent) -> WidgetResult<Cmd> {
        Ok(Cmd::None)
    }

    /// Called when a tab adopts the component.
    fn on_attach(&mut self, _tab: TabId, _id: ComponentId) {}
}

/// Distance between two positions, saturating into `u16`.
pub(crate) fn span(len: usize) -> u16 {
    u16::try_from(len).unwrap_or(u16::MAX)
}
