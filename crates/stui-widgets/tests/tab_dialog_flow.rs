#![forbid(unsafe_code)]

//! A tab hosting a form and a dialog, driven by keys the way a session
//! drives it: route a key, apply the returned command, draw.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use stui_core::{Color, KeyEvent, KeyLabel, Rect};
use stui_render::ScreenBuffer;
use stui_widgets::{
    Button, Capabilities, Cmd, Component, ComponentId, Dialog, Focusable, Label, Routed, Tab,
    TabId, TextField, WidgetResult,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn key(label: KeyLabel) -> KeyEvent {
    KeyEvent::functional(label)
}

fn space() -> KeyEvent {
    KeyEvent::literal(" ", KeyLabel::Space)
}

fn digit(d: u8) -> KeyEvent {
    KeyEvent::literal(d.to_string(), KeyLabel::digit(d).unwrap())
}

/// The subset of command handling a manager does for one tab.
fn apply(tab: &mut Tab, screen: &mut ScreenBuffer, cmd: Cmd) -> WidgetResult<()> {
    match cmd {
        Cmd::None | Cmd::Render => {}
        Cmd::Batch(cmds) => {
            for cmd in cmds {
                apply(tab, screen, cmd)?;
            }
        }
        Cmd::Detach { tab: owner, component } => {
            assert_eq!(owner, tab.id());
            if let Some(removed) = tab.remove(component) {
                screen.clear_rect(removed.bounds());
            }
        }
        Cmd::Hide(id) => {
            if let Some(area) = tab.hide_child(id) {
                screen.clear_rect(area);
            }
        }
        Cmd::Show(id) => {
            tab.show_child(id);
        }
        Cmd::Add(component) => {
            let capture = component.capabilities().contains(Capabilities::KEY_CAPTURE);
            let id = tab.add(component);
            if capture {
                tab.focus(id);
            }
        }
    }
    Ok(())
}

fn press(tab: &mut Tab, screen: &mut ScreenBuffer, event: &KeyEvent) -> bool {
    match tab.route_key(event).unwrap() {
        Routed::Handled(cmd) => {
            apply(tab, screen, cmd).unwrap();
            true
        }
        Routed::Unhandled => false,
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Drawing
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn label_in_active_tab_reaches_merged_grid() {
    let mut tab = Tab::new("Main", 0, 0, 40, 12, 0).with(
        Label::new("Hello", 5, 5, 1, Color::BG_BLUE).fg(Color::TEXT_YELLOW),
    );
    tab.set_active(true);
    let mut screen = ScreenBuffer::new(40, 12);
    tab.draw(&mut screen);
    screen.merge();
    let cell = screen.merged_cell(5, 5).unwrap();
    assert_eq!(cell.ch, 'H');
    assert_eq!(cell.fg, Color::TEXT_YELLOW);
    assert_eq!(cell.bg, Color::BG_BLUE);
}

// ═════════════════════════════════════════════════════════════════════════
// Form → dialog → cancel
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn calculate_opens_dialog_and_cancel_closes_it() {
    let mut screen = ScreenBuffer::new(80, 24);
    let mut tab = Tab::new("Credit", 0, 0, 80, 24, 0);
    tab.attach(TabId(1));

    let field = TextField::new(2, 3, 10, 1).numeric(true);
    let amount = field.value();
    tab.add(Box::new(field));

    let calculate = Button::new("Calculate", 2, 5, 12, 1, 1).on_press(move || {
        let score = amount.parsed_number() / 100.0;
        Ok(Cmd::Add(Box::new(
            Dialog::new(20, 4, 40, 10, 5, "Score").score(score),
        )))
    });
    let button = tab.add(Box::new(calculate));
    tab.set_active(true);

    // Focus the field and type 42.
    assert!(press(&mut tab, &mut screen, &key(KeyLabel::ArrowDown)));
    press(&mut tab, &mut screen, &digit(4));
    press(&mut tab, &mut screen, &digit(2));

    // Move to the button and press it.
    press(&mut tab, &mut screen, &key(KeyLabel::ArrowDown));
    assert_eq!(tab.focused(), Some(button));
    press(&mut tab, &mut screen, &key(KeyLabel::Enter));

    assert_eq!(tab.len(), 3);
    let dialog = tab.focused().unwrap();
    assert_ne!(dialog, button);

    // The dialog captures arrows: the tab focus stays put.
    press(&mut tab, &mut screen, &key(KeyLabel::ArrowLeft));
    press(&mut tab, &mut screen, &space());
    assert_eq!(tab.focused(), Some(dialog));

    tab.draw(&mut screen);
    screen.merge();
    let score: String = (0..4)
        .map(|i| screen.merged_cell(38 + i, 8).unwrap().ch)
        .collect();
    assert_eq!(score, "0.42");

    // Select CANCEL and press it.
    press(&mut tab, &mut screen, &key(KeyLabel::ArrowRight));
    press(&mut tab, &mut screen, &space());
    assert_eq!(tab.len(), 2);
    assert_eq!(tab.focused(), None);
    assert!(tab.child(dialog).is_none());
    assert_eq!(screen.layer_cell(20, 4, 5), None);
}

#[test]
fn cancel_hides_the_requesting_component() {
    let mut screen = ScreenBuffer::new(80, 24);
    let mut tab = Tab::new("Main", 0, 0, 80, 24, 0);
    tab.attach(TabId(3));
    let requester = tab.add(Box::new(Label::new("Pending", 1, 2, 1, Color::BG_WHITE)));
    let dialog = tab.add(Box::new(
        Dialog::new(10, 5, 30, 8, 4, "Sure?").on_behalf_of(requester),
    ));
    tab.focus(dialog);
    tab.set_active(true);
    tab.draw(&mut screen);
    assert!(screen.layer_cell(1, 2, 1).is_some());

    press(&mut tab, &mut screen, &key(KeyLabel::ArrowRight));
    press(&mut tab, &mut screen, &space());

    assert!(!tab.child(requester).unwrap().is_visible());
    assert_eq!(screen.layer_cell(1, 2, 1), None);
    assert_eq!(tab.len(), 1);
}

#[test]
fn confirm_callback_can_reveal_a_hidden_component() {
    let mut screen = ScreenBuffer::new(80, 24);
    let mut tab = Tab::new("Main", 0, 0, 80, 24, 0);
    let result = tab.add(Box::new(Label::new("Done", 1, 20, 1, Color::BG_WHITE)));
    tab.hide_child(result);

    let confirms = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&confirms);
    let dialog = tab.add(Box::new(Dialog::new(10, 5, 30, 8, 4, "Go?").on_confirm(
        move || {
            counter.fetch_add(1, Ordering::Relaxed);
            Ok(Cmd::Show(result))
        },
    )));
    tab.focus(dialog);

    press(&mut tab, &mut screen, &key(KeyLabel::ArrowLeft));
    press(&mut tab, &mut screen, &space());
    assert_eq!(confirms.load(Ordering::Relaxed), 1);
    assert!(tab.child(result).unwrap().is_visible());
    assert_eq!(tab.child(dialog).map(|d| d.bounds()), Some(Rect::new(10, 5, 31, 9)));
}

#[test]
fn hide_of_unknown_component_is_ignored() {
    let mut screen = ScreenBuffer::new(10, 10);
    let mut tab = Tab::new("Main", 0, 0, 10, 10, 0);
    apply(&mut tab, &mut screen, Cmd::Hide(ComponentId(99))).unwrap();
    assert!(tab.is_empty());
}
