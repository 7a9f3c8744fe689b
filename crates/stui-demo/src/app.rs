#![forbid(unsafe_code)]

//! The demo UI: a seven-tab financial calculator.
//!
//! Every session gets its own [`Manager`] from [`build`]. Forms hold their
//! inputs in [`TextValue`] handles so the Calculate buttons can read them;
//! results come back as a [`Dialog`] added to the active tab.
//!
//! Tabs that show more than a number (the investment schedule, the pension
//! progress bar) keep a hidden [`Group`] slot for it. The result dialog is
//! opened on behalf of that slot, so cancelling the dialog hides the view
//! again.

use stui_core::Color;
use stui_runtime::Manager;
use stui_widgets::{
    Border, Button, CheckBox, Cmd, Component, ComponentId, Dialog, Group, GroupContent, Label,
    List, ProgressBar, RadioGroup, ScrollBar, Tab, Table, TextField, TextValue, WidgetError,
    WidgetResult,
};

use crate::finance;

const LABEL_BG: Color = Color::BG_BRIGHT_YELLOW;
const FRAME_FG: Color = Color::TEXT_WHITE;
const FRAME_BG: Color = Color::BG_RED;

const Z_FRAME: i32 = 1;
const Z_FORM: i32 = 2;
const Z_DIALOG: i32 = 3;

const LABEL_X: i32 = 4;
const FIELD_X: i32 = 46;
const FIELD_WIDTH: u16 = 12;
const FORM_TOP: i32 = 4;

const CONFIRM: &str = "Are you accepting data?";

/// Dialog placement: x, y, width, height.
type Placement = (i32, i32, u16, u16);
const DIALOG: Placement = (20, 12, 40, 9);

pub const CURRENCIES: [(&str, &str); 4] =
    [("Euro", "eur"), ("Dollar", "usd"), ("Pound", "gbp"), ("Zloty", "pln")];

type Builder = fn(Tab) -> Tab;

/// Tab titles and their builders, in F-key order.
pub const TABS: [(&str, Builder); 7] = [
    ("F1 Main", main_tab),
    ("F2 Loan", loan_tab),
    ("F3 Save", savings_tab),
    ("F4 Invest", investment_tab),
    ("F5 FX", currency_tab),
    ("F6 Tax", tax_tab),
    ("F7 Pension", pension_tab),
];

/// A fresh UI for one session.
pub fn build(width: u16, height: u16) -> Manager {
    let mut manager = Manager::new(width, height);
    let mut title_x = 0;
    for (title, builder) in TABS {
        let tab = builder(Tab::new(title, title_x, 0, width, height, 0));
        title_x += i32::from(tab.title_width());
        manager.add_tab(tab);
    }
    tracing::debug!(width, height, tabs = TABS.len(), "demo UI built");
    manager
}

// ── Shared pieces ───────────────────────────────────────────────────────

fn label(text: &str, x: i32, y: i32) -> Label {
    Label::new(text, x, y, Z_FORM, LABEL_BG)
}

fn frame(x: i32, y: i32, width: u16, height: u16) -> Border {
    Border::new(x, y, width, height, Z_FRAME).colors(FRAME_FG, FRAME_BG)
}

/// One prompt and numeric field per row starting at [`FORM_TOP`].
fn numeric_fields<const N: usize>(tab: &mut Tab, prompts: [&str; N]) -> [TextValue; N] {
    for (y, prompt) in (FORM_TOP..).zip(prompts) {
        tab.add(Box::new(label(prompt, LABEL_X, y)));
    }
    let mut y = FORM_TOP;
    std::array::from_fn(|_| {
        let field = TextField::new(FIELD_X, y, FIELD_WIDTH, Z_FORM).numeric(true);
        let value = field.value();
        tab.add(Box::new(field));
        y += 1;
        value
    })
}

fn calculate_button<F>(action: F) -> Button
where
    F: FnMut() -> WidgetResult<Cmd> + Send + 'static,
{
    Button::new("Calculate", FIELD_X + 2, 9, 14, 3, Z_FORM).on_press(action)
}

fn dialog(at: Placement, title: &str) -> Dialog {
    let (x, y, width, height) = at;
    Dialog::new(x, y, width, height, Z_DIALOG, title).message(CONFIRM)
}

fn result_dialog(at: Placement, title: &str, score: f64) -> Cmd {
    Cmd::Add(Box::new(dialog(at, title).score(score)))
}

/// An empty, hidden slot for a result view. Returns the slot's id and the
/// handle that fills it.
fn result_slot(tab: &mut Tab) -> (ComponentId, GroupContent) {
    let slot = Group::new(Z_FORM).hidden();
    let content = slot.content();
    (tab.add(Box::new(slot)), content)
}

// ── Tabs ────────────────────────────────────────────────────────────────

fn main_tab(tab: Tab) -> Tab {
    const LINES: [&str; 6] = [
        "- Loan: monthly installment from amount, rate and period.",
        "- Savings: future value of regular monthly deposits.",
        "- Investment: year-by-year value of a capital.",
        "- Currency: convert between EUR, USD, GBP and PLN.",
        "- Tax: income tax at a flat rate.",
        "- Pension: annual pension from yearly savings.",
    ];
    let mut tab = tab
        .with(frame(0, 2, 80, 17))
        .with(label("stui financial calculator", 26, 3))
        .with(label("Options:", 2, 5));
    for (y, line) in (7..).step_by(2).zip(LINES) {
        tab.add(Box::new(label(line, 4, y)));
    }
    tab.with(
        Label::new(
            "F1-F7 tabs  UP/DOWN focus  SPACE/ENTER press  CTRL-C quit",
            2,
            20,
            Z_FORM,
            Color::BG_BRIGHT_WHITE,
        )
        .fg(Color::TEXT_BLACK),
    )
}

fn loan_tab(tab: Tab) -> Tab {
    let mut tab = tab.with(frame(2, 2, 76, 9));
    let [amount, rate, years] = numeric_fields(
        &mut tab,
        [
            "Amount of credit:",
            "Loan interest rate (annual %):",
            "Repayment period (years):",
        ],
    );
    tab.with(calculate_button(move || {
        let payment = finance::monthly_payment(
            amount.parsed_number(),
            rate.parsed_number(),
            years.parsed_number(),
        );
        Ok(result_dialog(DIALOG, "Monthly Payment", payment))
    }))
}

fn savings_tab(tab: Tab) -> Tab {
    let mut tab = tab.with(frame(2, 2, 76, 9));
    let [monthly, rate, years] = numeric_fields(
        &mut tab,
        [
            "Regular payments (monthly):",
            "Savings interest rate (annual %):",
            "Saving period (years):",
        ],
    );
    tab.with(calculate_button(move || {
        let value = finance::savings_future_value(
            monthly.parsed_number(),
            rate.parsed_number(),
            years.parsed_number(),
        );
        Ok(result_dialog(DIALOG, "Future Value of Savings", value))
    }))
}

fn investment_tab(tab: Tab) -> Tab {
    const AT: Placement = (44, 12, 34, 9);
    let mut tab = tab.with(frame(2, 2, 76, 10));
    let [capital, years, rate] = numeric_fields(
        &mut tab,
        [
            "Initial capital:",
            "Investment period (years):",
            "Expected return (annual %):",
        ],
    );
    let show_as = RadioGroup::new();
    tab.add(Box::new(label("Show as:", LABEL_X, 9)));
    tab.add(Box::new(CheckBox::new("Table", "table", LABEL_X + 10, 9, 1, Z_FORM, &show_as)));
    tab.add(Box::new(CheckBox::new("List", "list", LABEL_X + 24, 9, 1, Z_FORM, &show_as)));

    let (slot, view) = result_slot(&mut tab);

    tab.with(calculate_button(move || {
        let schedule = finance::investment_schedule(
            capital.parsed_number(),
            years.parsed_number(),
            rate.parsed_number(),
        );
        let as_list = show_as.selected_value().as_deref() == Some("list");
        let mut result = Some(schedule_view(&schedule, as_list));
        let view = view.clone();
        let dialog = dialog(AT, "Investment Return")
            .on_behalf_of(slot)
            .on_confirm(move || {
                if let Some(result) = result.take() {
                    view.replace(result);
                }
                Ok(Cmd::Show(slot))
            });
        // Clear the previous schedule while the slot still holds it.
        Ok(Cmd::batch(vec![Cmd::Hide(slot), Cmd::Add(Box::new(dialog))]))
    }))
}

/// The schedule as a table or a list, placed under the form.
fn schedule_view(schedule: &[(u32, f64)], as_list: bool) -> Vec<Box<dyn Component>> {
    let mut cells = vec!["Year".to_owned(), "Value".to_owned()];
    for (year, value) in schedule {
        cells.push(year.to_string());
        cells.push(format!("{value:.2}"));
    }
    if as_list {
        let items: Vec<String> = cells
            .chunks(2)
            .map(|pair| pair.join("  "))
            .collect();
        let list = List::new(items, LABEL_X, 13, Z_FORM);
        let bar = ScrollBar::beside(list.bounds(), Z_FORM);
        vec![Box::new(list), Box::new(bar)]
    } else {
        vec![Box::new(Table::new(LABEL_X, 13, 2, cells, Z_FORM))]
    }
}

fn currency_tab(tab: Tab) -> Tab {
    const AT: Placement = (36, 12, 40, 9);
    let source = RadioGroup::new();
    let target = RadioGroup::new();
    let mut tab = tab
        .with(frame(2, 2, 76, 19))
        .with(label("Source currency", 4, 3))
        .with(label("Target currency", 24, 3));
    for ((name, code), y) in CURRENCIES.into_iter().zip((5..).step_by(2)) {
        tab.add(Box::new(CheckBox::new(name, code, 5, y, 1, Z_FORM, &source)));
        tab.add(Box::new(CheckBox::new(name, code, 25, y, 1, Z_FORM, &target)));
    }
    tab.add(Box::new(label("Amount:", 44, 5)));
    let amount = TextField::new(54, 5, 10, Z_FORM).numeric(true);
    let value = amount.value();
    tab.add(Box::new(amount));

    tab.with(
        Button::new("Swap", 54, 7, 10, 3, Z_FORM).on_press(move || {
            let from = source.selected_value().unwrap_or_else(|| "eur".to_owned());
            let to = target.selected_value().unwrap_or_else(|| "eur".to_owned());
            let converted = finance::convert(value.parsed_number(), &from, &to)
                .ok_or_else(|| WidgetError::action(format!("no rate for {from}/{to}")))?;
            Ok(result_dialog(AT, "Swap currency", converted))
        }),
    )
}

fn tax_tab(tab: Tab) -> Tab {
    let mut tab = tab.with(frame(2, 2, 76, 9));
    let [income, rate] = numeric_fields(&mut tab, ["Annual income:", "Tax rate (%):"]);
    tab.with(calculate_button(move || {
        let tax = finance::income_tax(income.parsed_number(), rate.parsed_number());
        Ok(result_dialog(DIALOG, "Tax Amount", tax))
    }))
}

fn pension_tab(tab: Tab) -> Tab {
    let mut tab = tab.with(frame(2, 2, 76, 9));
    let [age, savings, retirement] = numeric_fields(
        &mut tab,
        [
            "Current age:",
            "Planned savings (annual):",
            "Expected retirement age:",
        ],
    );
    let (slot, view) = result_slot(&mut tab);
    tab.with(calculate_button(move || {
        let (age, retirement) = (age.parsed_number(), retirement.parsed_number());
        let pension = finance::pension(age, savings.parsed_number(), retirement);
        let progress = ProgressBar::new(LABEL_X + 1, 13, 30, Z_FORM)
            .with_progress(finance::career_progress(age, retirement));
        view.replace(vec![Box::new(progress)]);
        let dialog = dialog(DIALOG, "Future Pension Value")
            .score(pension)
            .on_behalf_of(slot);
        Ok(Cmd::batch(vec![Cmd::Show(slot), Cmd::Add(Box::new(dialog))]))
    }))
}
