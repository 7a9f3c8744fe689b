#![forbid(unsafe_code)]

//! Calculators behind the demo's forms.
//!
//! Rates are entered as percentages (`5` means 5%). Degenerate inputs
//! (zero periods, zero rates) produce finite results instead of NaN so a
//! half-filled form still shows a number.

/// Reference mid rates in PLN per unit. Fixed so the demo works offline.
pub const PLN_RATES: [(&str, f64); 4] = [("eur", 4.30), ("usd", 4.02), ("gbp", 5.08), ("pln", 1.0)];

/// Years of retirement the pension estimate spreads savings over.
pub const YEARS_IN_RETIREMENT: f64 = 20.0;

/// Longest investment schedule shown.
pub const MAX_SCHEDULE_YEARS: u32 = 50;

/// Annuity installment for a loan.
pub fn monthly_payment(amount: f64, annual_rate: f64, years: f64) -> f64 {
    let months = years * 12.0;
    if months <= 0.0 {
        return 0.0;
    }
    let r = annual_rate / 12.0 / 100.0;
    if r == 0.0 {
        return amount / months;
    }
    amount * r / (1.0 - (1.0 + r).powf(-months))
}

/// Future value of equal monthly deposits.
pub fn savings_future_value(monthly: f64, annual_rate: f64, years: f64) -> f64 {
    let months = (years * 12.0).max(0.0);
    let r = annual_rate / 12.0 / 100.0;
    if r == 0.0 {
        return monthly * months;
    }
    monthly * (((1.0 + r).powf(months) - 1.0) / r)
}

/// Capital at the end of each whole year, compounding annually.
pub fn investment_schedule(capital: f64, years: f64, annual_rate: f64) -> Vec<(u32, f64)> {
    let whole_years = if years.is_finite() && years > 0.0 {
        (years as u32).min(MAX_SCHEDULE_YEARS)
    } else {
        0
    };
    let growth = 1.0 + annual_rate / 100.0;
    (1..=whole_years)
        .scan(capital, |value, year| {
            *value *= growth;
            Some((year, *value))
        })
        .collect()
}

/// Mid rate of `code` in PLN, if known.
pub fn pln_rate(code: &str) -> Option<f64> {
    PLN_RATES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|&(_, rate)| rate)
}

/// Convert through PLN. `None` for an unknown currency.
pub fn convert(amount: f64, from: &str, to: &str) -> Option<f64> {
    if from.eq_ignore_ascii_case(to) {
        return Some(amount);
    }
    Some(amount * pln_rate(from)? / pln_rate(to)?)
}

pub fn income_tax(income: f64, rate: f64) -> f64 {
    income * rate / 100.0
}

/// Annual pension: yearly savings spread over [`YEARS_IN_RETIREMENT`],
/// times the years left to save. Zero once retirement age has passed.
pub fn pension(current_age: f64, annual_savings: f64, retirement_age: f64) -> f64 {
    let years_saving = (retirement_age.trunc() - current_age.trunc()).max(0.0);
    annual_savings / YEARS_IN_RETIREMENT * years_saving
}

/// Share of working life already behind, for the pension progress bar.
pub fn career_progress(current_age: f64, retirement_age: f64) -> f64 {
    if retirement_age <= 0.0 {
        return 0.0;
    }
    (current_age / retirement_age).clamp(0.0, 1.0)
}
