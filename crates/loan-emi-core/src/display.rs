use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::currency::rates::normalize_code;
use crate::currency::{convert, RateMap};
use crate::types::{CurrencyCode, Money};

const FALLBACK_CURRENCY: &str = "USD";

/// Currency preference handed to presentation code.
///
/// Core math never reads this; it only ever sees plain numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayContext {
    pub base_currency: CurrencyCode,
    pub selected_currency: CurrencyCode,
}

impl Default for DisplayContext {
    fn default() -> Self {
        Self::new(FALLBACK_CURRENCY)
    }
}

/// A monetary value ready for display, with the currency it is expressed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayAmount {
    pub amount: Money,
    pub currency: CurrencyCode,
    /// False when the base amount is shown, either by choice or because no rate was available.
    pub converted: bool,
}

impl DisplayAmount {
    pub fn formatted(&self) -> String {
        format_currency(self.amount, &self.currency)
    }
}

impl DisplayContext {
    /// Context showing amounts in their base currency.
    pub fn new(base_currency: &str) -> Self {
        let base = normalize_code(base_currency);
        Self {
            selected_currency: base.clone(),
            base_currency: base,
        }
    }

    pub fn with_selected(mut self, currency: &str) -> Self {
        self.select(currency);
        self
    }

    /// Explicit user action changing the display currency.
    pub fn select(&mut self, currency: &str) {
        self.selected_currency = normalize_code(currency);
    }

    pub fn wants_conversion(&self) -> bool {
        self.selected_currency != self.base_currency
    }

    /// Express `amount` in the selected currency, or fall back to the base amount when
    /// the selection is the base or no rate is available.
    pub fn resolve(&self, amount: Money, rates: Option<&RateMap>) -> DisplayAmount {
        if self.wants_conversion() {
            if let Some(converted) = convert(amount, rates, &self.selected_currency) {
                return DisplayAmount {
                    amount: converted,
                    currency: self.selected_currency.clone(),
                    converted: true,
                };
            }
        }
        DisplayAmount {
            amount,
            currency: self.base_currency.clone(),
            converted: false,
        }
    }
}

/// Round to 2 decimal places, midpoint away from zero.
///
/// Non-finite input rounds to zero, as do finite magnitudes beyond `Decimal`'s range
/// (about 7.9e28); use [`round_money_f64`] when those must survive.
pub fn round_money(amount: Money) -> Decimal {
    round_cents(amount).unwrap_or(Decimal::ZERO)
}

/// [`round_money`] as a plain number. Amounts too large for `Decimal` are returned
/// unchanged: at that magnitude an `f64` carries no cents to round.
pub fn round_money_f64(amount: Money) -> Money {
    if !amount.is_finite() {
        return 0.0;
    }
    round_cents(amount)
        .and_then(|rounded| rounded.to_f64())
        .unwrap_or(amount)
}

fn round_cents(amount: Money) -> Option<Decimal> {
    Decimal::from_f64(amount)
        .map(|value| value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Render an amount like `$1,234.56` or `CHF 1,234.56`.
///
/// An invalid currency code falls back to USD; a non-finite amount renders as zero USD.
pub fn format_currency(amount: Money, currency: &str) -> String {
    if !amount.is_finite() {
        return format_currency(0.0, FALLBACK_CURRENCY);
    }

    let code = normalize_code(currency);
    let code = if is_valid_code(&code) {
        code
    } else {
        FALLBACK_CURRENCY.to_string()
    };

    let (negative, fixed) = match round_cents(amount) {
        Some(rounded) => (
            rounded.is_sign_negative() && !rounded.is_zero(),
            format!("{:.2}", rounded.abs()),
        ),
        None => (amount < 0.0, format!("{:.2}", amount.abs())),
    };
    let sign = if negative { "-" } else { "" };
    let digits = group_thousands(&fixed);

    match currency_symbol(&code) {
        Some(symbol) => format!("{sign}{symbol}{digits}"),
        None => format!("{sign}{code} {digits}"),
    }
}

fn is_valid_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        _ => None,
    }
}

fn group_thousands(fixed: &str) -> String {
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed, "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped}.{frac_part}")
}
