pub mod currency;
pub mod loan;

use serde_json::{json, Value};

use loan_emi_core::currency::{RateFeed, RateState};
use loan_emi_core::display::{round_money_f64, DisplayContext};
use loan_emi_core::LoanEmiError;

use crate::config::Settings;

pub(crate) const NO_RATES_FILE: &str = "no rates file configured (--rates-file or EMI_RATES_FILE)";

pub(crate) fn invalid(field: &str, reason: &str) -> Box<dyn std::error::Error> {
    Box::new(LoanEmiError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    })
}

/// Amount rounded to cents as a JSON number.
pub(crate) fn money(amount: f64) -> Value {
    json!(round_money_f64(amount))
}

/// Rates for display conversion; only read when the selected currency differs from base.
pub(crate) fn display_rates(ctx: &DisplayContext, settings: &Settings) -> RateFeed {
    if ctx.wants_conversion() {
        settings.load_rates()
    } else {
        RateFeed::new()
    }
}

/// Why a requested conversion fell back to the base currency, if it did.
pub(crate) fn conversion_note(ctx: &DisplayContext, feed: &RateFeed) -> Option<String> {
    if !ctx.wants_conversion() {
        return None;
    }
    if let Some(reason) = feed.error() {
        return Some(format!("Could not convert: {reason}"));
    }
    if feed.state() == &RateState::Idle {
        return Some(format!("Could not convert: {NO_RATES_FILE}"));
    }
    match feed.rates() {
        Some(rates) if rates.contains(&ctx.selected_currency) => None,
        _ => Some(format!("Rate for {} unavailable.", ctx.selected_currency)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_emi_core::currency::RateMap;

    fn ready_feed() -> RateFeed {
        let mut feed = RateFeed::new();
        let ticket = feed.begin_fetch("USD");
        feed.complete(ticket, Ok(RateMap::new("USD", [("EUR", 0.92)])));
        feed
    }

    #[test]
    fn test_money_rounds_to_cents() {
        assert_eq!(money(8560.748178846712), json!(8560.75));
        assert_eq!(money(f64::NAN), json!(0.0));
        assert_eq!(money(1e29), json!(1e29));
    }

    #[test]
    fn test_no_note_without_conversion() {
        let ctx = DisplayContext::new("USD");
        assert_eq!(conversion_note(&ctx, &RateFeed::new()), None);
    }

    #[test]
    fn test_note_for_missing_rate() {
        let ctx = DisplayContext::new("USD").with_selected("JPY");
        assert_eq!(
            conversion_note(&ctx, &ready_feed()).as_deref(),
            Some("Rate for JPY unavailable.")
        );
        let ctx = DisplayContext::new("USD").with_selected("EUR");
        assert_eq!(conversion_note(&ctx, &ready_feed()), None);
    }

    #[test]
    fn test_note_without_rates_file() {
        let ctx = DisplayContext::new("USD").with_selected("EUR");
        let note = conversion_note(&ctx, &RateFeed::new()).unwrap();
        assert!(note.ends_with(NO_RATES_FILE));
    }

    #[test]
    fn test_note_for_failed_fetch() {
        let mut feed = RateFeed::new();
        let ticket = feed.begin_fetch("USD");
        feed.complete(
            ticket,
            Err(LoanEmiError::RateFetch {
                base: "USD".into(),
                reason: "invalid-key".into(),
            }),
        );
        let ctx = DisplayContext::new("USD").with_selected("EUR");
        assert_eq!(
            conversion_note(&ctx, &feed).as_deref(),
            Some("Could not convert: invalid-key")
        );
    }
}
