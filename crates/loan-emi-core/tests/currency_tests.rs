use loan_emi_core::amortization::build_schedule;
use loan_emi_core::currency::{convert, parse_rate_response, RateFeed, RateMap, StaticRateSource};
use loan_emi_core::display::DisplayContext;
use loan_emi_core::page::paginate;
use loan_emi_core::{calculate_emi, LoanEmiError};
use pretty_assertions::assert_eq;
use serde_json::json;

fn provider_payload() -> serde_json::Value {
    json!({
        "result": "success",
        "base_code": "USD",
        "time_last_update_unix": 1_735_689_601,
        "conversion_rates": {
            "USD": 1,
            "EUR": 0.92,
            "GBP": 0.79,
            "INR": 83.12,
            "JPY": 151.2
        }
    })
}

#[test]
fn test_convert_reference_scenarios() {
    let rates = RateMap::new("USD", [("EUR", 0.92)]);
    let eur = convert(8560.75, Some(&rates), "EUR").unwrap();
    assert!((eur - 7875.89).abs() < 0.01);
    assert_eq!(convert(8560.75, Some(&rates), "JPY"), None);
}

#[test]
fn test_convert_is_unrounded_multiplication() {
    let rates = parse_rate_response("USD", &provider_payload()).unwrap();
    for (code, rate) in rates.iter() {
        assert_eq!(convert(1234.5678, Some(&rates), code), Some(1234.5678 * rate));
    }
}

#[test]
fn test_inverse_rate_round_trip_is_not_exact() {
    // Provider quotes are not reciprocal; a round trip through a separate EUR snapshot
    // lands near, not on, the original amount.
    let usd = RateMap::new("USD", [("EUR", 0.92)]);
    let eur = RateMap::new("EUR", [("USD", 1.09)]);
    let there = convert(1_000.0, Some(&usd), "EUR").unwrap();
    let back = convert(there, Some(&eur), "USD").unwrap();
    assert!((back - 1_000.0).abs() > 1e-6);
    assert!((back - 1_000.0).abs() < 10.0);
}

#[test]
fn test_schedule_conversion_distributes() {
    let rates = parse_rate_response("USD", &provider_payload()).unwrap();
    let emi = calculate_emi(100_000.0, 5.0, 12);
    let schedule = build_schedule(100_000.0, 5.0, 12, emi);

    let converted_total: f64 = schedule
        .iter()
        .map(|row| convert(row.interest_component, Some(&rates), "INR").unwrap())
        .sum();
    let total_converted = convert(schedule.total_interest(), Some(&rates), "INR").unwrap();
    assert!((converted_total - total_converted).abs() < 1e-6);
}

#[test]
fn test_feed_failure_and_missing_rates_are_identical_to_conversion() {
    let mut feed = RateFeed::new();
    let source = StaticRateSource::new();
    feed.refresh(&source, "USD");
    assert!(feed.error().is_some());

    let empty = RateMap::new("USD", Vec::<(&str, f64)>::new());
    assert_eq!(convert(50.0, feed.rates(), "EUR"), convert(50.0, Some(&empty), "EUR"));
}

#[test]
fn test_provider_error_payload() {
    let err = parse_rate_response("USD", &json!({"result": "error", "error-type": "quota-reached"}))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Exchange rate fetch failed for base USD: quota-reached"
    );
    assert!(matches!(err, LoanEmiError::RateFetch { .. }));
}

#[test]
fn test_rate_listing_search_and_pages() {
    let rates = parse_rate_response("USD", &provider_payload()).unwrap();
    let listing = rates.search("");
    let codes: Vec<&str> = listing.iter().map(|e| e.currency.as_str()).collect();
    assert_eq!(codes, vec!["EUR", "GBP", "INR", "JPY", "USD"]);

    let page: Vec<&str> = paginate(&listing, 1, 2)
        .iter()
        .map(|e| e.currency.as_str())
        .collect();
    assert_eq!(page, vec!["INR", "JPY"]);

    let hits = rates.search("p");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].currency, "GBP");
    assert_eq!(hits[1].currency, "JPY");
}

#[test]
fn test_display_context_over_summary_values() {
    let rates = parse_rate_response("USD", &provider_payload()).unwrap();
    let ctx = DisplayContext::new("USD").with_selected("GBP");
    let emi = calculate_emi(100_000.0, 5.0, 12);

    let shown = ctx.resolve(emi, Some(&rates));
    assert!(shown.converted);
    assert_eq!(shown.formatted(), "£6,762.99");
}
