use clap::Args;
use serde_json::{json, Value};
use tracing::info;

use loan_emi_core::currency::convert;
use loan_emi_core::display::format_currency;
use loan_emi_core::page::{paginate, total_pages};

use super::{invalid, NO_RATES_FILE};
use crate::config::Settings;

/// Arguments for a single conversion
#[derive(Args)]
pub struct ConvertArgs {
    /// Amount in the base currency
    #[arg(long, allow_hyphen_values = true)]
    pub amount: f64,

    /// Target currency code (defaults to --currency / EMI_CURRENCY)
    #[arg(long)]
    pub to: Option<String>,
}

/// Arguments for the rate listing
#[derive(Args)]
pub struct RatesArgs {
    /// Filter by currency code substring, case-insensitive
    #[arg(long, default_value = "")]
    pub search: String,

    /// Page to show, starting at 1
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rates per page
    #[arg(long, default_value = "10")]
    pub per_page: usize,
}

pub fn run_convert(
    args: ConvertArgs,
    settings: &Settings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let target = args
        .to
        .or_else(|| settings.currency.clone())
        .ok_or("--to is required (or set --currency / EMI_CURRENCY)")?
        .to_uppercase();
    info!(amount = args.amount, to = %target, "converting amount");

    let feed = settings.load_rates();
    let rates = feed.rates();
    let converted = convert(args.amount, rates, &target);

    let mut result = json!({
        "amount": args.amount,
        "from": settings.base_currency.to_uppercase(),
        "to": target,
        "rate": rates.and_then(|r| r.get(&target)),
        "converted_amount": converted,
        "display": converted.map(|v| format_currency(v, &target)),
    });
    if converted.is_none() {
        result["note"] = json!(match (feed.error(), feed.rates()) {
            (Some(reason), _) => format!("Could not convert: {reason}"),
            (None, None) => format!("Could not convert: {NO_RATES_FILE}"),
            (None, Some(_)) => format!("Rate for {target} unavailable."),
        });
    }

    Ok(json!({ "result": result }))
}

pub fn run_rates(args: RatesArgs, settings: &Settings) -> Result<Value, Box<dyn std::error::Error>> {
    if args.page == 0 {
        return Err(invalid("page", "pages are numbered from 1"));
    }
    if args.per_page == 0 {
        return Err(invalid("per_page", "must be at least 1"));
    }

    let feed = settings.load_rates();
    if let Some(reason) = feed.error() {
        return Err(format!("Error loading exchange rates: {reason}").into());
    }
    let rates = feed
        .rates()
        .ok_or_else(|| format!("Error loading exchange rates: {NO_RATES_FILE}"))?;

    let listing = rates.search(&args.search);
    info!(base = %rates.base, matched = listing.len(), "listing exchange rates");

    let rows: Vec<Value> = paginate(&listing, args.page - 1, args.per_page)
        .iter()
        .map(|entry| json!({ "currency": entry.currency, "rate": entry.rate }))
        .collect();

    Ok(json!({
        "result": {
            "base": rates.base,
            "as_of": rates.as_of.map(|t| t.to_rfc3339()),
            "matched": listing.len(),
            "page": args.page,
            "total_pages": total_pages(listing.len(), args.per_page),
            "rows": rows,
        }
    }))
}
