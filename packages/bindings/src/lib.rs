use napi::Result as NapiResult;
use napi_derive::napi;

use loan_emi_core::currency::{self, parse_rate_response, RateMap};
use loan_emi_core::LoanParameters;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loan math
// ---------------------------------------------------------------------------

/// Monthly installment; 0 when any input is zero, negative or not a number.
#[napi]
pub fn calculate_emi(principal: f64, annual_rate_percent: f64, term_months: i64) -> f64 {
    loan_emi_core::calculate_emi(principal, annual_rate_percent, term_months)
}

#[napi]
pub fn build_schedule(
    principal: f64,
    annual_rate_percent: f64,
    term_months: i64,
    emi: f64,
) -> NapiResult<String> {
    let schedule = loan_emi_core::amortization::build_schedule(
        principal,
        annual_rate_percent,
        term_months,
        emi,
    );
    serde_json::to_string(schedule.rows()).map_err(to_napi_error)
}

#[derive(serde::Deserialize)]
struct ScheduleBindingInput {
    #[serde(flatten)]
    loan: LoanParameters,
    /// Installment override; the computed EMI when absent.
    #[serde(default)]
    emi: Option<f64>,
}

/// Schedule for a `{principal, annual_rate_percent, term_months, emi?}` payload.
#[napi]
pub fn build_schedule_from_json(input_json: String) -> NapiResult<String> {
    let input: ScheduleBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let emi = input.emi.unwrap_or_else(|| input.loan.emi());
    let schedule = loan_emi_core::amortization::build_schedule(
        input.loan.principal,
        input.loan.annual_rate_percent,
        input.loan.term_months,
        emi,
    );
    serde_json::to_string(&schedule).map_err(to_napi_error)
}

#[napi]
pub fn analyze_loan(input_json: String) -> NapiResult<String> {
    let input: LoanParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_emi_core::analysis::analyze_loan(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

/// Parse a provider payload or bare `{code: rate}` map into a normalised snapshot.
#[napi]
pub fn parse_rates(base: String, payload_json: String) -> NapiResult<String> {
    let payload: serde_json::Value =
        serde_json::from_str(&payload_json).map_err(to_napi_error)?;
    let rates = parse_rate_response(&base, &payload).map_err(to_napi_error)?;
    serde_json::to_string(&rates).map_err(to_napi_error)
}

/// `null` when the snapshot is missing or has no usable rate for `target`.
#[napi]
pub fn convert_amount(
    amount: f64,
    rates_json: Option<String>,
    target: String,
) -> NapiResult<Option<f64>> {
    let rates: Option<RateMap> = rates_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(to_napi_error)?;
    Ok(currency::convert(amount, rates.as_ref(), &target))
}

#[napi]
pub fn format_currency(amount: f64, currency_code: String) -> String {
    loan_emi_core::display::format_currency(amount, &currency_code)
}
