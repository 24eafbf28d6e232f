use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::amortization::{build_schedule, AmortizationSchedule};
use crate::emi::calculate_emi;
use crate::types::{with_metadata, ComputationOutput, LoanParameters, Money};

/// Headline figures for a loan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub principal: Money,
    pub annual_rate_percent: f64,
    pub term_months: i64,
    pub term_years: f64,
    pub emi: Money,
    /// EMI x term.
    pub total_payment: Money,
    /// Total payment less principal.
    pub total_interest: Money,
}

/// Summary plus the full schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanAnalysis {
    pub summary: LoanSummary,
    pub schedule: AmortizationSchedule,
}

/// Headline totals derived from the EMI.
///
/// With a zero EMI (invalid inputs or zero rate) the total payment is zero and the
/// total interest is `-principal`, exactly as the formula gives; callers that surface
/// this should flag it.
pub fn summarize_loan(params: &LoanParameters) -> LoanSummary {
    let emi = calculate_emi(params.principal, params.annual_rate_percent, params.term_months);
    let total_payment = emi * params.term_months as f64;

    LoanSummary {
        principal: params.principal,
        annual_rate_percent: params.annual_rate_percent,
        term_months: params.term_months,
        term_years: params.term_months as f64 / 12.0,
        emi,
        total_payment,
        total_interest: total_payment - params.principal,
    }
}

/// Compute the EMI, totals and amortization schedule in one pass.
///
/// Never fails. Inputs that fall on the degrade-to-zero path produce a zero EMI and an
/// empty schedule, and each such case is listed in `warnings`.
pub fn analyze_loan(params: &LoanParameters) -> ComputationOutput<LoanAnalysis> {
    let start = Instant::now();
    let warnings = degrade_warnings(params);

    let summary = summarize_loan(params);
    let schedule = build_schedule(
        params.principal,
        params.annual_rate_percent,
        params.term_months,
        summary.emi,
    );

    if !warnings.is_empty() {
        debug!(?params, count = warnings.len(), "loan inputs on zero-EMI path");
    }

    let assumptions = serde_json::json!({
        "principal": params.principal,
        "annual_rate_percent": params.annual_rate_percent,
        "term_months": params.term_months,
        "compounding": "monthly",
        "monthly_rate": params.monthly_rate(),
        "final_period": "principal clamped to outstanding balance",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Fixed-installment amortization: EMI = P*r*(1+r)^n / ((1+r)^n - 1)",
        &assumptions,
        warnings,
        elapsed,
        LoanAnalysis { summary, schedule },
    )
}

fn degrade_warnings(params: &LoanParameters) -> Vec<String> {
    let mut warnings = Vec::new();

    if !(params.principal.is_finite() && params.principal > 0.0) {
        warnings.push(format!(
            "Principal {} is not positive; EMI reported as 0",
            params.principal
        ));
    }
    if !params.annual_rate_percent.is_finite() || params.annual_rate_percent < 0.0 {
        warnings.push(format!(
            "Annual rate {}% is not a valid rate; EMI reported as 0",
            params.annual_rate_percent
        ));
    } else if params.annual_rate_percent == 0.0 {
        warnings.push(
            "Zero interest rate: EMI reported as 0 (no-payment sentinel), not principal / term"
                .to_string(),
        );
    }
    if params.term_months <= 0 {
        warnings.push(format!(
            "Term of {} months is not positive; EMI reported as 0",
            params.term_months
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_totals() {
        let summary = summarize_loan(&LoanParameters::new(100_000.0, 5.0, 12));
        assert!((summary.emi - 8560.748).abs() < 1e-3);
        assert!((summary.total_payment - summary.emi * 12.0).abs() < 1e-9);
        assert!((summary.total_interest - 2728.98).abs() < 0.01);
        assert_eq!(summary.term_years, 1.0);
    }

    #[test]
    fn test_analysis_has_no_warnings_for_valid_loan() {
        let out = analyze_loan(&LoanParameters::new(250_000.0, 6.5, 240));
        assert!(out.warnings.is_empty());
        assert_eq!(out.result.schedule.len(), 240);
        assert_eq!(out.assumptions["term_months"], 240);
    }

    #[test]
    fn test_analysis_flags_zero_rate() {
        let out = analyze_loan(&LoanParameters::new(100_000.0, 0.0, 12));
        assert_eq!(out.result.summary.emi, 0.0);
        assert!(out.result.schedule.is_empty());
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("Zero interest rate"));
    }

    #[test]
    fn test_analysis_flags_every_bad_field() {
        let out = analyze_loan(&LoanParameters::new(-1.0, -2.0, 0));
        assert_eq!(out.warnings.len(), 3);
        assert_eq!(out.result.summary.total_payment, 0.0);
    }
}
