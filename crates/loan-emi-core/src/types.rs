use serde::{Deserialize, Serialize};

/// Monetary amounts in the core math. Plain f64; rounding happens only at display time.
pub type Money = f64;

/// Rates as fractions (0.05 = 5%) unless the name says `_percent`.
pub type Rate = f64;

/// ISO-4217 style currency code, e.g. "EUR"
pub type CurrencyCode = String;

/// Loan inputs shared by the EMI calculator and the amortization scheduler.
///
/// Values are taken as already-coerced numbers. Zero or negative values are tolerated
/// and degrade to a zero EMI / empty schedule downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed, in base currency.
    #[serde(alias = "loan_amount")]
    pub principal: Money,
    /// Nominal annual interest rate in percent (5 = 5% p.a.).
    #[serde(alias = "interest_rate")]
    pub annual_rate_percent: Rate,
    /// Loan term in months.
    #[serde(alias = "loan_term")]
    pub term_months: i64,
}

impl LoanParameters {
    pub fn new(principal: Money, annual_rate_percent: Rate, term_months: i64) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_months,
        }
    }

    /// Monthly fractional rate: annual percent / 12 / 100
    pub fn monthly_rate(&self) -> Rate {
        crate::emi::monthly_rate(self.annual_rate_percent)
    }

    /// Fixed monthly installment for these parameters
    pub fn emi(&self) -> Money {
        crate::emi::calculate_emi(self.principal, self.annual_rate_percent, self.term_months)
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "f64_display_rounded_2dp".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_parameters_accept_form_field_names() {
        let json = r#"{"loan_amount": 100000, "interest_rate": 5, "loan_term": 12}"#;
        let params: LoanParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params, LoanParameters::new(100_000.0, 5.0, 12));
    }

    #[test]
    fn test_loan_parameters_flatten_into_wider_payloads() {
        #[derive(Deserialize)]
        struct WithOverride {
            #[serde(flatten)]
            loan: LoanParameters,
            emi: Option<f64>,
        }

        let json = r#"{"loan_amount": 100000, "interest_rate": 5, "loan_term": 12, "emi": 8600}"#;
        let parsed: WithOverride = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.loan, LoanParameters::new(100_000.0, 5.0, 12));
        assert_eq!(parsed.emi, Some(8600.0));
    }

    #[test]
    fn test_with_metadata_populates_version() {
        let out = with_metadata("test", &serde_json::json!({"a": 1}), vec![], 7, 1.5_f64);
        assert_eq!(out.metadata.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(out.metadata.computation_time_us, 7);
        assert_eq!(out.assumptions["a"], 1);
    }
}
