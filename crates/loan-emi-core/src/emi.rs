use crate::types::{Money, Rate};

/// Monthly fractional rate from an annual percentage: `annual / 12 / 100`.
pub fn monthly_rate(annual_rate_percent: Rate) -> Rate {
    annual_rate_percent / 12.0 / 100.0
}

/// Equated Monthly Installment.
///
/// EMI = P * r * (1 + r)^n / ((1 + r)^n - 1), with r the monthly rate.
///
/// Total over all inputs: if any of principal, rate or term is zero, negative or
/// non-finite the result is `0.0` (the "no payment" sentinel), never NaN or infinity.
/// Note a zero rate also yields `0.0` rather than `principal / term`.
pub fn calculate_emi(principal: Money, annual_rate_percent: Rate, term_months: i64) -> Money {
    let r = monthly_rate(annual_rate_percent);

    if !(principal.is_finite() && r.is_finite()) {
        return 0.0;
    }
    if !(principal > 0.0 && r > 0.0 && term_months > 0) {
        return 0.0;
    }

    // (1 + r)^n - 1 via expm1/ln_1p: stays accurate when r is tiny
    let growth_minus_one = (term_months as f64 * r.ln_1p()).exp_m1();

    let emi = if growth_minus_one.is_infinite() {
        // (1 + r)^n / ((1 + r)^n - 1) -> 1 as n grows
        principal * r
    } else {
        principal * r * (growth_minus_one + 1.0) / growth_minus_one
    };

    if emi.is_finite() && emi >= 0.0 {
        emi
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emi_reference_loan() {
        let emi = calculate_emi(100_000.0, 5.0, 12);
        assert!((emi - 8560.75).abs() < 0.01, "got {emi}");
    }

    #[test]
    fn test_emi_zero_rate_is_sentinel() {
        assert_eq!(calculate_emi(100_000.0, 0.0, 12), 0.0);
    }

    #[test]
    fn test_emi_invalid_inputs_return_zero() {
        assert_eq!(calculate_emi(0.0, 5.0, 12), 0.0);
        assert_eq!(calculate_emi(-1_000.0, 5.0, 12), 0.0);
        assert_eq!(calculate_emi(100_000.0, -5.0, 12), 0.0);
        assert_eq!(calculate_emi(100_000.0, 5.0, 0), 0.0);
        assert_eq!(calculate_emi(100_000.0, 5.0, -12), 0.0);
        assert_eq!(calculate_emi(f64::NAN, 5.0, 12), 0.0);
        assert_eq!(calculate_emi(100_000.0, f64::NAN, 12), 0.0);
        assert_eq!(calculate_emi(f64::INFINITY, 5.0, 12), 0.0);
    }

    #[test]
    fn test_emi_single_period_is_principal_plus_interest() {
        // n = 1: EMI = P * (1 + r)
        let emi = calculate_emi(1_200.0, 12.0, 1);
        assert!((emi - 1_212.0).abs() < 1e-9, "got {emi}");
    }

    #[test]
    fn test_emi_decreases_with_longer_term() {
        let mut previous = f64::MAX;
        for term in [1, 6, 12, 60, 120, 360, 600] {
            let emi = calculate_emi(250_000.0, 7.5, term);
            assert!(emi > 0.0 && emi.is_finite());
            assert!(emi < previous, "term {term}: {emi} !< {previous}");
            previous = emi;
        }
    }

    #[test]
    fn test_emi_converges_to_interest_only_for_huge_term() {
        let p = 10_000.0;
        let r = monthly_rate(6.0);
        let emi = calculate_emi(p, 6.0, 1_000_000);
        assert!((emi - p * r).abs() < 1e-9, "got {emi}");

        let emi = calculate_emi(p, 6.0, i64::MAX);
        assert!(emi.is_finite());
        assert!((emi - p * r).abs() < 1e-9);
    }

    #[test]
    fn test_emi_tiny_rate_approaches_straight_line() {
        let emi = calculate_emi(12_000.0, 1e-12, 12);
        assert!((emi - 1_000.0).abs() < 1e-6, "got {emi}");
    }

    #[test]
    fn test_monthly_rate() {
        assert!((monthly_rate(12.0) - 0.01).abs() < 1e-15);
    }
}
