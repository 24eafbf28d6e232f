use serde::{Deserialize, Serialize};

use crate::emi::monthly_rate;
use crate::page::{paginate, total_pages};
use crate::types::Money;

/// Relative slack when checking that an installment covers the first period's interest.
const INTEREST_COVER_TOLERANCE: f64 = 1e-12;

/// One period of an amortization schedule.
///
/// `principal_component + interest_component == installment` on every row except the
/// last, where the principal is clamped to whatever balance remained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based period number.
    pub period: u32,
    /// Scheduled installment (the EMI) for the period.
    pub installment: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    /// Balance after this period's payment, floored at zero.
    pub remaining_balance: Money,
}

impl AmortizationRow {
    /// Amount actually paid in the period. Below `installment` only on a clamped final row.
    pub fn amount_paid(&self) -> Money {
        self.principal_component + self.interest_component
    }
}

/// Fully materialised schedule, periods 1..=N with N <= term.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    rows: Vec<AmortizationRow>,
}

impl AmortizationSchedule {
    pub fn rows(&self) -> &[AmortizationRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&AmortizationRow> {
        self.rows.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AmortizationRow> {
        self.rows.iter()
    }

    /// Rows on a 0-based page; empty slice past the end.
    pub fn page(&self, page: usize, per_page: usize) -> &[AmortizationRow] {
        paginate(&self.rows, page, per_page)
    }

    /// Number of pages needed at `per_page` rows each.
    pub fn total_pages(&self, per_page: usize) -> usize {
        total_pages(self.rows.len(), per_page)
    }

    pub fn total_interest(&self) -> Money {
        self.rows.iter().map(|r| r.interest_component).sum()
    }

    pub fn total_principal(&self) -> Money {
        self.rows.iter().map(|r| r.principal_component).sum()
    }

    pub fn total_paid(&self) -> Money {
        self.rows.iter().map(AmortizationRow::amount_paid).sum()
    }

    pub fn into_rows(self) -> Vec<AmortizationRow> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a AmortizationSchedule {
    type Item = &'a AmortizationRow;
    type IntoIter = std::slice::Iter<'a, AmortizationRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Build the period-by-period schedule for a fixed-installment loan.
///
/// Returns an empty schedule when any input is zero, negative or non-finite, or when
/// `emi` falls short of the first period's interest by more than rounding error.
///
/// At high rates over long terms the exact EMI is indistinguishable from the interest-only
/// payment in `f64`; such schedules keep every row with a principal component floored at
/// zero, so the balance never rises.
///
/// The running balance is carried at full precision; rounding is a display concern.
/// Stops at the first period whose payment clears the balance; that row's principal is
/// clamped to the outstanding balance and its remaining balance is exactly zero.
pub fn build_schedule(
    principal: Money,
    annual_rate_percent: f64,
    term_months: i64,
    emi: Money,
) -> AmortizationSchedule {
    let r = monthly_rate(annual_rate_percent);

    let finite = principal.is_finite() && r.is_finite() && emi.is_finite();
    if !finite || principal <= 0.0 || r <= 0.0 || term_months <= 0 || emi <= 0.0 {
        return AmortizationSchedule::default();
    }
    if emi < principal * r * (1.0 - INTEREST_COVER_TOLERANCE) {
        return AmortizationSchedule::default();
    }

    let periods = u32::try_from(term_months).unwrap_or(u32::MAX);
    let mut rows = Vec::with_capacity(periods.min(1_200) as usize);
    let mut balance = principal;

    for period in 1..=periods {
        let interest = balance * r;
        let scheduled_principal = (emi - interest).max(0.0);

        if scheduled_principal >= balance {
            rows.push(AmortizationRow {
                period,
                installment: emi,
                principal_component: balance,
                interest_component: interest,
                remaining_balance: 0.0,
            });
            break;
        }

        balance -= scheduled_principal;
        rows.push(AmortizationRow {
            period,
            installment: emi,
            principal_component: scheduled_principal,
            interest_component: interest.min(emi),
            remaining_balance: balance.max(0.0),
        });
    }

    AmortizationSchedule { rows }
}
