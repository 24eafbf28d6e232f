use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{CurrencyCode, Money, Rate};

/// Snapshot of conversion multipliers: 1 unit of `base` = `rates[code]` units of `code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateMap {
    pub base: CurrencyCode,
    pub rates: BTreeMap<CurrencyCode, Rate>,
    /// When the provider last refreshed the snapshot, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<DateTime<Utc>>,
}

/// A single row of a rate listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub currency: CurrencyCode,
    pub rate: Rate,
}

impl RateMap {
    /// Build a snapshot. Codes are trimmed and upper-cased.
    pub fn new<I, S>(base: &str, rates: I) -> Self
    where
        I: IntoIterator<Item = (S, Rate)>,
        S: AsRef<str>,
    {
        Self {
            base: normalize_code(base),
            rates: rates
                .into_iter()
                .map(|(code, rate)| (normalize_code(code.as_ref()), rate))
                .collect(),
            as_of: None,
        }
    }

    pub fn with_as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }

    /// Usable rate for `code`. Zero, negative and non-finite entries count as missing:
    /// an exchange rate is a positive price, and a negative one would flip the sign of
    /// every converted amount.
    pub fn get(&self, code: &str) -> Option<Rate> {
        self.rates
            .get(&normalize_code(code))
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rate)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    /// Rates whose code contains `term`, case-insensitive, ordered by code.
    /// An empty or blank term lists everything.
    pub fn search(&self, term: &str) -> Vec<RateEntry> {
        let needle = term.trim().to_lowercase();
        self.rates
            .iter()
            .filter(|(code, _)| needle.is_empty() || code.to_lowercase().contains(&needle))
            .map(|(code, rate)| RateEntry {
                currency: code.clone(),
                rate: *rate,
            })
            .collect()
    }
}

/// Convert a base-currency amount into `target`.
///
/// `None` is the "unavailable" result: no snapshot, an empty snapshot, or no usable
/// rate for `target`. A listed rate that is zero, negative or NaN is not usable; a
/// negative rate can only come from a corrupt payload and would turn a loan amount
/// negative, so it is treated like a missing entry. No rounding is applied, so conversion distributes over sums up
/// to floating-point error. Converting back with another snapshot's inverse rate is not
/// expected to reproduce the input; provider rates are not reciprocal.
pub fn convert(amount_in_base: Money, rates: Option<&RateMap>, target: &str) -> Option<Money> {
    let rate = rates?.get(target)?;
    Some(amount_in_base * rate)
}

pub(crate) fn normalize_code(code: &str) -> CurrencyCode {
    code.trim().to_uppercase()
}
