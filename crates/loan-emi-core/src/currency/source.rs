use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::rates::{normalize_code, RateMap};
use crate::error::LoanEmiError;
use crate::types::Rate;
use crate::LoanEmiResult;

/// Supplier of rate snapshots for a base currency.
///
/// Implementations own transport, caching and retries. Any `Err` is treated by
/// conversion exactly like a missing rate.
pub trait RateSource {
    fn fetch_rates(&self, base: &str) -> LoanEmiResult<RateMap>;
}

/// In-memory source holding one snapshot per base currency.
#[derive(Debug, Clone, Default)]
pub struct StaticRateSource {
    snapshots: BTreeMap<String, RateMap>,
}

impl StaticRateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, rates: RateMap) -> Self {
        self.insert(rates);
        self
    }

    pub fn insert(&mut self, rates: RateMap) {
        self.snapshots.insert(rates.base.clone(), rates);
    }
}

impl RateSource for StaticRateSource {
    fn fetch_rates(&self, base: &str) -> LoanEmiResult<RateMap> {
        let base = normalize_code(base);
        self.snapshots
            .get(&base)
            .cloned()
            .ok_or_else(|| LoanEmiError::RateFetch {
                base,
                reason: "no snapshot configured for this base currency".into(),
            })
    }
}

/// exchangerate-api v6 `latest` payload.
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    #[serde(default)]
    base_code: Option<String>,
    #[serde(default)]
    conversion_rates: Option<BTreeMap<String, Rate>>,
    #[serde(default, rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    time_last_update_unix: Option<i64>,
}

/// Parse a rate snapshot.
///
/// Accepts either the provider payload
/// (`{"result": "success", "base_code": "USD", "conversion_rates": {...}}`) or a bare
/// `{"EUR": 0.92, ...}` object, which is taken to be quoted against `base`.
/// A provider `"result": "error"` becomes [`LoanEmiError::RateFetch`] carrying the
/// provider's `error-type`.
pub fn parse_rate_response(base: &str, payload: &Value) -> LoanEmiResult<RateMap> {
    let Value::Object(map) = payload else {
        return Err(LoanEmiError::MalformedRates(
            "rate payload must be a JSON object".into(),
        ));
    };

    if !map.contains_key("result") {
        let rates: BTreeMap<String, Rate> = serde_json::from_value(payload.clone())
            .map_err(|e| LoanEmiError::MalformedRates(e.to_string()))?;
        return Ok(RateMap::new(base, rates));
    }

    let response: LatestRatesResponse = serde_json::from_value(payload.clone())
        .map_err(|e| LoanEmiError::MalformedRates(e.to_string()))?;

    if response.result != "success" {
        return Err(LoanEmiError::RateFetch {
            base: normalize_code(response.base_code.as_deref().unwrap_or(base)),
            reason: response
                .error_type
                .unwrap_or_else(|| "Failed to fetch exchange rates from API.".into()),
        });
    }

    let rates = response.conversion_rates.ok_or_else(|| {
        LoanEmiError::MalformedRates("successful response without conversion_rates".into())
    })?;
    let mut snapshot = RateMap::new(response.base_code.as_deref().unwrap_or(base), rates);

    if let Some(ts) = response.time_last_update_unix {
        if let Some(as_of) = DateTime::<Utc>::from_timestamp(ts, 0) {
            snapshot = snapshot.with_as_of(as_of);
        }
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_provider_success() {
        let payload = json!({
            "result": "success",
            "base_code": "USD",
            "time_last_update_unix": 1_700_000_000,
            "conversion_rates": {"USD": 1, "EUR": 0.92, "JPY": 151.2}
        });
        let rates = parse_rate_response("GBP", &payload).unwrap();
        assert_eq!(rates.base, "USD");
        assert_eq!(rates.len(), 3);
        assert_eq!(rates.get("EUR"), Some(0.92));
        assert_eq!(rates.as_of.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_provider_error() {
        let payload = json!({"result": "error", "error-type": "invalid-key"});
        let err = parse_rate_response("USD", &payload).unwrap_err();
        match err {
            LoanEmiError::RateFetch { base, reason } => {
                assert_eq!(base, "USD");
                assert_eq!(reason, "invalid-key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_bare_map() {
        let rates = parse_rate_response("usd", &json!({"EUR": 0.92})).unwrap();
        assert_eq!(rates.base, "USD");
        assert_eq!(rates.get("eur"), Some(0.92));
        assert!(rates.as_of.is_none());
    }

    #[test]
    fn test_parse_rejects_non_numeric_rates() {
        let err = parse_rate_response("USD", &json!({"EUR": "high"})).unwrap_err();
        assert!(matches!(err, LoanEmiError::MalformedRates(_)));
        let err = parse_rate_response("USD", &json!([1, 2])).unwrap_err();
        assert!(matches!(err, LoanEmiError::MalformedRates(_)));
    }

    #[test]
    fn test_static_source() {
        let source =
            StaticRateSource::new().with_snapshot(RateMap::new("USD", [("EUR", 0.92)]));
        assert_eq!(source.fetch_rates("usd").unwrap().get("EUR"), Some(0.92));
        assert!(matches!(
            source.fetch_rates("EUR"),
            Err(LoanEmiError::RateFetch { .. })
        ));
    }
}
