use clap::Args;
use std::path::PathBuf;
use tracing::debug;

use loan_emi_core::currency::{parse_rate_response, RateFeed, RateMap, RateSource};
use loan_emi_core::display::DisplayContext;
use loan_emi_core::{LoanEmiError, LoanEmiResult};

use crate::input;

/// Currency settings shared by every command. Flags override environment variables.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Currency loan amounts are entered in
    #[arg(long, env = "EMI_BASE_CURRENCY", default_value = "USD", global = true)]
    pub base_currency: String,

    /// Currency to display monetary values in (defaults to the base currency)
    #[arg(long, env = "EMI_CURRENCY", global = true)]
    pub currency: Option<String>,

    /// JSON rate snapshot: provider `latest` payload or a bare {"EUR": 0.92} map
    #[arg(long, env = "EMI_RATES_FILE", global = true)]
    pub rates_file: Option<PathBuf>,
}

impl Settings {
    pub fn display_context(&self) -> DisplayContext {
        let ctx = DisplayContext::new(&self.base_currency);
        match &self.currency {
            Some(code) => ctx.with_selected(code),
            None => ctx,
        }
    }

    /// Fetch rates for the base currency into a fresh feed. Without a configured file the
    /// feed stays idle, which conversion treats as "rates unavailable".
    pub fn load_rates(&self) -> RateFeed {
        let mut feed = RateFeed::new();
        if let Some(path) = &self.rates_file {
            let source = FileRateSource { path: path.clone() };
            feed.refresh(&source, &self.base_currency);
        }
        feed
    }
}

/// Rate snapshot read from a local JSON file.
pub struct FileRateSource {
    pub path: PathBuf,
}

impl RateSource for FileRateSource {
    fn fetch_rates(&self, base: &str) -> LoanEmiResult<RateMap> {
        debug!(path = %self.path.display(), base, "loading rate snapshot");
        let value = input::file::read_json_value(&self.path).map_err(|e| {
            LoanEmiError::RateFetch {
                base: base.to_uppercase(),
                reason: e.to_string(),
            }
        })?;
        let rates = parse_rate_response(base, &value)?;

        if !rates.base.eq_ignore_ascii_case(base) {
            return Err(LoanEmiError::RateFetch {
                base: base.to_uppercase(),
                reason: format!("snapshot is quoted against {}", rates.base),
            });
        }
        Ok(rates)
    }
}
