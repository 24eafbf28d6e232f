use tracing::{debug, warn};

use super::rates::{normalize_code, RateMap};
use super::source::RateSource;
use crate::error::LoanEmiError;
use crate::types::CurrencyCode;
use crate::LoanEmiResult;

/// Outcome of the most recent accepted fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum RateState {
    Idle,
    Loading { base: CurrencyCode },
    Ready(RateMap),
    Failed { base: CurrencyCode, reason: String },
}

/// Handle for one in-flight fetch. Only the newest ticket may update the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    base: CurrencyCode,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

/// Latest rate snapshot with a generation guard.
///
/// Every `begin_fetch` supersedes earlier tickets, so a slow response for an old base
/// currency cannot overwrite a newer one. Nothing is cancelled; superseded responses
/// are simply dropped on arrival.
#[derive(Debug, Clone)]
pub struct RateFeed {
    generation: u64,
    state: RateState,
}

impl Default for RateFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl RateFeed {
    pub fn new() -> Self {
        Self {
            generation: 0,
            state: RateState::Idle,
        }
    }

    /// Start a fetch for `base`; the feed shows `Loading` until a result lands.
    pub fn begin_fetch(&mut self, base: &str) -> FetchTicket {
        self.generation += 1;
        let base = normalize_code(base);
        self.state = RateState::Loading { base: base.clone() };
        FetchTicket {
            generation: self.generation,
            base,
        }
    }

    /// Apply a fetch result. Returns `false` (and changes nothing) for a stale ticket.
    pub fn complete(&mut self, ticket: FetchTicket, result: LoanEmiResult<RateMap>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                base = %ticket.base,
                "dropping superseded rate response"
            );
            return false;
        }

        self.state = match result {
            Ok(rates) => RateState::Ready(rates),
            Err(e) => {
                warn!(base = %ticket.base, error = %e, "exchange rate fetch failed");
                let reason = match e {
                    LoanEmiError::RateFetch { reason, .. } => reason,
                    other => other.to_string(),
                };
                RateState::Failed {
                    base: ticket.base,
                    reason,
                }
            }
        };
        true
    }

    /// Synchronous fetch-and-apply through a [`RateSource`].
    pub fn refresh(&mut self, source: &dyn RateSource, base: &str) -> &RateState {
        let ticket = self.begin_fetch(base);
        let result = source.fetch_rates(ticket.base());
        self.complete(ticket, result);
        &self.state
    }

    pub fn state(&self) -> &RateState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RateState::Loading { .. })
    }

    /// Rates usable for conversion. `None` while loading, after a failure, or before
    /// any fetch; conversion treats all of these as "rates unavailable".
    pub fn rates(&self) -> Option<&RateMap> {
        match &self.state {
            RateState::Ready(rates) => Some(rates),
            _ => None,
        }
    }

    /// Failure description from the last accepted fetch, if it failed.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            RateState::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
