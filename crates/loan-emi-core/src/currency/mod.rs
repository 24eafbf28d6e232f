pub mod feed;
pub mod rates;
pub mod source;

pub use feed::{FetchTicket, RateFeed, RateState};
pub use rates::{convert, RateEntry, RateMap};
pub use source::{parse_rate_response, RateSource, StaticRateSource};
