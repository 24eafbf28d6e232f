pub mod emi;
pub mod error;
pub mod page;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "amortization")]
pub mod analysis;

#[cfg(feature = "currency")]
pub mod currency;

#[cfg(feature = "currency")]
pub mod display;

pub use emi::{calculate_emi, monthly_rate};
pub use error::LoanEmiError;
pub use types::*;

/// Standard result type for the fallible loan-emi operations (rate sources, parsing)
pub type LoanEmiResult<T> = Result<T, LoanEmiError>;
