//! Currency conversion collaborator.
//!
//! Used when transactions are written, never by the budget calculations.

pub mod cache;
pub mod converter;
pub mod error;
pub mod rates;

pub use cache::{DEFAULT_RATE_TTL, ExchangeRateCache};
pub use converter::{Conversion, CurrencyConverter};
pub use error::CurrencyError;
pub use rates::{RateProvider, RateTable, StaticRateProvider};
