//! Currency error types.

use tally_shared::AppError;
use tally_shared::types::Currency;
use thiserror::Error;

/// Currency conversion and rate lookup errors.
#[derive(Debug, Error)]
pub enum CurrencyError {
    /// The rate table has no usable rate for one side of the pair.
    #[error("Exchange rate not available for {from} or {to}")]
    RateUnavailable {
        /// Source currency.
        from: Currency,
        /// Target currency.
        to: Currency,
    },

    /// The converted amount does not fit a decimal.
    #[error("Converted amount overflows")]
    Overflow,

    /// The rate provider failed.
    #[error("Rate provider failed: {0}")]
    Provider(String),
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        Self::ExternalService(err.to_string())
    }
}
