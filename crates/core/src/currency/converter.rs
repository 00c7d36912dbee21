//! Currency conversion with cached rates.
//!
//! Conversion never fails the caller: when a rate is missing the amount is
//! passed through with a rate of 1 and the reason is logged and reported in
//! [`Conversion::error`].

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tally_shared::Clock;
use tally_shared::types::Currency;
use tracing::error;

use super::cache::ExchangeRateCache;
use super::error::CurrencyError;
use super::rates::{RateProvider, RateTable};

/// Decimal places kept on converted amounts.
pub const CONVERSION_DECIMAL_PLACES: u32 = 4;

/// Result of a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    /// Amount as given.
    pub original_amount: Decimal,
    /// Amount in the target currency.
    pub converted_amount: Decimal,
    /// Units of target per unit of source.
    pub exchange_rate: Decimal,
    /// Why the amount was passed through unconverted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Conversion {
    fn identity(amount: Decimal) -> Self {
        Self {
            original_amount: amount,
            converted_amount: amount,
            exchange_rate: Decimal::ONE,
            error: None,
        }
    }

    /// Returns true if the amount was actually converted.
    #[must_use]
    pub const fn is_converted(&self) -> bool {
        self.error.is_none()
    }
}

/// Converts amounts using rates from a provider, cached with a TTL.
#[derive(Debug)]
pub struct CurrencyConverter<P: RateProvider, C: Clock> {
    provider: P,
    cache: ExchangeRateCache<C>,
}

impl<P: RateProvider, C: Clock> CurrencyConverter<P, C> {
    /// Creates a converter over `provider`, caching through `cache`.
    #[must_use]
    pub const fn new(provider: P, cache: ExchangeRateCache<C>) -> Self {
        Self { provider, cache }
    }

    /// Current rate table (cached, fetched, or fallback).
    pub async fn rates(&self) -> Arc<RateTable> {
        self.cache.get_or_fetch(&self.provider).await
    }

    /// Converts `amount` from one currency to another.
    ///
    /// Uses banker's rounding (round half to even) at
    /// [`CONVERSION_DECIMAL_PLACES`]. The exchange rate itself is not rounded.
    pub async fn convert(&self, amount: Decimal, from: Currency, to: Currency) -> Conversion {
        if from == to {
            return Conversion::identity(amount);
        }

        let rates = self.rates().await;
        match convert_with(&rates, amount, from, to) {
            Ok(conversion) => conversion,
            Err(err) => {
                error!(%from, %to, error = %err, "currency conversion error");
                Conversion {
                    error: Some(err.to_string()),
                    ..Conversion::identity(amount)
                }
            }
        }
    }

    /// Currency codes the current rate table knows about.
    pub async fn supported_currencies(&self) -> Vec<String> {
        self.rates().await.codes()
    }
}

fn convert_with(
    rates: &RateTable,
    amount: Decimal,
    from: Currency,
    to: Currency,
) -> Result<Conversion, CurrencyError> {
    let exchange_rate = rates.cross_rate(from, to)?;
    let converted = amount
        .checked_mul(exchange_rate)
        .ok_or(CurrencyError::Overflow)?;

    Ok(Conversion {
        original_amount: amount,
        converted_amount: converted.round_dp_with_strategy(
            CONVERSION_DECIMAL_PLACES,
            RoundingStrategy::MidpointNearestEven,
        ),
        exchange_rate,
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::rates::StaticRateProvider;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tally_shared::FixedClock;

    fn converter(table: RateTable) -> CurrencyConverter<StaticRateProvider, FixedClock> {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        CurrencyConverter::new(
            StaticRateProvider::new(table),
            ExchangeRateCache::with_default_ttl(clock),
        )
    }

    #[tokio::test]
    async fn test_same_currency_is_identity() {
        let conv = converter(RateTable::fallback())
            .convert(dec!(12.34), Currency::Gbp, Currency::Gbp)
            .await;

        assert_eq!(conv.converted_amount, dec!(12.34));
        assert_eq!(conv.exchange_rate, dec!(1));
        assert!(conv.is_converted());
    }

    #[tokio::test]
    async fn test_usd_to_eur() {
        let conv = converter(RateTable::fallback())
            .convert(dec!(100), Currency::Usd, Currency::Eur)
            .await;

        assert_eq!(conv.original_amount, dec!(100));
        assert_eq!(conv.converted_amount, dec!(85.0000));
        assert_eq!(conv.exchange_rate, dec!(0.85));
    }

    #[tokio::test]
    async fn test_rounds_half_to_even() {
        // 0.00005 sits halfway between 0.0000 and 0.0001
        let table = RateTable::new("USD", [("USD", dec!(1)), ("EUR", dec!(0.00005))]);
        let conv = converter(table)
            .convert(dec!(1), Currency::Usd, Currency::Eur)
            .await;
        assert_eq!(conv.converted_amount, dec!(0.0000));

        let table = RateTable::new("USD", [("USD", dec!(1)), ("EUR", dec!(0.00015))]);
        let conv = converter(table)
            .convert(dec!(1), Currency::Usd, Currency::Eur)
            .await;
        assert_eq!(conv.converted_amount, dec!(0.0002));
    }

    #[tokio::test]
    async fn test_missing_rate_passes_amount_through() {
        let table = RateTable::new("USD", [("USD", dec!(1))]);
        let conv = converter(table)
            .convert(dec!(50), Currency::Usd, Currency::Aud)
            .await;

        assert_eq!(conv.converted_amount, dec!(50));
        assert_eq!(conv.exchange_rate, dec!(1));
        assert_eq!(
            conv.error.as_deref(),
            Some("Exchange rate not available for USD or AUD")
        );
    }

    #[tokio::test]
    async fn test_supported_currencies_from_table() {
        let codes = converter(RateTable::fallback()).supported_currencies().await;
        assert_eq!(codes, vec!["AUD", "CAD", "EUR", "GBP", "INR", "JPY", "USD"]);
    }
}
