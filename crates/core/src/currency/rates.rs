//! Exchange rate tables and providers.

use std::collections::BTreeMap;
use std::future::Future;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::Currency;

use super::error::CurrencyError;

/// Rates of every known currency against one base (1 base = rate units).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    /// Base currency code.
    pub base: String,
    /// Currency code to rate. Providers may list codes outside [`Currency`].
    pub rates: BTreeMap<String, Decimal>,
}

impl RateTable {
    /// Creates a table from `(code, rate)` pairs.
    #[must_use]
    pub fn new<I, S>(base: &str, rates: I) -> Self
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        Self {
            base: base.to_string(),
            rates: rates.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Static USD-based table used whenever no fresh rates can be fetched.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(
            "USD",
            [
                ("USD", Decimal::ONE),
                ("INR", Decimal::new(745, 1)),
                ("EUR", Decimal::new(85, 2)),
                ("GBP", Decimal::new(73, 2)),
                ("JPY", Decimal::new(1102, 1)),
                ("CAD", Decimal::new(125, 2)),
                ("AUD", Decimal::new(136, 2)),
            ],
        )
    }

    /// Rate of `currency` against the base, if known.
    #[must_use]
    pub fn rate(&self, currency: Currency) -> Option<Decimal> {
        self.rates.get(currency.code()).copied()
    }

    /// Units of `to` per unit of `from`.
    ///
    /// # Errors
    ///
    /// Returns `RateUnavailable` if either rate is missing or not positive.
    pub fn cross_rate(&self, from: Currency, to: Currency) -> Result<Decimal, CurrencyError> {
        let unavailable = || CurrencyError::RateUnavailable { from, to };

        let from_rate = self
            .rate(from)
            .filter(|r| r.is_sign_positive() && !r.is_zero())
            .ok_or_else(unavailable)?;
        let to_rate = self
            .rate(to)
            .filter(|r| r.is_sign_positive() && !r.is_zero())
            .ok_or_else(unavailable)?;

        to_rate.checked_div(from_rate).ok_or_else(unavailable)
    }

    /// Currency codes present in the table.
    #[must_use]
    pub fn codes(&self) -> Vec<String> {
        self.rates.keys().cloned().collect()
    }
}

/// Source of fresh exchange rates.
pub trait RateProvider: Send + Sync {
    /// Fetches the latest rate table.
    fn fetch_rates(&self) -> impl Future<Output = Result<RateTable, CurrencyError>> + Send;
}

/// Provider that always answers with the same table.
#[derive(Debug, Clone)]
pub struct StaticRateProvider {
    table: RateTable,
}

impl StaticRateProvider {
    /// Serves `table`.
    #[must_use]
    pub const fn new(table: RateTable) -> Self {
        Self { table }
    }

    /// Serves [`RateTable::fallback`].
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(RateTable::fallback())
    }
}

impl RateProvider for StaticRateProvider {
    async fn fetch_rates(&self) -> Result<RateTable, CurrencyError> {
        Ok(self.table.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fallback_covers_every_supported_currency() {
        let table = RateTable::fallback();
        for currency in Currency::ALL {
            assert!(table.rate(currency).is_some(), "missing {currency}");
        }
        assert_eq!(table.rate(Currency::Usd), Some(dec!(1)));
        assert_eq!(table.rate(Currency::Jpy), Some(dec!(110.2)));
    }

    #[test]
    fn test_cross_rate_through_base() {
        let table = RateTable::fallback();

        assert_eq!(table.cross_rate(Currency::Usd, Currency::Eur).unwrap(), dec!(0.85));
        assert_eq!(table.cross_rate(Currency::Eur, Currency::Eur).unwrap(), dec!(1));
        // 74.5 / 1.25
        assert_eq!(table.cross_rate(Currency::Cad, Currency::Inr).unwrap(), dec!(59.6));
    }

    #[test]
    fn test_cross_rate_missing_currency() {
        let table = RateTable::new("USD", [("USD", dec!(1))]);
        let err = table.cross_rate(Currency::Usd, Currency::Gbp).unwrap_err();

        assert!(matches!(
            err,
            CurrencyError::RateUnavailable { from: Currency::Usd, to: Currency::Gbp }
        ));
    }

    #[test]
    fn test_cross_rate_rejects_zero_rate() {
        let table = RateTable::new("USD", [("USD", dec!(1)), ("EUR", dec!(0))]);
        assert!(table.cross_rate(Currency::Eur, Currency::Usd).is_err());
    }

    #[tokio::test]
    async fn test_static_provider_serves_its_table() {
        let provider = StaticRateProvider::fallback();
        assert_eq!(provider.fetch_rates().await.unwrap(), RateTable::fallback());
    }
}
