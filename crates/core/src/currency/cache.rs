//! Time-to-live cache for exchange rate tables.
//!
//! Holds the last table fetched from a [`RateProvider`] and when it was
//! fetched. Freshness is measured against an injected [`Clock`], so tests can
//! move time instead of sleeping.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tally_shared::Clock;
use tracing::{debug, error, warn};

use super::rates::{RateProvider, RateTable};

/// Default freshness window (1 hour).
pub const DEFAULT_RATE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
struct CachedRates {
    table: Arc<RateTable>,
    fetched_at: DateTime<Utc>,
}

/// Exchange rate cache with an explicit clock and TTL.
///
/// The lock is only held to read or replace the cached entry, never across a
/// provider fetch.
#[derive(Debug)]
pub struct ExchangeRateCache<C: Clock> {
    clock: C,
    ttl: TimeDelta,
    entry: Mutex<Option<CachedRates>>,
}

impl<C: Clock> ExchangeRateCache<C> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(clock: C, ttl: Duration) -> Self {
        Self {
            clock,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            entry: Mutex::new(None),
        }
    }

    /// Creates an empty cache with [`DEFAULT_RATE_TTL`].
    #[must_use]
    pub fn with_default_ttl(clock: C) -> Self {
        Self::new(clock, DEFAULT_RATE_TTL)
    }

    /// The cached table, if it is younger than the TTL.
    #[must_use]
    pub fn fresh(&self) -> Option<Arc<RateTable>> {
        let now = self.clock.now();
        self.lock()
            .as_ref()
            .filter(|cached| now - cached.fetched_at < self.ttl)
            .map(|cached| Arc::clone(&cached.table))
    }

    /// Replaces the cached table, stamping it with the current time.
    pub fn store(&self, table: RateTable) -> Arc<RateTable> {
        let table = Arc::new(table);
        *self.lock() = Some(CachedRates {
            table: Arc::clone(&table),
            fetched_at: self.clock.now(),
        });
        table
    }

    /// Drops the cached table.
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    /// Returns fresh cached rates, or fetches new ones.
    ///
    /// A failed fetch is logged and answered with [`RateTable::fallback`],
    /// which is then cached for a full TTL.
    pub async fn get_or_fetch<P: RateProvider>(&self, provider: &P) -> Arc<RateTable> {
        if let Some(table) = self.fresh() {
            debug!(base = %table.base, "serving cached exchange rates");
            return table;
        }

        match provider.fetch_rates().await {
            Ok(table) => {
                debug!(base = %table.base, count = table.rates.len(), "fetched exchange rates");
                self.store(table)
            }
            Err(err) => {
                error!(error = %err, "error fetching exchange rates");
                warn!("using fallback exchange rates");
                self.store(RateTable::fallback())
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<CachedRates>> {
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
