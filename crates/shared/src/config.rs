//! Application configuration management.

use chrono_tz::Tz;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// General application settings.
    #[serde(default)]
    pub app: GeneralConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Exchange rate configuration.
    #[serde(default)]
    pub exchange: ExchangeConfig,
}

/// General application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// IANA timezone whose calendar defines month/quarter/year boundaries.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Currency budgets and converted transactions are expressed in.
    #[serde(default = "default_base_currency")]
    pub base_currency: Currency,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            base_currency: default_base_currency(),
        }
    }
}

impl GeneralConfig {
    /// Parses the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known IANA zone.
    pub fn tz(&self) -> Result<Tz, config::ConfigError> {
        self.timezone.parse::<Tz>().map_err(|e| {
            config::ConfigError::Message(format!("invalid timezone {}: {e}", self.timezone))
        })
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_base_currency() -> Currency {
    Currency::Usd
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON snapshot loaded into the in-memory store.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

fn default_snapshot_path() -> String {
    "data/snapshot.json".to_string()
}

/// Exchange rate configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// How long fetched rates stay fresh, in seconds.
    #[serde(default = "default_rate_ttl")]
    pub ttl_secs: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_rate_ttl(),
        }
    }
}

fn default_rate_ttl() -> u64 {
    3600 // 1 hour
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(
            [
                "TALLY__APP__TIMEZONE",
                "TALLY__APP__BASE_CURRENCY",
                "TALLY__STORAGE__SNAPSHOT_PATH",
                "TALLY__EXCHANGE__TTL_SECS",
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.app.timezone, "UTC");
                assert_eq!(config.app.base_currency, Currency::Usd);
                assert_eq!(config.storage.snapshot_path, "data/snapshot.json");
                assert_eq!(config.exchange.ttl_secs, 3600);
            },
        );
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("TALLY__APP__TIMEZONE", Some("Asia/Kolkata")),
                ("TALLY__APP__BASE_CURRENCY", Some("INR")),
                ("TALLY__EXCHANGE__TTL_SECS", Some("60")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.app.timezone, "Asia/Kolkata");
                assert_eq!(config.app.tz().unwrap(), chrono_tz::Asia::Kolkata);
                assert_eq!(config.app.base_currency, Currency::Inr);
                assert_eq!(config.exchange.ttl_secs, 60);
            },
        );
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        let general = GeneralConfig {
            timezone: "Mars/Olympus".to_string(),
            base_currency: Currency::Usd,
        };
        assert!(general.tz().is_err());
    }
}
