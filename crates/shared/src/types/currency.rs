//! Supported currency codes.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes accepted for budgets and transactions.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    #[default]
    Usd,
    /// Indian Rupee
    Inr,
    /// Euro
    Eur,
    /// Pound Sterling
    Gbp,
    /// Japanese Yen
    Jpy,
    /// Canadian Dollar
    Cad,
    /// Australian Dollar
    Aud,
}

impl Currency {
    /// Every supported currency, in display order.
    pub const ALL: [Self; 7] = [
        Self::Usd,
        Self::Inr,
        Self::Eur,
        Self::Gbp,
        Self::Jpy,
        Self::Cad,
        Self::Aud,
    ];

    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Inr => "INR",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
            Self::Cad => "CAD",
            Self::Aud => "AUD",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|c| c.code() == upper)
            .ok_or_else(|| format!("Unknown currency: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("USD", Currency::Usd)]
    #[case("inr", Currency::Inr)]
    #[case("Eur", Currency::Eur)]
    #[case(" GBP ", Currency::Gbp)]
    #[case("JPY", Currency::Jpy)]
    #[case("CAD", Currency::Cad)]
    #[case("AUD", Currency::Aud)]
    fn test_currency_from_str(#[case] input: &str, #[case] expected: Currency) {
        assert_eq!(Currency::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_currency_from_str_rejects_unknown() {
        assert!(Currency::from_str("IDR").is_err());
    }

    #[test]
    fn test_currency_display_matches_serde() {
        for currency in Currency::ALL {
            let json = serde_json::to_string(&currency).unwrap();
            assert_eq!(json, format!("\"{currency}\""));
        }
    }

    #[test]
    fn test_default_is_usd() {
        assert_eq!(Currency::default(), Currency::Usd);
    }
}
