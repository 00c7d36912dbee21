//! Builders shared by budget unit tests.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use tally_shared::types::{BudgetId, Currency, TransactionId, UserId};
use uuid::Uuid;

use super::period::PeriodType;
use super::types::{Budget, Notifications};
use crate::transaction::{PaymentMethod, Transaction, TransactionKind};

pub fn user() -> UserId {
    UserId::from_uuid(Uuid::from_u128(0xaa))
}

/// 2024-02-10 09:00 UTC, inside February of a leap year.
pub fn feb_10() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap()
}

pub fn budget(category: &str, amount: Decimal, threshold: Decimal) -> Budget {
    Budget {
        id: BudgetId::new(),
        user_id: user(),
        category: category.to_string(),
        amount,
        currency: Currency::Usd,
        period_type: PeriodType::Monthly,
        start_date: None,
        end_date: None,
        rollover: false,
        rollover_amount: Decimal::ZERO,
        notifications: Notifications {
            enabled: true,
            threshold,
        },
        created_at: feb_10(),
        updated_at: feb_10(),
    }
}

pub fn transaction(
    category: &str,
    amount: Decimal,
    kind: TransactionKind,
    date: DateTime<Utc>,
) -> Transaction {
    Transaction {
        id: TransactionId::new(),
        user_id: user(),
        amount,
        currency: Currency::Usd,
        original_amount: None,
        original_currency: None,
        exchange_rate: None,
        date,
        description: format!("{category} purchase"),
        category: category.to_string(),
        kind,
        payment_method: PaymentMethod::default(),
        tags: Vec::new(),
        notes: None,
    }
}

pub fn expense(category: &str, amount: Decimal) -> Transaction {
    expense_on(category, amount, feb_10())
}

pub fn expense_on(category: &str, amount: Decimal, date: DateTime<Utc>) -> Transaction {
    transaction(category, amount, TransactionKind::Expense, date)
}

pub fn income(category: &str, amount: Decimal) -> Transaction {
    transaction(category, amount, TransactionKind::Income, feb_10())
}
