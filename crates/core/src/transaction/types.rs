//! Transaction data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{Currency, TransactionId, UserId};

/// What a transaction represents.
///
/// This field, not the sign of the amount, decides whether a transaction
/// counts against a budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money spent.
    #[default]
    Expense,
    /// Money received.
    Income,
    /// Movement between the user's own accounts.
    Transfer,
}

impl TransactionKind {
    /// Lowercase name, as stored in the `type` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Transfer => "transfer",
        }
    }
}

/// How a transaction was paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash.
    #[serde(rename = "cash")]
    Cash,
    /// Credit card.
    #[serde(rename = "credit card")]
    CreditCard,
    /// Debit card.
    #[serde(rename = "debit card")]
    DebitCard,
    /// Bank transfer.
    #[serde(rename = "bank transfer")]
    BankTransfer,
    /// Mobile payment.
    #[serde(rename = "mobile payment")]
    MobilePayment,
    /// Anything else.
    #[default]
    #[serde(rename = "other")]
    Other,
}

/// A stored transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Owning user.
    pub user_id: UserId,
    /// Signed amount in `currency`.
    pub amount: Decimal,
    /// Currency of `amount`.
    #[serde(default)]
    pub currency: Currency,
    /// Amount as entered, before conversion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<Decimal>,
    /// Currency as entered, before conversion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_currency: Option<Currency>,
    /// Rate applied at write time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<Decimal>,
    /// When the transaction happened.
    pub date: DateTime<Utc>,
    /// Short description.
    pub description: String,
    /// Spending category.
    pub category: String,
    /// Expense, income, or transfer.
    #[serde(rename = "type", default)]
    pub kind: TransactionKind,
    /// Payment method.
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Transaction {
    /// Returns true for expense transactions.
    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Amount without sign, as summed by budgets and reports.
    #[must_use]
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }
}

/// Input for recording a transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// Signed amount as entered.
    pub amount: Decimal,
    /// Currency as entered; defaults to the user's currency.
    pub currency: Option<Currency>,
    /// When it happened; defaults to now.
    pub date: Option<DateTime<Utc>>,
    /// Short description.
    pub description: String,
    /// Spending category.
    pub category: String,
    /// Expense, income, or transfer.
    #[serde(rename = "type", default)]
    pub kind: TransactionKind,
    /// Payment method.
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Partial update of a stored transaction. Absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    /// New amount, in `currency` or the currency it was entered in.
    pub amount: Option<Decimal>,
    /// Currency of the new amount.
    pub currency: Option<Currency>,
    /// New date.
    pub date: Option<DateTime<Utc>>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New kind.
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    /// New payment method.
    pub payment_method: Option<PaymentMethod>,
    /// Replacement tags.
    pub tags: Option<Vec<String>>,
    /// New notes; blank clears them.
    pub notes: Option<String>,
}
