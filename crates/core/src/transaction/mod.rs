//! Transactions: the stored shape, recording with conversion into the
//! user's currency, listing, updates and income/expense summaries.

pub mod error;
pub mod service;
pub mod summary;
pub mod types;

pub use error::{MAX_DESCRIPTION_LEN, TransactionError};
pub use service::TransactionService;
pub use summary::{
    GroupBy, IncomeExpense, SummaryGroup, SummaryPeriod, SummaryRequest, TransactionSummary,
    group_transactions, resolve_summary_window,
};
pub use types::{NewTransaction, PaymentMethod, Transaction, TransactionKind, TransactionPatch};
