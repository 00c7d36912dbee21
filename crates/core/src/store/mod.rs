//! Storage seams.
//!
//! These traits are implemented outside this crate (the in-memory document
//! store in `tally-store`, or a database-backed one). Every lookup is scoped
//! to a user.

pub mod error;
pub mod query;

use std::future::Future;

use tally_shared::types::{BudgetId, TransactionId, UserId};

pub use error::StoreError;
pub use query::{PageRequest, SortField, SortOrder, TransactionPage, TransactionQuery};

use crate::budget::period::Period;
use crate::budget::types::{Budget, CategoryActual};
use crate::transaction::{Transaction, TransactionKind};

/// Budget persistence.
pub trait BudgetStore: Send + Sync {
    /// Every budget of a user.
    fn find_budgets(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Budget>, StoreError>> + Send;

    /// One budget by id.
    fn find_budget(
        &self,
        user_id: UserId,
        id: BudgetId,
    ) -> impl Future<Output = Result<Option<Budget>, StoreError>> + Send;

    /// The user's budget for a category.
    fn find_budget_by_category(
        &self,
        user_id: UserId,
        category: &str,
    ) -> impl Future<Output = Result<Option<Budget>, StoreError>> + Send;

    /// Inserts a new budget. Fails with `UniqueViolation` if the user already
    /// has a budget for the category.
    fn insert_budget(
        &self,
        budget: Budget,
    ) -> impl Future<Output = Result<Budget, StoreError>> + Send;

    /// Replaces a stored budget. Returns `None` if it does not exist.
    fn update_budget(
        &self,
        budget: Budget,
    ) -> impl Future<Output = Result<Option<Budget>, StoreError>> + Send;

    /// Deletes a budget. Returns whether one was removed.
    fn delete_budget(
        &self,
        user_id: UserId,
        id: BudgetId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Transaction persistence.
pub trait TransactionStore: Send + Sync {
    /// Every transaction matching `query`, in the query's order.
    fn find_transactions(
        &self,
        query: &TransactionQuery,
    ) -> impl Future<Output = Result<Vec<Transaction>, StoreError>> + Send;

    /// One page of the transactions matching `query`, with the total count.
    fn find_transaction_page(
        &self,
        query: &TransactionQuery,
        page: PageRequest,
    ) -> impl Future<Output = Result<TransactionPage, StoreError>> + Send;

    /// One transaction by id.
    fn find_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> impl Future<Output = Result<Option<Transaction>, StoreError>> + Send;

    /// Absolute amounts of `kind` transactions in `period`, summed per category.
    fn sum_by_category(
        &self,
        user_id: UserId,
        period: Period,
        kind: TransactionKind,
    ) -> impl Future<Output = Result<Vec<CategoryActual>, StoreError>> + Send;

    /// Inserts a new transaction.
    fn insert_transaction(
        &self,
        transaction: Transaction,
    ) -> impl Future<Output = Result<Transaction, StoreError>> + Send;

    /// Replaces a stored transaction. Returns `None` if it does not exist.
    fn update_transaction(
        &self,
        transaction: Transaction,
    ) -> impl Future<Output = Result<Option<Transaction>, StoreError>> + Send;

    /// Deletes a transaction. Returns whether one was removed.
    fn delete_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}
