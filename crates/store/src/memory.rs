//! In-memory document store.

use tally_core::budget::{Budget, CategoryActual, Period, summarize_by_category};
use tally_core::store::{
    BudgetStore, PageRequest, StoreError, TransactionPage, TransactionQuery, TransactionStore,
};
use tally_core::transaction::{Transaction, TransactionKind};
use tally_shared::types::{BudgetId, TransactionId, UserId};
use tokio::sync::RwLock;

use crate::snapshot::{Snapshot, SnapshotError};

const BUDGETS: &str = "budgets";

/// Budgets and transactions held in memory.
///
/// Budgets carry a unique index on (user, category).
#[derive(Debug, Default)]
pub struct MemoryStore {
    budgets: RwLock<Vec<Budget>>,
    transactions: RwLock<Vec<Transaction>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the documents of `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Store` if two budgets share a user and category.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, SnapshotError> {
        for (i, budget) in snapshot.budgets.iter().enumerate() {
            if snapshot.budgets[..i]
                .iter()
                .any(|other| same_key(other, budget.user_id, &budget.category))
            {
                return Err(duplicate(&budget.category).into());
            }
        }

        Ok(Self {
            budgets: RwLock::new(snapshot.budgets),
            transactions: RwLock::new(snapshot.transactions),
        })
    }

    /// Copies every document into a snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        Snapshot {
            budgets: self.budgets.read().await.clone(),
            transactions: self.transactions.read().await.clone(),
        }
    }
}

fn same_key(budget: &Budget, user_id: UserId, category: &str) -> bool {
    budget.user_id == user_id && budget.category == category
}

fn duplicate(category: &str) -> StoreError {
    StoreError::UniqueViolation {
        collection: BUDGETS,
        key: category.to_string(),
    }
}

impl BudgetStore for MemoryStore {
    async fn find_budgets(&self, user_id: UserId) -> Result<Vec<Budget>, StoreError> {
        Ok(self
            .budgets
            .read()
            .await
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_budget(
        &self,
        user_id: UserId,
        id: BudgetId,
    ) -> Result<Option<Budget>, StoreError> {
        Ok(self
            .budgets
            .read()
            .await
            .iter()
            .find(|b| b.user_id == user_id && b.id == id)
            .cloned())
    }

    async fn find_budget_by_category(
        &self,
        user_id: UserId,
        category: &str,
    ) -> Result<Option<Budget>, StoreError> {
        Ok(self
            .budgets
            .read()
            .await
            .iter()
            .find(|b| same_key(b, user_id, category))
            .cloned())
    }

    async fn insert_budget(&self, budget: Budget) -> Result<Budget, StoreError> {
        let mut budgets = self.budgets.write().await;
        if budgets
            .iter()
            .any(|b| same_key(b, budget.user_id, &budget.category))
        {
            return Err(duplicate(&budget.category));
        }
        budgets.push(budget.clone());
        Ok(budget)
    }

    async fn update_budget(&self, budget: Budget) -> Result<Option<Budget>, StoreError> {
        let mut budgets = self.budgets.write().await;
        if budgets
            .iter()
            .any(|b| b.id != budget.id && same_key(b, budget.user_id, &budget.category))
        {
            return Err(duplicate(&budget.category));
        }
        let Some(slot) = budgets
            .iter_mut()
            .find(|b| b.id == budget.id && b.user_id == budget.user_id)
        else {
            return Ok(None);
        };
        *slot = budget.clone();
        Ok(Some(budget))
    }

    async fn delete_budget(&self, user_id: UserId, id: BudgetId) -> Result<bool, StoreError> {
        let mut budgets = self.budgets.write().await;
        let before = budgets.len();
        budgets.retain(|b| !(b.user_id == user_id && b.id == id));
        Ok(budgets.len() < before)
    }
}

impl TransactionStore for MemoryStore {
    async fn find_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, StoreError> {
        Ok(query.select(self.transactions.read().await.iter()))
    }

    async fn find_transaction_page(
        &self,
        query: &TransactionQuery,
        page: PageRequest,
    ) -> Result<TransactionPage, StoreError> {
        let matching = query.select(self.transactions.read().await.iter());
        Ok(TransactionPage::paginate(matching, page))
    }

    async fn find_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(self
            .transactions
            .read()
            .await
            .iter()
            .find(|tx| tx.user_id == user_id && tx.id == id)
            .cloned())
    }

    async fn sum_by_category(
        &self,
        user_id: UserId,
        period: Period,
        kind: TransactionKind,
    ) -> Result<Vec<CategoryActual>, StoreError> {
        let transactions = self.transactions.read().await;
        let own: Vec<Transaction> = transactions
            .iter()
            .filter(|tx| tx.user_id == user_id)
            .cloned()
            .collect();
        Ok(summarize_by_category(&own, &period, kind))
    }

    async fn insert_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Transaction, StoreError> {
        self.transactions.write().await.push(transaction.clone());
        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Option<Transaction>, StoreError> {
        let mut transactions = self.transactions.write().await;
        let Some(slot) = transactions
            .iter_mut()
            .find(|tx| tx.id == transaction.id && tx.user_id == transaction.user_id)
        else {
            return Ok(None);
        };
        *slot = transaction.clone();
        Ok(Some(transaction))
    }

    async fn delete_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> Result<bool, StoreError> {
        let mut transactions = self.transactions.write().await;
        let before = transactions.len();
        transactions.retain(|tx| !(tx.user_id == user_id && tx.id == id));
        Ok(transactions.len() < before)
    }
}
