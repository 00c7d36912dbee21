//! Transaction service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use tally_shared::Clock;
use tally_shared::types::{Currency, TransactionId, UserId};
use tracing::{debug, info, warn};

use super::error::{MAX_DESCRIPTION_LEN, TransactionError};
use super::summary::{
    IncomeExpense, SummaryRequest, TransactionSummary, group_transactions, resolve_summary_window,
};
use super::types::{NewTransaction, Transaction, TransactionPatch};
use crate::budget::period::Period;
use crate::currency::{CurrencyConverter, RateProvider};
use crate::store::{PageRequest, TransactionPage, TransactionQuery, TransactionStore};

/// Records, lists, updates and summarizes a user's transactions.
///
/// Amounts entered in a foreign currency are stored converted into the
/// user's currency.
pub struct TransactionService<S, P, C>
where
    S: TransactionStore,
    P: RateProvider,
    C: Clock,
{
    store: Arc<S>,
    converter: Arc<CurrencyConverter<P, C>>,
    clock: C,
    tz: Tz,
}

impl<S, P, C> TransactionService<S, P, C>
where
    S: TransactionStore,
    P: RateProvider,
    C: Clock,
{
    /// Create a new transaction service. Summary windows and day keys follow
    /// the calendar of `tz`.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        converter: Arc<CurrencyConverter<P, C>>,
        clock: C,
        tz: Tz,
    ) -> Self {
        Self {
            store,
            converter,
            clock,
            tz,
        }
    }

    /// Validates and stores a transaction.
    ///
    /// An amount entered in another currency is stored converted into
    /// `user_currency`, keeping the entered amount, its currency and the rate.
    /// A failed conversion still records the transaction, at rate 1.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank description or category or an
    /// overlong description, and `TransactionError::Store` if the store fails.
    pub async fn record(
        &self,
        user_id: UserId,
        input: NewTransaction,
        user_currency: Currency,
    ) -> Result<Transaction, TransactionError> {
        let description = validate_description(&input.description)?;
        let category = validate_category(&input.category)?;

        let mut tx = Transaction {
            id: TransactionId::new(),
            user_id,
            amount: input.amount,
            currency: user_currency,
            original_amount: None,
            original_currency: None,
            exchange_rate: None,
            date: input.date.unwrap_or_else(|| self.clock.now()),
            description,
            category,
            kind: input.kind,
            payment_method: input.payment_method,
            tags: input.tags,
            notes: clean_notes(input.notes),
        };
        let entered = input.currency.unwrap_or(user_currency);
        self.apply_amount(&mut tx, input.amount, entered, user_currency)
            .await;

        let tx = self.store.insert_transaction(tx).await?;
        info!(transaction_id = %tx.id, %user_id, category = %tx.category, "transaction recorded");
        Ok(tx)
    }

    /// One page of the transactions matching `query`.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::Store` if the store fails.
    pub async fn list(
        &self,
        query: &TransactionQuery,
        page: PageRequest,
    ) -> Result<TransactionPage, TransactionError> {
        let page = self.store.find_transaction_page(query, page).await?;
        debug!(
            user_id = %query.user_id,
            total = page.total_transactions,
            page = page.current_page,
            "listed transactions"
        );
        Ok(page)
    }

    /// One of the user's transactions.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the user has no such transaction.
    pub async fn get(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> Result<Transaction, TransactionError> {
        self.store
            .find_transaction(user_id, id)
            .await?
            .ok_or(TransactionError::NotFound(id))
    }

    /// Applies a partial update.
    ///
    /// A new amount or currency is converted again into `user_currency`. A
    /// missing half is taken from what was originally entered, so changing
    /// only the amount of a converted transaction keeps its entered currency.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the user has no such
    /// transaction, or a validation error for the patched fields.
    pub async fn update(
        &self,
        user_id: UserId,
        id: TransactionId,
        patch: TransactionPatch,
        user_currency: Currency,
    ) -> Result<Transaction, TransactionError> {
        let mut tx = self.get(user_id, id).await?;

        if let Some(description) = patch.description {
            tx.description = validate_description(&description)?;
        }
        if let Some(category) = patch.category {
            tx.category = validate_category(&category)?;
        }
        if patch.amount.is_some() || patch.currency.is_some() {
            let amount = patch.amount.or(tx.original_amount).unwrap_or(tx.amount);
            let entered = patch
                .currency
                .or(tx.original_currency)
                .unwrap_or(tx.currency);
            self.apply_amount(&mut tx, amount, entered, user_currency)
                .await;
        }
        if let Some(date) = patch.date {
            tx.date = date;
        }
        if let Some(kind) = patch.kind {
            tx.kind = kind;
        }
        if let Some(method) = patch.payment_method {
            tx.payment_method = method;
        }
        if let Some(tags) = patch.tags {
            tx.tags = tags;
        }
        if patch.notes.is_some() {
            tx.notes = clean_notes(patch.notes);
        }

        let tx = self
            .store
            .update_transaction(tx)
            .await?
            .ok_or(TransactionError::NotFound(id))?;
        info!(transaction_id = %id, %user_id, "transaction updated");
        Ok(tx)
    }

    /// Deletes one of the user's transactions.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the user has no such transaction.
    pub async fn delete(&self, user_id: UserId, id: TransactionId) -> Result<(), TransactionError> {
        if !self.store.delete_transaction(user_id, id).await? {
            return Err(TransactionError::NotFound(id));
        }
        info!(transaction_id = %id, %user_id, "transaction deleted");
        Ok(())
    }

    /// Groups the user's transactions over a window and totals income
    /// against expenses.
    ///
    /// Explicit `start` and `end` win over the named period when both are
    /// given.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::InvertedRange` if explicit bounds are
    /// reversed, and `TransactionError::Store` if the store fails.
    pub async fn summary(
        &self,
        user_id: UserId,
        request: SummaryRequest,
    ) -> Result<TransactionSummary, TransactionError> {
        let window = self.summary_window(request)?;
        let query = TransactionQuery::for_user(user_id).within(window);
        let transactions = self.store.find_transactions(&query).await?;

        let summary = TransactionSummary {
            summary: group_transactions(&transactions, request.group_by, &self.tz),
            income_expense: IncomeExpense::from_transactions(&transactions),
            period: request.period,
            group_by: request.group_by,
            start_date: window.start,
            end_date: window.end,
        };
        debug!(
            %user_id,
            start = %window.start,
            end = %window.end,
            transactions = transactions.len(),
            balance = %summary.income_expense.balance,
            "computed transaction summary"
        );
        Ok(summary)
    }

    fn summary_window(&self, request: SummaryRequest) -> Result<Period, TransactionError> {
        match (request.start, request.end) {
            (Some(start), Some(end)) if start > end => Err(TransactionError::InvertedRange),
            (Some(start), Some(end)) => Ok(Period::new(start, end)),
            _ => Ok(resolve_summary_window(request.period, &self.now())),
        }
    }

    fn now(&self) -> DateTime<Tz> {
        self.clock.now().with_timezone(&self.tz)
    }

    /// Sets the stored amount of `tx` from an amount entered in `entered`.
    async fn apply_amount(
        &self,
        tx: &mut Transaction,
        amount: Decimal,
        entered: Currency,
        user_currency: Currency,
    ) {
        tx.currency = user_currency;
        if entered == user_currency {
            tx.amount = amount;
            tx.original_amount = None;
            tx.original_currency = None;
            tx.exchange_rate = None;
            return;
        }

        let conversion = self.converter.convert(amount, entered, user_currency).await;
        if let Some(reason) = &conversion.error {
            warn!(
                user_id = %tx.user_id,
                from = %entered,
                to = %user_currency,
                %reason,
                "recording unconverted amount"
            );
        }
        tx.amount = conversion.converted_amount;
        tx.original_amount = Some(conversion.original_amount);
        tx.original_currency = Some(entered);
        tx.exchange_rate = Some(conversion.exchange_rate);
    }
}

fn validate_description(raw: &str) -> Result<String, TransactionError> {
    let description = raw.trim();
    if description.is_empty() {
        return Err(TransactionError::MissingField("description"));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(TransactionError::DescriptionTooLong);
    }
    Ok(description.to_string())
}

fn validate_category(raw: &str) -> Result<String, TransactionError> {
    let category = raw.trim();
    if category.is_empty() {
        return Err(TransactionError::MissingField("category"));
    }
    Ok(category.to_string())
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}
