//! Budget service: user-scoped budget CRUD and reports.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use tally_shared::Clock;
use tally_shared::types::{BudgetId, Currency, UserId};
use tracing::{debug, info};

use super::aggregate::aggregate;
use super::error::BudgetError;
use super::period::{PeriodType, ReportPeriod, resolve_period, resolve_report_period};
use super::progress::compute_progress;
use super::types::{
    Budget, BudgetVsActualReport, BudgetWithProgress, CreateBudgetInput, UpdateBudgetInput,
};
use crate::store::{BudgetStore, StoreError, TransactionQuery, TransactionStore};
use crate::transaction::TransactionKind;

/// Budget service.
///
/// Reads the current instant from the injected clock and evaluates calendar
/// periods in the configured timezone.
pub struct BudgetService<S, C>
where
    S: BudgetStore + TransactionStore,
    C: Clock,
{
    store: Arc<S>,
    clock: C,
    tz: Tz,
}

impl<S, C> BudgetService<S, C>
where
    S: BudgetStore + TransactionStore,
    C: Clock,
{
    /// Create a new budget service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: C, tz: Tz) -> Self {
        Self { store, clock, tz }
    }

    fn now(&self) -> DateTime<Tz> {
        self.clock.now().with_timezone(&self.tz)
    }

    /// Every budget of `user_id` with its progress in the active period.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::Store` if the store fails.
    pub async fn list_with_progress(
        &self,
        user_id: UserId,
    ) -> Result<Vec<BudgetWithProgress>, BudgetError> {
        let budgets = self.store.find_budgets(user_id).await?;
        let now = self.now();

        let mut out = Vec::with_capacity(budgets.len());
        for budget in budgets {
            out.push(self.with_progress(budget, &now).await?);
        }
        Ok(out)
    }

    /// One budget with its progress.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if the user has no such budget.
    pub async fn get_with_progress(
        &self,
        user_id: UserId,
        id: BudgetId,
    ) -> Result<BudgetWithProgress, BudgetError> {
        let budget = self
            .store
            .find_budget(user_id, id)
            .await?
            .ok_or(BudgetError::NotFound(id))?;
        self.with_progress(budget, &self.now()).await
    }

    /// The budget of a category with its progress.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::CategoryNotFound` if the category has no budget.
    pub async fn get_by_category_with_progress(
        &self,
        user_id: UserId,
        category: &str,
    ) -> Result<BudgetWithProgress, BudgetError> {
        let budget = self
            .store
            .find_budget_by_category(user_id, category)
            .await?
            .ok_or_else(|| BudgetError::CategoryNotFound(category.to_string()))?;
        self.with_progress(budget, &self.now()).await
    }

    async fn with_progress(
        &self,
        budget: Budget,
        now: &DateTime<Tz>,
    ) -> Result<BudgetWithProgress, BudgetError> {
        let period = resolve_period(budget.period_type, now, budget.start_date, budget.end_date);
        let query = TransactionQuery::for_user(budget.user_id)
            .category(budget.category.as_str())
            .within(period)
            .of_kind(TransactionKind::Expense);
        let transactions = self.store.find_transactions(&query).await?;
        let progress = compute_progress(&budget, &transactions);

        debug!(
            budget_id = %budget.id,
            category = %budget.category,
            start = %period.start,
            end = %period.end,
            spent = %progress.spent,
            "computed budget progress"
        );

        Ok(BudgetWithProgress {
            budget,
            progress,
            period_start: period.start,
            period_end: period.end,
            transactions,
        })
    }

    /// Creates a budget in the user's preferred currency.
    ///
    /// Without explicit dates the window defaults to the current month.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank category, a missing or negative
    /// amount, an unknown period type, an out-of-range threshold or an
    /// inverted window; `BudgetError::DuplicateCategory` if the category is
    /// already budgeted.
    pub async fn create_budget(
        &self,
        user_id: UserId,
        input: CreateBudgetInput,
        currency: Currency,
    ) -> Result<Budget, BudgetError> {
        let category = required_category(&input.category)?;
        let amount = input.amount.ok_or(BudgetError::MissingField("budget amount"))?;
        validate_amount(amount)?;
        let period_type = parse_period_type(input.period_type.as_deref())?;
        let notifications = input.notifications.unwrap_or_default();
        validate_threshold(notifications.threshold)?;

        let now = self.now();
        let month = resolve_report_period(ReportPeriod::Month, &now);
        let start_date = input.start_date.unwrap_or(month.start);
        let end_date = input.end_date.unwrap_or(month.end);
        validate_window(Some(start_date), Some(end_date))?;

        if self
            .store
            .find_budget_by_category(user_id, &category)
            .await?
            .is_some()
        {
            return Err(BudgetError::DuplicateCategory(category));
        }

        let created_at = now.with_timezone(&Utc);
        let budget = Budget {
            id: BudgetId::new(),
            user_id,
            category,
            amount,
            currency,
            period_type,
            start_date: Some(start_date),
            end_date: Some(end_date),
            rollover: input.rollover,
            rollover_amount: Decimal::ZERO,
            notifications,
            created_at,
            updated_at: created_at,
        };

        let budget = match self.store.insert_budget(budget).await {
            Err(StoreError::UniqueViolation { key, .. }) => {
                return Err(BudgetError::DuplicateCategory(key));
            }
            other => other?,
        };

        info!(budget_id = %budget.id, %user_id, category = %budget.category, "budget created");
        Ok(budget)
    }

    /// Applies a partial update to a budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if the user has no such budget, a
    /// validation error for invalid fields, and
    /// `BudgetError::DuplicateCategory` when renaming onto a budgeted category.
    pub async fn update_budget(
        &self,
        user_id: UserId,
        id: BudgetId,
        patch: UpdateBudgetInput,
    ) -> Result<Budget, BudgetError> {
        let mut budget = self
            .store
            .find_budget(user_id, id)
            .await?
            .ok_or(BudgetError::NotFound(id))?;

        if let Some(category) = patch.category.as_deref() {
            let category = required_category(category)?;
            if category != budget.category {
                let taken = self
                    .store
                    .find_budget_by_category(user_id, &category)
                    .await?
                    .is_some_and(|other| other.id != id);
                if taken {
                    return Err(BudgetError::DuplicateCategory(category));
                }
                budget.category = category;
            }
        }
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
            budget.amount = amount;
        }
        if let Some(raw) = patch.period_type.as_deref() {
            budget.period_type = parse_period_type(Some(raw))?;
        }
        if let Some(notifications) = patch.notifications {
            validate_threshold(notifications.threshold)?;
            budget.notifications = notifications;
        }
        budget.start_date = patch.start_date.or(budget.start_date);
        budget.end_date = patch.end_date.or(budget.end_date);
        validate_window(budget.start_date, budget.end_date)?;
        budget.rollover = patch.rollover.unwrap_or(budget.rollover);
        budget.rollover_amount = patch.rollover_amount.unwrap_or(budget.rollover_amount);
        budget.updated_at = self.clock.now();

        let updated = match self.store.update_budget(budget).await {
            Err(StoreError::UniqueViolation { key, .. }) => {
                return Err(BudgetError::DuplicateCategory(key));
            }
            other => other?,
        };
        let updated = updated.ok_or(BudgetError::NotFound(id))?;

        info!(budget_id = %id, %user_id, "budget updated");
        Ok(updated)
    }

    /// Deletes a budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if the user has no such budget.
    pub async fn delete_budget(&self, user_id: UserId, id: BudgetId) -> Result<(), BudgetError> {
        if !self.store.delete_budget(user_id, id).await? {
            return Err(BudgetError::NotFound(id));
        }
        info!(budget_id = %id, %user_id, "budget deleted");
        Ok(())
    }

    /// Budgeted vs actual spending per category for the month, quarter or
    /// year containing now.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::Store` if the store fails.
    pub async fn budget_vs_actual(
        &self,
        user_id: UserId,
        selector: ReportPeriod,
    ) -> Result<BudgetVsActualReport, BudgetError> {
        let period = resolve_report_period(selector, &self.now());
        let budgets = self.store.find_budgets(user_id).await?;
        let actuals = self
            .store
            .sum_by_category(user_id, period, TransactionKind::Expense)
            .await?;

        debug!(
            %user_id,
            %selector,
            start = %period.start,
            end = %period.end,
            budgets = budgets.len(),
            categories = actuals.len(),
            "building budget vs actual report"
        );

        Ok(BudgetVsActualReport {
            budget_vs_actual: aggregate(&budgets, &actuals),
            period: selector,
            start_date: period.start,
            end_date: period.end,
        })
    }
}

fn required_category(raw: &str) -> Result<String, BudgetError> {
    let category = raw.trim();
    if category.is_empty() {
        return Err(BudgetError::MissingField("category"));
    }
    Ok(category.to_string())
}

fn validate_amount(amount: Decimal) -> Result<(), BudgetError> {
    if amount < Decimal::ZERO {
        return Err(BudgetError::NegativeAmount);
    }
    Ok(())
}

fn validate_threshold(threshold: Decimal) -> Result<(), BudgetError> {
    if threshold < Decimal::ZERO || threshold > Decimal::ONE_HUNDRED {
        return Err(BudgetError::InvalidThreshold);
    }
    Ok(())
}

fn validate_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), BudgetError> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(BudgetError::InvertedWindow),
        _ => Ok(()),
    }
}

fn parse_period_type(raw: Option<&str>) -> Result<PeriodType, BudgetError> {
    raw.map_or(Ok(PeriodType::default()), str::parse)
}
