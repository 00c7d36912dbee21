//! Budget data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{BudgetId, Currency, UserId};

use super::period::{PeriodType, ReportPeriod};
use crate::transaction::Transaction;

/// Default warning threshold, in percent of the budget amount.
pub const DEFAULT_THRESHOLD: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// Notification settings of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notifications {
    /// Whether the user asked to be notified.
    #[serde(default)]
    pub enabled: bool,
    /// Percent spent at which status turns to `warning` (0-100).
    #[serde(default = "default_threshold")]
    pub threshold: Decimal,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl Notifications {
    /// Notifications enabled at `threshold` percent.
    #[must_use]
    pub const fn at(threshold: Decimal) -> Self {
        Self {
            enabled: true,
            threshold,
        }
    }
}

fn default_threshold() -> Decimal {
    DEFAULT_THRESHOLD
}

/// A per-category spending ceiling.
///
/// One budget exists per (user, category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owning user.
    pub user_id: UserId,
    /// Spending category the budget caps.
    pub category: String,
    /// Budgeted amount, never negative.
    pub amount: Decimal,
    /// Currency of `amount`.
    #[serde(default)]
    pub currency: Currency,
    /// How the active period is determined.
    #[serde(default)]
    pub period_type: PeriodType,
    /// Window start, used only when `period_type` is custom.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Window end, used only when `period_type` is custom.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// Whether unspent amounts roll into the next period.
    #[serde(default)]
    pub rollover: bool,
    /// Amount carried over from the previous period.
    #[serde(default)]
    pub rollover_amount: Decimal,
    /// Notification settings.
    #[serde(default)]
    pub notifications: Notifications,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Progress status of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// Below the notification threshold.
    Ok,
    /// At or above the threshold, below 100%.
    Warning,
    /// At or above 100%.
    Exceeded,
}

/// Spending progress of a budget over one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Sum of expense magnitudes in the period.
    pub spent: Decimal,
    /// Budget amount minus spent; negative once exceeded.
    pub remaining: Decimal,
    /// Spent as a percentage of the budget amount; zero for a zero budget.
    pub percent_spent: Decimal,
    /// Derived status.
    pub status: BudgetStatus,
}

/// A budget together with its current progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetWithProgress {
    /// The stored budget.
    #[serde(flatten)]
    pub budget: Budget,
    /// Progress over the active period.
    #[serde(flatten)]
    pub progress: Progress,
    /// First instant of the active period.
    pub period_start: DateTime<Utc>,
    /// Last instant of the active period.
    pub period_end: DateTime<Utc>,
    /// Expenses counted against the budget, newest first.
    pub transactions: Vec<Transaction>,
}

/// Sum of expense magnitudes for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryActual {
    /// Category name.
    pub category: String,
    /// Summed absolute amounts.
    pub actual: Decimal,
}

/// One row of the budget-vs-actual report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetVsActualLine {
    /// Category name.
    pub category: String,
    /// Budgeted amount; zero for unbudgeted spending.
    pub budget: Decimal,
    /// Actual spending.
    pub actual: Decimal,
    /// Budget minus actual.
    pub remaining: Decimal,
    /// Actual as a percentage of budget.
    pub percent_used: Decimal,
}

/// Budget-vs-actual report for a shared period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetVsActualReport {
    /// Rows, highest `percent_used` first.
    pub budget_vs_actual: Vec<BudgetVsActualLine>,
    /// Period selector the report was built for.
    pub period: ReportPeriod,
    /// First instant of the shared period.
    pub start_date: DateTime<Utc>,
    /// Last instant of the shared period.
    pub end_date: DateTime<Utc>,
}

/// Input for creating a budget.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetInput {
    /// Category to cap.
    pub category: String,
    /// Budgeted amount.
    pub amount: Option<Decimal>,
    /// Period type name; defaults to monthly.
    pub period_type: Option<String>,
    /// Custom window start.
    pub start_date: Option<DateTime<Utc>>,
    /// Custom window end.
    pub end_date: Option<DateTime<Utc>>,
    /// Rollover flag.
    #[serde(default)]
    pub rollover: bool,
    /// Notification settings.
    pub notifications: Option<Notifications>,
}

/// Partial update of a budget. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetInput {
    /// New category.
    pub category: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New period type name.
    pub period_type: Option<String>,
    /// New custom window start.
    pub start_date: Option<DateTime<Utc>>,
    /// New custom window end.
    pub end_date: Option<DateTime<Utc>>,
    /// New rollover flag.
    pub rollover: Option<bool>,
    /// New rollover amount.
    pub rollover_amount: Option<Decimal>,
    /// New notification settings.
    pub notifications: Option<Notifications>,
}
