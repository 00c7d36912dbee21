//! Budget progress calculation.

use rust_decimal::Decimal;

use super::types::{Budget, BudgetStatus, Progress};
use crate::transaction::Transaction;

/// Computes spending progress of `budget` from `transactions`.
///
/// Only expense transactions are counted, by absolute amount. Narrowing to
/// the budget's category and period is the caller's job (normally the store
/// query). A zero budget reports `0` percent rather than dividing by zero.
#[must_use]
pub fn compute_progress(budget: &Budget, transactions: &[Transaction]) -> Progress {
    let spent: Decimal = transactions
        .iter()
        .filter(|tx| tx.is_expense())
        .map(Transaction::magnitude)
        .sum();

    let percent_spent = percent_of(spent, budget.amount);

    Progress {
        spent,
        remaining: budget.amount - spent,
        percent_spent,
        status: classify(percent_spent, budget.notifications.threshold),
    }
}

/// `part / whole * 100`, or zero when `whole` is not positive.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::MAX)
}

/// Status for a spent percentage against a warning threshold.
#[must_use]
pub fn classify(percent_spent: Decimal, threshold: Decimal) -> BudgetStatus {
    if percent_spent >= Decimal::ONE_HUNDRED {
        BudgetStatus::Exceeded
    } else if percent_spent >= threshold {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Ok
    }
}
