//! Budget-vs-actual aggregation.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::period::Period;
use super::progress::percent_of;
use super::types::{Budget, BudgetVsActualLine, CategoryActual};
use crate::transaction::{Transaction, TransactionKind};

/// Merges budgets with per-category actuals for one shared period.
///
/// Every budget yields a row; categories with spending but no budget yield a
/// row with a zero budget and `percent_used` pinned at 100. Rows are ordered
/// by `percent_used`, highest first; equal rows keep their input order.
#[must_use]
pub fn aggregate(budgets: &[Budget], actuals: &[CategoryActual]) -> Vec<BudgetVsActualLine> {
    let actual_by_category: HashMap<&str, Decimal> = actuals
        .iter()
        .map(|a| (a.category.as_str(), a.actual))
        .collect();

    let mut lines: Vec<BudgetVsActualLine> = budgets
        .iter()
        .map(|budget| {
            let actual = actual_by_category
                .get(budget.category.as_str())
                .copied()
                .unwrap_or(Decimal::ZERO);
            let percent_used = if actual > Decimal::ZERO {
                percent_of(actual, budget.amount)
            } else {
                Decimal::ZERO
            };
            BudgetVsActualLine {
                category: budget.category.clone(),
                budget: budget.amount,
                actual,
                remaining: budget.amount - actual,
                percent_used,
            }
        })
        .collect();

    for spending in actuals {
        if lines.iter().any(|line| line.category == spending.category) {
            continue;
        }
        lines.push(BudgetVsActualLine {
            category: spending.category.clone(),
            budget: Decimal::ZERO,
            actual: spending.actual,
            remaining: -spending.actual,
            percent_used: Decimal::ONE_HUNDRED,
        });
    }

    // stable: ties keep encounter order
    lines.sort_by(|a, b| b.percent_used.cmp(&a.percent_used));
    lines
}

/// Sums absolute amounts of `kind` transactions inside `period`, per category.
///
/// Categories appear in the order they are first encountered.
#[must_use]
pub fn summarize_by_category(
    transactions: &[Transaction],
    period: &Period,
    kind: TransactionKind,
) -> Vec<CategoryActual> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<CategoryActual> = Vec::new();

    for tx in transactions
        .iter()
        .filter(|tx| tx.kind == kind && period.contains(tx.date))
    {
        match index.get(tx.category.as_str()) {
            Some(&i) => totals[i].actual += tx.magnitude(),
            None => {
                index.insert(tx.category.as_str(), totals.len());
                totals.push(CategoryActual {
                    category: tx.category.clone(),
                    actual: tx.magnitude(),
                });
            }
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::testing::{budget, expense, expense_on, income};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn actual(category: &str, amount: Decimal) -> CategoryActual {
        CategoryActual {
            category: category.to_string(),
            actual: amount,
        }
    }

    #[test]
    fn test_unbudgeted_spending_sorts_first() {
        let lines = aggregate(
            &[budget("Food", dec!(500), dec!(80))],
            &[actual("Travel", dec!(120))],
        );

        assert_eq!(
            lines,
            vec![
                BudgetVsActualLine {
                    category: "Travel".into(),
                    budget: dec!(0),
                    actual: dec!(120),
                    remaining: dec!(-120),
                    percent_used: dec!(100),
                },
                BudgetVsActualLine {
                    category: "Food".into(),
                    budget: dec!(500),
                    actual: dec!(0),
                    remaining: dec!(500),
                    percent_used: dec!(0),
                },
            ]
        );
    }

    #[test]
    fn test_sorted_by_percent_used_descending() {
        let lines = aggregate(
            &[
                budget("Food", dec!(500), dec!(80)),
                budget("Rent", dec!(1000), dec!(80)),
                budget("Fun", dec!(100), dec!(80)),
            ],
            &[
                actual("Food", dec!(250)),
                actual("Rent", dec!(1000)),
                actual("Fun", dec!(150)),
            ],
        );

        let order: Vec<_> = lines.iter().map(|l| l.category.as_str()).collect();
        assert_eq!(order, ["Fun", "Rent", "Food"]);
        assert_eq!(lines[0].percent_used, dec!(150));
        assert_eq!(lines[0].remaining, dec!(-50));
        assert_eq!(lines[2].percent_used, dec!(50));
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let lines = aggregate(
            &[
                budget("A", dec!(100), dec!(80)),
                budget("B", dec!(200), dec!(80)),
            ],
            &[
                actual("A", dec!(50)),
                actual("B", dec!(100)),
                actual("X", dec!(5)),
                actual("Y", dec!(7)),
            ],
        );

        let order: Vec<_> = lines.iter().map(|l| l.category.as_str()).collect();
        assert_eq!(order, ["X", "Y", "A", "B"]);
    }

    #[test]
    fn test_zero_budget_with_spending_is_zero_percent() {
        let lines = aggregate(
            &[budget("Gifts", dec!(0), dec!(80))],
            &[actual("Gifts", dec!(40))],
        );

        assert_eq!(lines[0].percent_used, dec!(0));
        assert_eq!(lines[0].remaining, dec!(-40));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(aggregate(&[], &[]).is_empty());
    }

    #[test]
    fn test_summarize_groups_expenses_in_period() {
        let period = Period::new(
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap(),
        );
        let outside = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let txs = [
            expense("Food", dec!(-20)),
            expense("Travel", dec!(100)),
            expense("Food", dec!(5)),
            income("Food", dec!(999)),
            expense_on("Food", dec!(1000), outside),
        ];

        let totals = summarize_by_category(&txs, &period, TransactionKind::Expense);

        assert_eq!(
            totals,
            vec![actual("Food", dec!(25)), actual("Travel", dec!(100))]
        );
    }
}
