//! Property-based tests for budget module.

use chrono::{Datelike, NaiveDate, TimeDelta, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::aggregate::aggregate;
use super::period::{PeriodType, ReportPeriod, resolve_period, resolve_report_period};
use super::progress::compute_progress;
use super::testing::{budget, expense};
use super::types::{BudgetStatus, CategoryActual};

fn any_instant() -> impl Strategy<Value = chrono::DateTime<Utc>> {
    // 2000-01-01 .. 2100-01-01
    (946_684_800i64..4_102_444_800).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.unwrap().pred_opt().unwrap().day()
}

proptest! {
    /// The monthly window runs from day 1 to the last day of now's month,
    /// and contains now.
    #[test]
    fn test_monthly_window_covers_whole_month(now in any_instant()) {
        let period = resolve_period(PeriodType::Monthly, &now, None, None);

        prop_assert_eq!(period.start.day(), 1);
        prop_assert_eq!(period.start.month(), now.month());
        prop_assert_eq!(period.end.day(), last_day_of_month(now.year(), now.month()));
        prop_assert_eq!(period.end.month(), now.month());
        prop_assert_eq!(
            period.end + TimeDelta::milliseconds(1),
            Utc.with_ymd_and_hms(
                if now.month() == 12 { now.year() + 1 } else { now.year() },
                now.month() % 12 + 1,
                1, 0, 0, 0,
            ).unwrap()
        );
        prop_assert!(period.contains(now));
    }

    /// Quarters start in January, April, July or October and span three months.
    #[test]
    fn test_quarter_boundaries(now in any_instant()) {
        let period = resolve_period(PeriodType::Quarterly, &now, None, None);

        prop_assert_eq!(period.start.month0() % 3, 0);
        prop_assert_eq!(period.start.month0(), now.month0() / 3 * 3);
        prop_assert_eq!(period.end.month0(), period.start.month0() + 2);
        prop_assert_eq!(period.start.year(), period.end.year());
        prop_assert!(period.contains(now));
    }

    /// Year windows are Jan 1 .. Dec 31 of now's year.
    #[test]
    fn test_year_window(now in any_instant()) {
        let period = resolve_report_period(ReportPeriod::Year, &now);

        prop_assert_eq!((period.start.month(), period.start.day()), (1, 1));
        prop_assert_eq!((period.end.month(), period.end.day()), (12, 31));
        prop_assert_eq!(period.start.year(), now.year());
        prop_assert_eq!(period.end.year(), now.year());
    }

    /// A zero budget always reports zero percent, whatever was spent.
    #[test]
    fn test_zero_budget_never_divides(spent in proptest::collection::vec(-10_000i64..10_000, 0..20)) {
        let zero = budget("Food", Decimal::ZERO, dec!(80));
        let txs: Vec<_> = spent.iter().map(|&a| expense("Food", Decimal::from(a))).collect();

        let progress = compute_progress(&zero, &txs);

        prop_assert_eq!(progress.percent_spent, Decimal::ZERO);
        prop_assert_eq!(progress.remaining, -progress.spent);
    }

    /// spent + remaining always equals the budget amount, and the status
    /// agrees with the percentage.
    #[test]
    fn test_progress_is_consistent(
        amount in 1i64..1_000_000,
        threshold in 0i64..=100,
        spent in proptest::collection::vec(0i64..100_000, 0..20),
    ) {
        let food = budget("Food", Decimal::from(amount), Decimal::from(threshold));
        let txs: Vec<_> = spent.iter().map(|&a| expense("Food", Decimal::from(a))).collect();

        let progress = compute_progress(&food, &txs);

        prop_assert_eq!(progress.spent + progress.remaining, food.amount);
        let expected = if progress.percent_spent >= dec!(100) {
            BudgetStatus::Exceeded
        } else if progress.percent_spent >= Decimal::from(threshold) {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Ok
        };
        prop_assert_eq!(progress.status, expected);
        prop_assert_eq!(compute_progress(&food, &txs), progress);
    }

    /// Report rows come out sorted by percent used, every budget and every
    /// category with spending appears once, and unbudgeted rows sit at 100%.
    #[test]
    fn test_aggregate_sorted_and_complete(
        budgeted in proptest::collection::btree_map(0u8..8, 0i64..10_000, 0..8),
        spent in proptest::collection::btree_map(0u8..8, 1i64..10_000, 0..8),
    ) {
        let budgets: Vec<_> = budgeted
            .iter()
            .map(|(c, a)| budget(&format!("c{c}"), Decimal::from(*a), dec!(80)))
            .collect();
        let actuals: Vec<_> = spent
            .iter()
            .map(|(c, a)| CategoryActual { category: format!("c{c}"), actual: Decimal::from(*a) })
            .collect();

        let lines = aggregate(&budgets, &actuals);

        let keys: std::collections::BTreeSet<_> = budgeted.keys().chain(spent.keys()).collect();
        prop_assert_eq!(lines.len(), keys.len());
        prop_assert!(lines.windows(2).all(|w| w[0].percent_used >= w[1].percent_used));
        for line in &lines {
            prop_assert_eq!(line.remaining, line.budget - line.actual);
            let key: u8 = line.category[1..].parse().unwrap();
            if !budgeted.contains_key(&key) {
                prop_assert_eq!(line.budget, Decimal::ZERO);
                prop_assert_eq!(line.percent_used, dec!(100));
            }
        }
    }
}
