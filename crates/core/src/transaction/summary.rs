//! Income and expense summaries.
//!
//! A summary covers a window ending now (the current week, month or year, or
//! everything), groups the transactions in it, and totals income against
//! expenses. Totals are absolute amounts; `kind` alone decides whether a
//! transaction is income or expense.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{Transaction, TransactionKind};
use crate::budget::period::{Period, local_midnight};

/// Window a summary covers when no explicit bounds are given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    /// Since Monday of the current week.
    Week,
    /// Since the first of the current month.
    #[default]
    Month,
    /// Since January 1 of the current year.
    Year,
    /// Every transaction up to now.
    All,
}

impl SummaryPeriod {
    /// Reads the `period` query value; absent or unknown values mean `month`.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("week") => Self::Week,
            Some("year") => Self::Year,
            Some("all") => Self::All,
            _ => Self::Month,
        }
    }
}

/// How summary rows are keyed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// By category.
    #[default]
    Category,
    /// By local calendar day, keyed `YYYY-MM-DD`.
    Date,
    /// By local calendar month, keyed `YYYY-MM`.
    Month,
    /// By transaction kind.
    #[serde(rename = "type")]
    Kind,
}

impl GroupBy {
    /// Reads the `groupBy` query value; absent or unknown values mean
    /// `category`.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("date") => Self::Date,
            Some("month") => Self::Month,
            Some("type") => Self::Kind,
            _ => Self::Category,
        }
    }

    fn key<Tz: TimeZone>(self, tx: &Transaction, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        match self {
            Self::Category => tx.category.clone(),
            Self::Date => tx.date.with_timezone(tz).format("%Y-%m-%d").to_string(),
            Self::Month => tx.date.with_timezone(tz).format("%Y-%m").to_string(),
            Self::Kind => tx.kind.as_str().to_string(),
        }
    }
}

/// Parameters of a summary request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryRequest {
    /// Window used when `start` and `end` are not both given.
    pub period: SummaryPeriod,
    /// Explicit first instant.
    pub start: Option<DateTime<Utc>>,
    /// Explicit last instant.
    pub end: Option<DateTime<Utc>>,
    /// Row key.
    pub group_by: GroupBy,
}

/// One summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryGroup {
    /// Category, day, month or kind.
    pub key: String,
    /// Sum of absolute amounts.
    pub total_amount: Decimal,
    /// Number of transactions.
    pub count: usize,
}

/// Income against expenses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeExpense {
    /// Total income.
    pub income: Decimal,
    /// Total expenses, positive.
    pub expense: Decimal,
    /// Income minus expenses.
    pub balance: Decimal,
}

impl IncomeExpense {
    /// Totals income and expense transactions. Transfers count as neither.
    #[must_use]
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let total = |kind: TransactionKind| -> Decimal {
            transactions
                .iter()
                .filter(|tx| tx.kind == kind)
                .map(Transaction::magnitude)
                .sum()
        };
        let income = total(TransactionKind::Income);
        let expense = total(TransactionKind::Expense);
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

/// A complete summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    /// Rows, largest total first.
    pub summary: Vec<SummaryGroup>,
    /// Income and expense totals for the window.
    pub income_expense: IncomeExpense,
    /// Requested period.
    pub period: SummaryPeriod,
    /// Row key.
    pub group_by: GroupBy,
    /// First instant covered.
    pub start_date: DateTime<Utc>,
    /// Last instant covered.
    pub end_date: DateTime<Utc>,
}

/// Window from the start of `period` on `now`'s local calendar up to `now`.
pub fn resolve_summary_window<Tz: TimeZone>(period: SummaryPeriod, now: &DateTime<Tz>) -> Period {
    let tz = now.timezone();
    let today = now.date_naive();
    let start = match period {
        SummaryPeriod::Week => {
            let back = Days::new(u64::from(today.weekday().num_days_from_monday()));
            local_midnight(&tz, today.checked_sub_days(back).unwrap_or(today))
        }
        SummaryPeriod::Month => local_midnight(&tz, today.with_day(1).unwrap_or(today)),
        SummaryPeriod::Year => {
            let jan_1 = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
            local_midnight(&tz, jan_1)
        }
        SummaryPeriod::All => DateTime::<Utc>::UNIX_EPOCH,
    };
    Period::new(start, now.with_timezone(&Utc))
}

/// Groups `transactions` by `group_by`, largest total first. Ties keep the
/// order in which their key was first seen.
pub fn group_transactions<Tz: TimeZone>(
    transactions: &[Transaction],
    group_by: GroupBy,
    tz: &Tz,
) -> Vec<SummaryGroup>
where
    Tz::Offset: std::fmt::Display,
{
    let mut groups: Vec<SummaryGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for tx in transactions {
        let key = group_by.key(tx, tz);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(SummaryGroup {
                key,
                total_amount: Decimal::ZERO,
                count: 0,
            });
            groups.len() - 1
        });
        groups[slot].total_amount += tx.magnitude();
        groups[slot].count += 1;
    }

    groups.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::testing::{expense_on, income, transaction};
    use chrono::Timelike;
    use chrono_tz::Tz;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[rstest]
    #[case(None, SummaryPeriod::Month)]
    #[case(Some("week"), SummaryPeriod::Week)]
    #[case(Some("YEAR"), SummaryPeriod::Year)]
    #[case(Some("all"), SummaryPeriod::All)]
    #[case(Some("fortnight"), SummaryPeriod::Month)]
    fn test_summary_period_from_query(#[case] raw: Option<&str>, #[case] expected: SummaryPeriod) {
        assert_eq!(SummaryPeriod::from_query(raw), expected);
    }

    #[rstest]
    #[case(None, GroupBy::Category)]
    #[case(Some("date"), GroupBy::Date)]
    #[case(Some("month"), GroupBy::Month)]
    #[case(Some("type"), GroupBy::Kind)]
    #[case(Some("payee"), GroupBy::Category)]
    fn test_group_by_from_query(#[case] raw: Option<&str>, #[case] expected: GroupBy) {
        assert_eq!(GroupBy::from_query(raw), expected);
    }

    // 2024-02-15 is a Thursday.
    #[rstest]
    #[case(SummaryPeriod::Week, at(2024, 2, 12, 0))]
    #[case(SummaryPeriod::Month, at(2024, 2, 1, 0))]
    #[case(SummaryPeriod::Year, at(2024, 1, 1, 0))]
    #[case(SummaryPeriod::All, DateTime::<Utc>::UNIX_EPOCH)]
    fn test_window_runs_from_period_start_to_now(
        #[case] period: SummaryPeriod,
        #[case] start: DateTime<Utc>,
    ) {
        let now = at(2024, 2, 15, 14);

        let window = resolve_summary_window(period, &now);

        assert_eq!(window, Period::new(start, now));
    }

    #[test]
    fn test_week_starting_on_sunday_goes_back_six_days() {
        let sunday = at(2024, 2, 18, 9);

        let window = resolve_summary_window(SummaryPeriod::Week, &sunday);

        assert_eq!(window.start, at(2024, 2, 12, 0));
    }

    #[test]
    fn test_window_uses_local_calendar() {
        let tz: Tz = "Asia/Tokyo".parse().unwrap();
        // Midnight of 2024-03-01 in Tokyo, still February in UTC.
        let now = at(2024, 2, 29, 15).with_timezone(&tz);

        let window = resolve_summary_window(SummaryPeriod::Month, &now);

        assert_eq!(window.start, at(2024, 2, 29, 15));
        assert_eq!(window.start.with_timezone(&tz).hour(), 0);
    }

    #[test]
    fn test_income_expense_follow_kind_not_sign() {
        let txs = vec![
            expense_on("Food", dec!(-40), at(2024, 2, 1, 9)),
            expense_on("Fuel", dec!(60), at(2024, 2, 2, 9)),
            income("Salary", dec!(-1000)),
            transaction("Savings", dec!(500), TransactionKind::Transfer, at(2024, 2, 3, 9)),
        ];

        let totals = IncomeExpense::from_transactions(&txs);

        assert_eq!(totals.income, dec!(1000));
        assert_eq!(totals.expense, dec!(100));
        assert_eq!(totals.balance, dec!(900));
    }

    #[test]
    fn test_group_by_category_sorted_by_total() {
        let txs = vec![
            expense_on("Food", dec!(-40), at(2024, 2, 1, 9)),
            expense_on("Fuel", dec!(60), at(2024, 2, 2, 9)),
            expense_on("Food", dec!(35), at(2024, 2, 3, 9)),
        ];

        let groups = group_transactions(&txs, GroupBy::Category, &Utc);

        let rows: Vec<_> = groups
            .iter()
            .map(|g| (g.key.as_str(), g.total_amount, g.count))
            .collect();
        assert_eq!(rows, [("Food", dec!(75), 2), ("Fuel", dec!(60), 1)]);
    }

    #[test]
    fn test_group_by_date_month_and_kind() {
        let txs = vec![
            expense_on("Food", dec!(10), at(2024, 1, 31, 23)),
            expense_on("Food", dec!(20), at(2024, 2, 1, 8)),
            income("Salary", dec!(5)),
        ];

        let days = group_transactions(&txs, GroupBy::Date, &Utc);
        let keys: Vec<_> = days.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, ["2024-02-01", "2024-01-31", "2024-02-10"]);

        let months = group_transactions(&txs, GroupBy::Month, &Utc);
        let rows: Vec<_> = months.iter().map(|g| (g.key.as_str(), g.count)).collect();
        assert_eq!(rows, [("2024-02", 2), ("2024-01", 1)]);

        let kinds = group_transactions(&txs, GroupBy::Kind, &Utc);
        let rows: Vec<_> = kinds.iter().map(|g| (g.key.as_str(), g.total_amount)).collect();
        assert_eq!(rows, [("expense", dec!(30)), ("income", dec!(5))]);
    }

    #[test]
    fn test_date_keys_use_local_calendar() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let late_evening = expense_on("Food", dec!(10), at(2024, 2, 2, 3));

        let groups = group_transactions(&[late_evening], GroupBy::Date, &tz);

        assert_eq!(groups[0].key, "2024-02-01");
    }
}
