//! Budget period resolution.
//!
//! A budget is always evaluated against an inclusive `[start, end]` window.
//! For calendar period types the window is derived from the reference
//! instant `now`, on the local calendar of `now`'s timezone, and returned
//! in UTC. Custom budgets carry their own bounds.

use std::str::FromStr;

use chrono::{
    DateTime, Datelike, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    TimeZone, Utc,
};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::error::BudgetError;

/// How a budget's active period is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// Current calendar month.
    #[default]
    Monthly,
    /// Current calendar quarter (Jan, Apr, Jul, Oct starts).
    Quarterly,
    /// Current calendar year.
    Yearly,
    /// The budget's stored start and end dates.
    Custom,
}

impl PeriodType {
    /// Parses a stored value, treating anything unrecognized as monthly.
    #[must_use]
    pub fn from_stored(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl FromStr for PeriodType {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            "custom" => Ok(Self::Custom),
            _ => Err(BudgetError::InvalidPeriodType(s.to_string())),
        }
    }
}

// Stored documents may predate a period type or carry a bad one; both read
// as monthly rather than failing the whole document.
impl<'de> Deserialize<'de> for PeriodType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Self::Monthly, Self::from_stored))
    }
}

/// Shared reporting window for budget-vs-actual.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// Current calendar month.
    #[default]
    Month,
    /// Current calendar quarter.
    Quarter,
    /// Current calendar year.
    Year,
}

impl ReportPeriod {
    /// Reads the `period` query value; absent or unknown values mean `month`.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("quarter") => Self::Quarter,
            Some("year") => Self::Year,
            _ => Self::Month,
        }
    }

    /// Number of calendar months the window spans.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::Month => 1,
            Self::Quarter => 3,
            Self::Year => 12,
        }
    }

    /// Zero-based index of the first month of the window containing `month0`.
    #[must_use]
    pub const fn first_month0(self, month0: u32) -> u32 {
        match self {
            Self::Month => month0,
            Self::Quarter => month0 / 3 * 3,
            Self::Year => 0,
        }
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        })
    }
}

/// An inclusive window of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// First instant of the window.
    pub start: DateTime<Utc>,
    /// Last instant of the window.
    pub end: DateTime<Utc>,
}

impl Period {
    /// Creates a window from explicit bounds.
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Returns true if `instant` lies within the window, bounds included.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Resolves the active period of a budget.
///
/// `custom_start` and `custom_end` are only consulted for
/// [`PeriodType::Custom`]; a custom budget missing either bound is evaluated
/// as monthly.
pub fn resolve_period<Tz: TimeZone>(
    period_type: PeriodType,
    now: &DateTime<Tz>,
    custom_start: Option<DateTime<Utc>>,
    custom_end: Option<DateTime<Utc>>,
) -> Period {
    match period_type {
        PeriodType::Monthly => calendar_window(ReportPeriod::Month, now),
        PeriodType::Quarterly => calendar_window(ReportPeriod::Quarter, now),
        PeriodType::Yearly => calendar_window(ReportPeriod::Year, now),
        PeriodType::Custom => match (custom_start, custom_end) {
            (Some(start), Some(end)) => Period::new(start, end),
            _ => {
                warn!(
                    has_start = custom_start.is_some(),
                    has_end = custom_end.is_some(),
                    "custom budget without both bounds, using monthly period"
                );
                calendar_window(ReportPeriod::Month, now)
            }
        },
    }
}

/// Resolves the shared window for a budget-vs-actual report.
pub fn resolve_report_period<Tz: TimeZone>(selector: ReportPeriod, now: &DateTime<Tz>) -> Period {
    calendar_window(selector, now)
}

/// Month, quarter, or year containing `now`, on `now`'s local calendar.
///
/// The end is one millisecond before the next window starts, i.e. 23:59:59.999
/// on the last local day.
fn calendar_window<Tz: TimeZone>(span: ReportPeriod, now: &DateTime<Tz>) -> Period {
    let tz = now.timezone();
    let today = now.date_naive();

    let first_month = span.first_month0(today.month0()) + 1;
    let start_date = NaiveDate::from_ymd_opt(today.year(), first_month, 1).unwrap_or(today);
    let next_start = start_date
        .checked_add_months(Months::new(span.months()))
        .unwrap_or(NaiveDate::MAX);

    Period {
        start: local_midnight(&tz, start_date),
        end: local_midnight(&tz, next_start) - TimeDelta::milliseconds(1),
    }
}

pub(crate) fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => first_instant_after_gap(tz, naive),
    }
}

/// Midnight skipped by a DST jump: the window starts where local time resumes.
fn first_instant_after_gap<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    (1..=24 * 60)
        .map(|minutes| naive + TimeDelta::minutes(minutes))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
        .map_or_else(|| naive.and_utc(), |dt| dt.with_timezone(&Utc))
}
