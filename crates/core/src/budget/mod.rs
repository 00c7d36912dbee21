//! Budget periods, progress and budget-vs-actual reporting.

pub mod aggregate;
pub mod error;
pub mod period;
pub mod progress;
pub mod service;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

pub use aggregate::{aggregate, summarize_by_category};
pub use error::BudgetError;
pub use period::{Period, PeriodType, ReportPeriod, resolve_period, resolve_report_period};
pub use progress::{classify, compute_progress};
pub use service::BudgetService;
pub use types::{
    Budget, BudgetStatus, BudgetVsActualLine, BudgetVsActualReport, BudgetWithProgress,
    CategoryActual, CreateBudgetInput, DEFAULT_THRESHOLD, Notifications, Progress,
    UpdateBudgetInput,
};
