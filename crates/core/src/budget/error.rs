//! Budget error types.

use tally_shared::AppError;
use tally_shared::types::BudgetId;
use thiserror::Error;

use crate::store::StoreError;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Budget not found for the requesting user.
    #[error("No budget found with id {0}")]
    NotFound(BudgetId),

    /// No budget for this category for the requesting user.
    #[error("No budget found for category {0}")]
    CategoryNotFound(String),

    /// The user already has a budget for this category.
    #[error("Budget for category {0} already exists")]
    DuplicateCategory(String),

    /// A required field was missing or blank.
    #[error("Please provide a {0}")]
    MissingField(&'static str),

    /// Amount cannot be negative.
    #[error("Budget amount cannot be negative")]
    NegativeAmount,

    /// Threshold outside 0..=100.
    #[error("Threshold must be between 0 and 100")]
    InvalidThreshold,

    /// Unrecognized period type in an input.
    #[error("Invalid period type: {0}")]
    InvalidPeriodType(String),

    /// Custom window whose start is after its end.
    #[error("Budget start date must not be after its end date")]
    InvertedWindow,

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::NotFound(_) | BudgetError::CategoryNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            BudgetError::DuplicateCategory(_)
            | BudgetError::MissingField(_)
            | BudgetError::NegativeAmount
            | BudgetError::InvalidThreshold
            | BudgetError::InvalidPeriodType(_)
            | BudgetError::InvertedWindow => Self::BadRequest(err.to_string()),
            BudgetError::Store(store) => store.into(),
        }
    }
}
