//! Transaction error types.

use tally_shared::AppError;
use tally_shared::types::TransactionId;
use thiserror::Error;

use crate::store::StoreError;

/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 100;

/// Transaction-related errors.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Transaction not found for the requesting user.
    #[error("No transaction found with id {0}")]
    NotFound(TransactionId),

    /// A required field was missing or blank.
    #[error("Please provide a {0}")]
    MissingField(&'static str),

    /// Description longer than [`MAX_DESCRIPTION_LEN`].
    #[error("Description cannot be more than 100 characters")]
    DescriptionTooLong,

    /// Explicit summary bounds whose start is after their end.
    #[error("Start date must not be after end date")]
    InvertedRange,

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NotFound(_) => Self::NotFound(err.to_string()),
            TransactionError::MissingField(_)
            | TransactionError::DescriptionTooLong
            | TransactionError::InvertedRange => Self::BadRequest(err.to_string()),
            TransactionError::Store(store) => store.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let app: AppError = TransactionError::DescriptionTooLong.into();
        assert_eq!(app.status_code(), 400);
        assert!(app.to_string().ends_with("Description cannot be more than 100 characters"));

        let app: AppError = TransactionError::MissingField("description").into();
        assert_eq!(app.error_code(), "BAD_REQUEST");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let id = TransactionId::new();
        let app: AppError = TransactionError::NotFound(id).into();
        assert_eq!(app.status_code(), 404);
        assert!(app.to_string().contains(&id.to_string()));

        let app: AppError = TransactionError::InvertedRange.into();
        assert_eq!(app.status_code(), 400);
    }

    #[test]
    fn test_store_maps_to_500() {
        let app: AppError = TransactionError::Store(StoreError::Unavailable("down".into())).into();
        assert_eq!(app.status_code(), 500);
    }
}
