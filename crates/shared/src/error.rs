//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Module-level errors convert into this taxonomy before they reach the
/// HTTP boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid identity.
    #[error("Authentication failed: {0}")]
    Unauthenticated(String),

    /// Resource not found for the requesting user.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing required field, invalid enum value, or rule violation.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Storage layer failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// External service error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated(_) => 401,
            Self::NotFound(_) => 404,
            Self::BadRequest(_) => 400,
            Self::Storage(_) | Self::ExternalService(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
