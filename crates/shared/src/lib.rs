//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Currency codes
//! - Typed IDs for type-safe entity references
//! - A clock abstraction so "now" can be injected
//! - Application-wide error types
//! - Configuration management

pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
