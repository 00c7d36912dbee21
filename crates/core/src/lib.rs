//! Core budget logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Storage is reached through the traits in [`store`].
//!
//! # Modules
//!
//! - `budget` - Period resolution, progress, budget-vs-actual, budget service
//! - `currency` - Exchange rate cache and conversion
//! - `store` - Storage seams
//! - `transaction` - Transaction recording, listing, updates and summaries

pub mod budget;
pub mod currency;
pub mod store;
pub mod transaction;
