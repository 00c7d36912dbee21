//! Document storage for Tally.
//!
//! [`MemoryStore`] implements the storage traits of `tally-core` over
//! in-memory collections and can be seeded from, or dumped to, a JSON
//! [`Snapshot`].

pub mod memory;
pub mod snapshot;

pub use memory::MemoryStore;
pub use snapshot::{Snapshot, SnapshotError};
