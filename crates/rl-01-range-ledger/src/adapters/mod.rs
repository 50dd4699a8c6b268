//! Adapters layer for the Range Ledger subsystem.
//!
//! Concrete clock and snapshot storage implementations.

pub mod clock;
pub mod storage;

pub use clock::ManualClock;
pub use storage::{FileSnapshotStore, InMemorySnapshotStore};
