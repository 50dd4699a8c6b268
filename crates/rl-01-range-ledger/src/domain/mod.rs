//! # Domain Layer - Range Ledger
//!
//! Pure ledger logic. No I/O, no clocks, no locks.
//!
//! ## Components
//!
//! - `range`: RangeRecord, RangeId handles, RangeInfo view
//! - `arena`: slot storage for range records
//! - `interval_store`: start-keyed partition of the token space, merging
//! - `owner_index`: per-owner handle lists in creation order
//! - `ledger`: mint, transfer and re-tag algorithms, invariant checks
//! - `gate`: compliance check with commit/revert tickets
//! - `hooks`: before/after mutation interceptors
//! - `snapshot`: persisted state format

pub mod arena;
pub mod gate;
pub mod hooks;
pub mod interval_store;
pub mod ledger;
pub mod owner_index;
pub mod range;
pub mod snapshot;

pub use arena::RangeArena;
pub use gate::{ComplianceGate, ComplianceTicket};
pub use hooks::{HookPipeline, HookRejection, LedgerHook, MutationEvent, Party};
pub use interval_store::{IntervalStore, Merge};
pub use ledger::{
    InvariantViolation, MintPlan, MintReceipt, RangeLedger, TransferPlan, TransferReceipt,
    DEFAULT_MAX_TAG_LEN,
};
pub use owner_index::OwnerIndex;
pub use range::{RangeId, RangeInfo, RangeRecord};
pub use snapshot::{LedgerSnapshot, SnapshotRange, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
