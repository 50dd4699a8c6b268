//! # Range Ledger Subsystem
//!
//! **Subsystem ID:** 1
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Tracks ownership of a fungible-but-identifiable token supply as
//! contiguous ranges of token IDs. Every range carries an owner, a lock time
//! and a tag; transfers move whole ranges or split them, and every transfer
//! is vetted by a compliance oracle before anything changes.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Ranges partition `[1, total_supply]` | `domain/ledger.rs` - `split_at()`, `apply_*()` |
//! | No adjacent ranges with identical attributes | `domain/interval_store.rs` - `try_merge()` |
//! | Owner Index lists exactly the owner's ranges | `domain/ledger.rs` - `merge_at()` |
//! | Failed operations change nothing | `domain/ledger.rs` - `plan_*()` validate first |
//! | Compliance recording matches the ledger | `service.rs` - ticket commit / revert |
//!
//! `RangeLedger::check_invariants` verifies all of them.
//!
//! ## Transfer Algorithm
//!
//! ```text
//! sender's ranges (sorted by start)
//!   [1,2001) free   [2001,6001) locked   [6001,10001) free
//!        │                                    │
//!        └── take all ──────────┐    ┌── take 2000 (prefix) ──┘
//!                               ▼    ▼
//!   receiver gets [1,2001) and [6001,8001); sender keeps [8001,10001), [2001,6001)
//! ```
//!
//! ## Outbound Dependencies
//!
//! | Port | Trait | Purpose |
//! |------|-------|---------|
//! | Compliance Oracle | `shared_types::ComplianceOracle` | Investor limit checks |
//! | Clock | `TimeSource` | Lock-time evaluation |
//! | Persistence | `SnapshotStore` | Snapshot storage |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/ - ManualClock, in-memory and file snapshot stores    │
//! │  service.rs - LedgerService (locking, hooks, compliance)        │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - RangeLedgerApi trait                       │
//! │  ports/outbound.rs - TimeSource, SnapshotStore traits           │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/arena.rs, range.rs   - RangeRecord storage              │
//! │  domain/interval_store.rs    - start-keyed partition, merging   │
//! │  domain/owner_index.rs       - per-owner handle lists           │
//! │  domain/ledger.rs            - mint / transfer / re-tag         │
//! │  domain/gate.rs, hooks.rs    - compliance ticket, interceptors  │
//! │  domain/snapshot.rs          - persisted state format           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod telemetry;

pub use adapters::*;
pub use config::{ConfigError, LedgerConfig};
pub use domain::*;
pub use error::{LedgerError, LedgerResult};
pub use ports::*;
pub use service::LedgerService;
pub use telemetry::init_tracing;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
