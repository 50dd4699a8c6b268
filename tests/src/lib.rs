//! # Range-Ledger Test Suite
//!
//! Unified test crate.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/ledger_benchmarks.rs   # Criterion benchmarks
//! └── src/integration/
//!     ├── golden.rs                  # Reference ledger traces
//!     ├── investor_limits.rs         # Ledger + investor-limit oracle
//!     ├── hooks.rs                   # Hook attach / veto / detach
//!     ├── persistence.rs             # File snapshots
//!     └── concurrency.rs             # Shared service under contention
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rl-tests
//! cargo test -p rl-tests integration::golden::
//! cargo bench -p rl-tests
//! ```

pub mod integration;
pub mod fixtures;
