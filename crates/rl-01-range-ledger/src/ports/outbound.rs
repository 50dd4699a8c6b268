//! Outbound (Driven) ports for the Range Ledger subsystem.
//!
//! The compliance oracle port lives in `shared-types::compliance` because
//! oracle implementations are built outside this crate.

use crate::error::LedgerResult;
use shared_types::Timestamp;

/// Time source for lock-time evaluation.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Returns the current unix time in seconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Durable storage for encoded ledger snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Replace the stored snapshot.
    fn save(&self, bytes: &[u8]) -> LedgerResult<()>;

    /// The stored snapshot, if any.
    fn load(&self) -> LedgerResult<Option<Vec<u8>>>;
}
