//! # Ledger Snapshots
//!
//! Portable image of the full ledger state.
//!
//! ## Wire Format
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────────┐
//! │ magic (8 B)  │ bincode(LedgerSnapshot)              │
//! │ "RLEDGER\x01"│ version, total_supply, ranges, owners│
//! └──────────────┴──────────────────────────────────────┘
//! ```
//!
//! `owners` records each holder's list in Owner Index order, which is not
//! derivable from the ranges alone.

use crate::error::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use shared_types::{Identity, Tag, Timestamp, TokenId};

/// Leading bytes of every encoded snapshot.
pub const SNAPSHOT_MAGIC: [u8; 8] = *b"RLEDGER\x01";

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRange {
    pub owner: Identity,
    pub start: TokenId,
    pub stop: TokenId,
    pub lock_time: Timestamp,
    pub tag: Tag,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: u32,
    pub total_supply: u64,
    /// Every range, ascending by start.
    pub ranges: Vec<SnapshotRange>,
    /// Each owner's range starts in list order, owners sorted by identity.
    pub owners: Vec<(Identity, Vec<TokenId>)>,
}

impl LedgerSnapshot {
    /// Serialize with the magic header.
    pub fn encode(&self) -> LedgerResult<Vec<u8>> {
        let body = bincode::serialize(self).map_err(|e| LedgerError::Storage {
            reason: format!("snapshot encoding failed: {}", e),
        })?;
        let mut bytes = Vec::with_capacity(SNAPSHOT_MAGIC.len() + body.len());
        bytes.extend_from_slice(&SNAPSHOT_MAGIC);
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    pub fn decode(bytes: &[u8]) -> LedgerResult<Self> {
        let body = bytes
            .strip_prefix(&SNAPSHOT_MAGIC[..])
            .ok_or_else(|| LedgerError::CorruptSnapshot {
                reason: "missing snapshot header".to_string(),
            })?;
        let snapshot: Self = bincode::deserialize(body).map_err(|e| LedgerError::CorruptSnapshot {
            reason: e.to_string(),
        })?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LedgerError::CorruptSnapshot {
                reason: format!("unsupported version {}", snapshot.version),
            });
        }
        Ok(snapshot)
    }
}
