//! # Range Records
//!
//! A range is a half-open interval `[start, stop)` of token IDs that share
//! one owner, one lock time and one tag.

use serde::{Deserialize, Serialize};
use shared_types::{Identity, Tag, Timestamp, TokenId, UNLOCKED};

/// Stable handle to a range record in the arena.
///
/// The Interval Store and the Owner Index hold handles, never copies of
/// the record, so the two views cannot diverge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RangeId(pub(crate) u32);

/// The authoritative record for one range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeRecord {
    pub owner: Identity,
    /// First token ID (inclusive).
    pub start: TokenId,
    /// One past the last token ID (exclusive).
    pub stop: TokenId,
    /// `0` = unlocked, else the unix time before which the range cannot move.
    pub lock_time: Timestamp,
    pub tag: Tag,
}

impl RangeRecord {
    pub fn len(&self) -> u64 {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.stop <= self.start
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.start <= id && id < self.stop
    }

    /// Whether the range may move at time `now`.
    pub fn is_unlocked_at(&self, now: Timestamp) -> bool {
        self.lock_time == UNLOCKED || self.lock_time <= now
    }

    /// Same owner, lock time and tag: the attributes that decide merging.
    pub fn same_attributes(&self, other: &RangeRecord) -> bool {
        self.owner == other.owner && self.lock_time == other.lock_time && self.tag == other.tag
    }

    pub fn info(&self) -> RangeInfo {
        RangeInfo {
            owner: self.owner,
            start: self.start,
            stop: self.stop,
            lock_time: self.lock_time,
            tag: self.tag.clone(),
        }
    }
}

/// Public view of a range: `(owner, start, stop, lock_time, tag)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeInfo {
    pub owner: Identity,
    pub start: TokenId,
    pub stop: TokenId,
    pub lock_time: Timestamp,
    pub tag: Tag,
}
