//! # Interval Store
//!
//! Authoritative mapping from range start to range handle.
//!
//! ## Partition Invariant
//!
//! Ranges are pairwise non-overlapping and contiguous, their union is exactly
//! `[1, total_supply]`, and no two adjacent ranges share identical
//! `(owner, lock_time, tag)`. The store provides the lookups and the merge;
//! the ledger is responsible for only inserting ranges that keep the
//! partition intact.

use super::arena::RangeArena;
use super::range::RangeId;
use crate::error::{LedgerError, LedgerResult};
use shared_types::TokenId;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

/// Result of a merge attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Merge {
    /// The record that now covers the merged span. Always the leftmost one.
    pub survivor: RangeId,
    /// Records folded into the survivor and released from the arena.
    pub absorbed: Vec<RangeId>,
}

impl Merge {
    pub fn is_noop(&self) -> bool {
        self.absorbed.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct IntervalStore {
    by_start: BTreeMap<TokenId, RangeId>,
    total_supply: u64,
}

impl IntervalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    pub(crate) fn set_total_supply(&mut self, total_supply: u64) {
        self.total_supply = total_supply;
    }

    /// Number of ranges.
    pub fn len(&self) -> usize {
        self.by_start.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_start.is_empty()
    }

    /// The range containing token `id`.
    pub fn point_query(&self, id: TokenId) -> LedgerResult<RangeId> {
        if id == 0 || id > self.total_supply {
            return Err(LedgerError::OutOfBounds {
                id,
                total_supply: self.total_supply,
            });
        }
        self.by_start
            .range(..=id)
            .next_back()
            .map(|(_, range)| *range)
            .ok_or(LedgerError::OutOfBounds {
                id,
                total_supply: self.total_supply,
            })
    }

    /// The range beginning exactly at `start`.
    pub fn starting_at(&self, start: TokenId) -> Option<RangeId> {
        self.by_start.get(&start).copied()
    }

    pub fn insert(&mut self, start: TokenId, range: RangeId) {
        self.by_start.insert(start, range);
    }

    /// Delete the entry beginning at `start`.
    pub fn remove(&mut self, start: TokenId) -> Option<RangeId> {
        self.by_start.remove(&start)
    }

    /// Move the entry for a range whose start changed.
    pub(crate) fn rekey(&mut self, old_start: TokenId, new_start: TokenId) {
        if let Some(range) = self.by_start.remove(&old_start) {
            self.by_start.insert(new_start, range);
        }
    }

    /// The ranges immediately before and after the one starting at `start`.
    pub fn neighbors(&self, start: TokenId) -> (Option<RangeId>, Option<RangeId>) {
        let prev = self.by_start.range(..start).next_back().map(|(_, r)| *r);
        let next = self
            .by_start
            .range((Excluded(start), Unbounded))
            .next()
            .map(|(_, r)| *r);
        (prev, next)
    }

    /// The range ending at `total_supply + 1`.
    pub fn tail(&self) -> Option<RangeId> {
        self.by_start.values().next_back().copied()
    }

    /// Ranges whose start lies in `[start, stop)`, ascending.
    pub fn starting_within(&self, start: TokenId, stop: TokenId) -> Vec<RangeId> {
        self.by_start.range(start..stop).map(|(_, r)| *r).collect()
    }

    /// All `(start, handle)` pairs, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, RangeId)> + '_ {
        self.by_start.iter().map(|(start, range)| (*start, *range))
    }

    /// Fold `range` into its neighbours where they are contiguous and share
    /// `(owner, lock_time, tag)`.
    ///
    /// Both sides may merge in one call, and the survivor keeps absorbing
    /// following ranges until the next one differs. The leftmost record
    /// survives; absorbed records are removed from the store and released
    /// from the arena. Calling again on an unmergeable boundary is a no-op.
    pub fn try_merge(&mut self, arena: &mut RangeArena, range: RangeId) -> Merge {
        let mut merge = Merge {
            survivor: range,
            absorbed: Vec::new(),
        };
        let Some(start) = arena.get(range).map(|r| r.start) else {
            return merge;
        };
        let (prev, next) = self.neighbors(start);

        if let Some(prev) = prev {
            if Self::mergeable(arena, prev, range) {
                self.absorb(arena, prev, range);
                merge.survivor = prev;
                merge.absorbed.push(range);
            }
        }

        let mut next = next;
        while let Some(right) = next {
            if !Self::mergeable(arena, merge.survivor, right) {
                break;
            }
            let stop = arena.get(right).map(|r| r.stop);
            self.absorb(arena, merge.survivor, right);
            merge.absorbed.push(right);
            next = stop.and_then(|stop| self.starting_at(stop));
        }

        merge
    }

    fn mergeable(arena: &RangeArena, left: RangeId, right: RangeId) -> bool {
        match (arena.get(left), arena.get(right)) {
            (Some(l), Some(r)) => l.stop == r.start && l.same_attributes(r),
            _ => false,
        }
    }

    /// Extend `left` over `right` and drop `right`.
    fn absorb(&mut self, arena: &mut RangeArena, left: RangeId, right: RangeId) {
        if let Some(absorbed) = arena.release(right) {
            self.by_start.remove(&absorbed.start);
            if let Some(survivor) = arena.get_mut(left) {
                survivor.stop = absorbed.stop;
            }
        }
    }
}
