//! # Range Ledger
//!
//! Mint, transfer and re-tag algorithms over the Interval Store and the
//! Owner Index.
//!
//! ## Staged Apply
//!
//! Mint and transfer are split into `plan_*` (all validation, no mutation)
//! and `apply_*` (mutation that cannot fail). The service runs the
//! compliance gate and pre-hooks between the two, so every failing path is
//! decided before the first structural change. A plan is only valid against
//! the exact state it was computed from.
//!
//! ## Owner Index Order
//!
//! | Operation | Effect on list order |
//! |-----------|----------------------|
//! | mint (new range) | appended to owner's tail |
//! | mint (extends tail) | unchanged |
//! | split at `p` | left part keeps its position, right part appended |
//! | transfer (whole range) | removed from sender, appended to receiver |
//! | transfer (prefix) | remainder keeps sender position, prefix appended to receiver |
//! | merge | leftmost record keeps its position, absorbed records removed |

use super::arena::RangeArena;
use super::gate::ComplianceGate;
use super::interval_store::IntervalStore;
use super::owner_index::OwnerIndex;
use super::range::{RangeId, RangeInfo, RangeRecord};
use super::hooks::{MutationEvent, Party};
use super::snapshot::{LedgerSnapshot, SnapshotRange, SNAPSHOT_VERSION};
use crate::error::{LedgerError, LedgerResult};
use shared_types::{ComplianceOracle, Identity, Tag, Timestamp, TokenId, TransferCheck, UNLOCKED};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Default maximum tag length in bytes.
pub const DEFAULT_MAX_TAG_LEN: usize = 32;

/// A broken ledger invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantViolation(pub String);

/// Validated mint, ready to apply.
#[derive(Clone, Debug)]
pub struct MintPlan {
    owner: Identity,
    amount: u64,
    lock_time: Timestamp,
    tag: Tag,
    old_supply: u64,
    extends: Option<RangeId>,
}

impl MintPlan {
    pub fn event(&self) -> MutationEvent {
        MutationEvent::Minted {
            owner: Party::new(self.owner),
            amount: self.amount,
            old_supply: self.old_supply,
            new_supply: self.old_supply + self.amount,
        }
    }
}

/// Outcome of a mint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintReceipt {
    pub start: TokenId,
    pub stop: TokenId,
    /// True when the tail range was extended instead of creating a new one.
    pub extended: bool,
}

#[derive(Clone, Copy, Debug)]
struct Slice {
    range: RangeId,
    take: u64,
}

/// Validated transfer, ready for the compliance gate and then apply.
#[derive(Clone, Debug)]
pub struct TransferPlan {
    check: TransferCheck,
    slices: Vec<Slice>,
}

impl TransferPlan {
    pub fn check(&self) -> &TransferCheck {
        &self.check
    }

    pub fn event(&self) -> MutationEvent {
        MutationEvent::Transferred {
            from: Party::new(self.check.from),
            to: Party::new(self.check.to),
            amount: self.check.amount,
        }
    }

    /// The event a dry run of this transfer reports.
    pub fn check_event(&self) -> MutationEvent {
        MutationEvent::Checked {
            from: Party::new(self.check.from),
            to: Party::new(self.check.to),
            amount: self.check.amount,
        }
    }
}

/// Outcome of a transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferReceipt {
    pub from: Identity,
    pub to: Identity,
    pub amount: u64,
    /// Spans that changed hands, in the order they were consumed.
    pub moved: Vec<(TokenId, TokenId)>,
}

/// The ledger state: arena, Interval Store and Owner Index, always mutated
/// together.
#[derive(Clone, Debug)]
pub struct RangeLedger {
    arena: RangeArena,
    intervals: IntervalStore,
    owners: OwnerIndex,
    max_tag_len: usize,
}

impl Default for RangeLedger {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TAG_LEN)
    }
}

impl RangeLedger {
    pub fn new(max_tag_len: usize) -> Self {
        Self {
            arena: RangeArena::new(),
            intervals: IntervalStore::new(),
            owners: OwnerIndex::new(),
            max_tag_len,
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn total_supply(&self) -> u64 {
        self.intervals.total_supply()
    }

    /// The range containing token `pointer`.
    pub fn get_range(&self, pointer: TokenId) -> LedgerResult<RangeInfo> {
        let id = self.intervals.point_query(pointer)?;
        Ok(self.record(id)?.info())
    }

    /// `owner`'s ranges in creation order.
    pub fn ranges_of(&self, owner: &Identity) -> Vec<(TokenId, TokenId)> {
        self.owners.list_of(owner, &self.arena)
    }

    pub fn balance_of(&self, owner: &Identity) -> u64 {
        self.owners
            .handles(owner)
            .iter()
            .filter_map(|id| self.arena.get(*id))
            .map(RangeRecord::len)
            .sum()
    }

    /// Every range, ascending by start.
    pub fn ranges(&self) -> Vec<RangeInfo> {
        self.intervals
            .iter()
            .filter_map(|(_, id)| self.arena.get(id))
            .map(RangeRecord::info)
            .collect()
    }

    pub fn range_count(&self) -> usize {
        self.intervals.len()
    }

    // =========================================================================
    // MINT
    // =========================================================================

    pub fn plan_mint(
        &self,
        owner: Identity,
        amount: u64,
        lock_time: Timestamp,
        tag: Tag,
    ) -> LedgerResult<MintPlan> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        self.check_tag(&tag)?;

        let old_supply = self.total_supply();
        // The exclusive stop `new_supply + 1` must be representable too.
        old_supply
            .checked_add(amount)
            .and_then(|new_supply| new_supply.checked_add(1))
            .ok_or(LedgerError::SupplyOverflow {
                amount,
                total_supply: old_supply,
            })?;

        let extends = self.intervals.tail().filter(|id| {
            self.arena.get(*id).is_some_and(|tail| {
                tail.owner == owner && tail.lock_time == lock_time && tail.tag == tag
            })
        });

        Ok(MintPlan {
            owner,
            amount,
            lock_time,
            tag,
            old_supply,
            extends,
        })
    }

    pub fn apply_mint(&mut self, plan: MintPlan) -> MintReceipt {
        let start = plan.old_supply + 1;
        let stop = start + plan.amount;

        let extended = match plan.extends.and_then(|id| self.arena.get_mut(id)) {
            Some(tail) => {
                tail.stop = stop;
                true
            }
            None => {
                let id = self.arena.alloc(RangeRecord {
                    owner: plan.owner,
                    start,
                    stop,
                    lock_time: plan.lock_time,
                    tag: plan.tag,
                });
                self.intervals.insert(start, id);
                self.owners.append(plan.owner, id);
                false
            }
        };
        self.intervals.set_total_supply(stop - 1);

        debug!(
            "[rl-01] Minted [{}, {}) to {} (extended: {})",
            start, stop, plan.owner, extended
        );
        MintReceipt {
            start,
            stop,
            extended,
        }
    }

    /// Validate and apply a mint in one step.
    pub fn mint(
        &mut self,
        owner: Identity,
        amount: u64,
        lock_time: Timestamp,
        tag: Tag,
    ) -> LedgerResult<MintReceipt> {
        let plan = self.plan_mint(owner, amount, lock_time, tag)?;
        Ok(self.apply_mint(plan))
    }

    // =========================================================================
    // TRANSFER
    // =========================================================================

    /// Select the tokens `from` would send, lowest start first, skipping
    /// ranges still locked at `now`.
    pub fn plan_transfer(
        &self,
        from: Identity,
        to: Identity,
        amount: u64,
        now: Timestamp,
    ) -> LedgerResult<TransferPlan> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if from == to {
            return Err(LedgerError::SelfTransfer);
        }

        let mut held: Vec<(RangeId, &RangeRecord)> = self
            .owners
            .handles(&from)
            .iter()
            .filter_map(|id| self.arena.get(*id).map(|r| (*id, r)))
            .collect();
        held.sort_by_key(|(_, r)| r.start);

        let mut balance = 0u64;
        let mut unlocked = 0u64;
        let mut allocated = 0u64;
        let mut slices = Vec::new();
        for (id, record) in held {
            balance += record.len();
            if !record.is_unlocked_at(now) {
                continue;
            }
            unlocked += record.len();
            if allocated < amount {
                let take = record.len().min(amount - allocated);
                slices.push(Slice { range: id, take });
                allocated += take;
            }
        }

        if allocated < amount {
            if balance < amount {
                return Err(LedgerError::InsufficientBalance {
                    required: amount,
                    available: balance,
                });
            }
            return Err(LedgerError::TimeLocked {
                required: amount,
                unlocked,
            });
        }

        Ok(TransferPlan {
            check: TransferCheck {
                from,
                to,
                amount,
                from_balance: balance,
                to_balance: self.balance_of(&to),
            },
            slices,
        })
    }

    /// Move the planned tokens. The received fragments are unlocked: only
    /// ranges whose lock had expired were selected.
    pub fn apply_transfer(&mut self, plan: TransferPlan) -> TransferReceipt {
        let TransferCheck {
            from, to, amount, ..
        } = plan.check;
        let mut moved = Vec::with_capacity(plan.slices.len());

        for slice in plan.slices {
            let Some(record) = self.arena.get(slice.range) else {
                continue;
            };
            let (start, stop) = (record.start, record.stop);

            if slice.take >= stop - start {
                self.owners.remove(&from, slice.range);
                if let Some(record) = self.arena.get_mut(slice.range) {
                    record.owner = to;
                    record.lock_time = UNLOCKED;
                }
                self.owners.append(to, slice.range);
                moved.push((start, stop));
                self.merge_at(slice.range);
            } else {
                let at = start + slice.take;
                let tag = record.tag.clone();
                if let Some(remainder) = self.arena.get_mut(slice.range) {
                    remainder.start = at;
                }
                self.intervals.rekey(start, at);

                let fragment = self.arena.alloc(RangeRecord {
                    owner: to,
                    start,
                    stop: at,
                    lock_time: UNLOCKED,
                    tag,
                });
                self.intervals.insert(start, fragment);
                self.owners.append(to, fragment);
                moved.push((start, at));
                self.merge_at(fragment);
            }
        }

        debug!(
            "[rl-01] Transferred {} tokens {} -> {} in {} span(s)",
            amount,
            from,
            to,
            moved.len()
        );
        TransferReceipt {
            from,
            to,
            amount,
            moved,
        }
    }

    /// Plan, gate and apply a transfer in one step.
    pub fn transfer<O: ComplianceOracle + ?Sized>(
        &mut self,
        from: Identity,
        to: Identity,
        amount: u64,
        now: Timestamp,
        gate: &ComplianceGate<O>,
    ) -> LedgerResult<TransferReceipt> {
        let plan = self.plan_transfer(from, to, amount, now)?;
        let ticket = gate.check_and_record(plan.check().clone())?;
        let receipt = self.apply_transfer(plan);
        gate.commit(ticket);
        Ok(receipt)
    }

    // =========================================================================
    // ADMINISTRATIVE RE-TAGGING
    // =========================================================================

    /// Set lock time and tag of the range beginning exactly at `pointer`.
    pub fn modify_range(
        &mut self,
        pointer: TokenId,
        lock_time: Timestamp,
        tag: Tag,
    ) -> LedgerResult<()> {
        self.check_tag(&tag)?;
        let id = self
            .intervals
            .starting_at(pointer)
            .ok_or(LedgerError::InvalidPointer { pointer })?;

        if let Some(record) = self.arena.get_mut(id) {
            record.lock_time = lock_time;
            record.tag = tag;
        }
        self.merge_at(id);
        debug!("[rl-01] Modified range at {}", pointer);
        Ok(())
    }

    /// Set lock time and tag on every token in `[start, stop)`, splitting the
    /// ranges that straddle either edge.
    pub fn modify_ranges(
        &mut self,
        start: TokenId,
        stop: TokenId,
        lock_time: Timestamp,
        tag: Tag,
    ) -> LedgerResult<()> {
        if start >= stop {
            return Err(LedgerError::InvalidSpan { start, stop });
        }
        let total_supply = self.total_supply();
        if start == 0 {
            return Err(LedgerError::OutOfBounds {
                id: start,
                total_supply,
            });
        }
        if stop > total_supply + 1 {
            return Err(LedgerError::OutOfBounds {
                id: stop,
                total_supply,
            });
        }
        self.check_tag(&tag)?;

        // Right edge first: the split-off right part of a range straddling
        // both edges is appended before the middle part.
        if stop <= total_supply {
            self.split_at(stop)?;
        }
        self.split_at(start)?;

        let touched = self.intervals.starting_within(start, stop);
        for id in &touched {
            if let Some(record) = self.arena.get_mut(*id) {
                record.lock_time = lock_time;
                record.tag = tag.clone();
            }
        }
        // Each merge absorbs the whole following run, including the range
        // beginning at `stop`; absorbed handles are skipped.
        for id in touched {
            if self.arena.contains(id) {
                self.merge_at(id);
            }
        }

        debug!("[rl-01] Modified ranges in [{}, {})", start, stop);
        Ok(())
    }

    // =========================================================================
    // STRUCTURE
    // =========================================================================

    /// Ensure a range boundary at `at`. The left part keeps the record (and
    /// its list position); the right part is a new record at the owner's tail.
    fn split_at(&mut self, at: TokenId) -> LedgerResult<()> {
        let id = self.intervals.point_query(at)?;
        let record = self.record(id)?;
        if record.start == at {
            return Ok(());
        }

        let right = RangeRecord {
            owner: record.owner,
            start: at,
            stop: record.stop,
            lock_time: record.lock_time,
            tag: record.tag.clone(),
        };
        if let Some(left) = self.arena.get_mut(id) {
            left.stop = at;
        }
        let owner = right.owner;
        let right_id = self.arena.alloc(right);
        self.intervals.insert(at, right_id);
        self.owners.append(owner, right_id);
        Ok(())
    }

    /// Merge `id` with its neighbours and drop absorbed handles from the
    /// Owner Index.
    fn merge_at(&mut self, id: RangeId) {
        let merge = self.intervals.try_merge(&mut self.arena, id);
        if merge.is_noop() {
            return;
        }
        let Some(owner) = self.arena.get(merge.survivor).map(|r| r.owner) else {
            return;
        };
        for absorbed in merge.absorbed {
            self.owners.remove(&owner, absorbed);
        }
    }

    fn record(&self, id: RangeId) -> LedgerResult<&RangeRecord> {
        self.arena.get(id).ok_or_else(|| LedgerError::Inconsistent {
            reason: format!("dangling range handle {:?}", id),
        })
    }

    fn check_tag(&self, tag: &Tag) -> LedgerResult<()> {
        if tag.len() > self.max_tag_len {
            return Err(LedgerError::TagTooLong {
                len: tag.len(),
                max: self.max_tag_len,
            });
        }
        Ok(())
    }

    // =========================================================================
    // INVARIANTS
    // =========================================================================

    /// Verify the partition, no-adjacent-duplicate and owner-index
    /// consistency invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let violation = |msg: String| Err(InvariantViolation(msg));
        let mut expected_start = 1;
        let mut prev: Option<&RangeRecord> = None;

        for (start, id) in self.intervals.iter() {
            let Some(record) = self.arena.get(id) else {
                return violation(format!("dangling handle at {}", start));
            };
            if record.start != start {
                return violation(format!("range keyed at {} starts at {}", start, record.start));
            }
            if record.start != expected_start {
                return violation(format!(
                    "gap or overlap: expected start {}, found {}",
                    expected_start, record.start
                ));
            }
            if record.is_empty() {
                return violation(format!("empty range at {}", start));
            }
            if let Some(prev) = prev {
                if prev.same_attributes(record) {
                    return violation(format!("unmerged neighbours at {}", start));
                }
            }
            expected_start = record.stop;
            prev = Some(record);
        }

        if Some(expected_start) != self.total_supply().checked_add(1) {
            return violation(format!(
                "ranges end at {}, total supply is {}",
                expected_start,
                self.total_supply()
            ));
        }
        if self.arena.len() != self.intervals.len() {
            return violation(format!(
                "{} records for {} ranges",
                self.arena.len(),
                self.intervals.len()
            ));
        }

        let mut seen = HashSet::new();
        for owner in self.owners.owners() {
            for id in self.owners.handles(owner) {
                let Some(record) = self.arena.get(*id) else {
                    return violation(format!("dangling handle in index of {}", owner));
                };
                if record.owner != *owner {
                    return violation(format!(
                        "range at {} listed under {} but owned by {}",
                        record.start, owner, record.owner
                    ));
                }
                if self.intervals.starting_at(record.start) != Some(*id) {
                    return violation(format!("indexed range at {} not in store", record.start));
                }
                if !seen.insert(*id) {
                    return violation(format!("range at {} listed twice", record.start));
                }
            }
        }
        if self.owners.handle_count() != self.intervals.len() {
            return violation(format!(
                "{} indexed ranges for {} stored",
                self.owners.handle_count(),
                self.intervals.len()
            ));
        }
        Ok(())
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// Capture the full state, including every owner's list order.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let ranges = self
            .intervals
            .iter()
            .filter_map(|(_, id)| self.arena.get(id))
            .map(|r| SnapshotRange {
                owner: r.owner,
                start: r.start,
                stop: r.stop,
                lock_time: r.lock_time,
                tag: r.tag.clone(),
            })
            .collect();

        let mut owners: Vec<Identity> = self.owners.owners().copied().collect();
        owners.sort();
        let owners = owners
            .into_iter()
            .map(|owner| {
                let starts = self
                    .owners
                    .handles(&owner)
                    .iter()
                    .filter_map(|id| self.arena.get(*id))
                    .map(|r| r.start)
                    .collect();
                (owner, starts)
            })
            .collect();

        LedgerSnapshot {
            version: SNAPSHOT_VERSION,
            total_supply: self.total_supply(),
            ranges,
            owners,
        }
    }

    /// Rebuild a ledger from a snapshot, preserving list order exactly.
    pub fn restore(snapshot: LedgerSnapshot, max_tag_len: usize) -> LedgerResult<Self> {
        let corrupt = |reason: String| LedgerError::CorruptSnapshot { reason };
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(corrupt(format!(
                "unsupported version {}",
                snapshot.version
            )));
        }

        // Mint keeps `total_supply + 1` representable.
        if snapshot.total_supply == u64::MAX {
            return Err(corrupt(format!(
                "total supply {} leaves no exclusive stop",
                snapshot.total_supply
            )));
        }

        let mut ledger = Self::new(max_tag_len);
        for range in snapshot.ranges {
            if ledger.intervals.starting_at(range.start).is_some() {
                return Err(corrupt(format!("duplicate range at {}", range.start)));
            }
            if range.tag.len() > max_tag_len {
                return Err(corrupt(format!("oversized tag at {}", range.start)));
            }
            let start = range.start;
            let id = ledger.arena.alloc(RangeRecord {
                owner: range.owner,
                start: range.start,
                stop: range.stop,
                lock_time: range.lock_time,
                tag: range.tag,
            });
            ledger.intervals.insert(start, id);
        }
        ledger.intervals.set_total_supply(snapshot.total_supply);

        for (owner, starts) in snapshot.owners {
            for start in starts {
                let id = ledger
                    .intervals
                    .starting_at(start)
                    .ok_or_else(|| corrupt(format!("{} lists unknown range {}", owner, start)))?;
                ledger.owners.append(owner, id);
            }
        }

        ledger
            .check_invariants()
            .map_err(|violation| corrupt(violation.0))?;
        Ok(ledger)
    }
}
