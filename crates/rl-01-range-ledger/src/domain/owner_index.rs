//! # Owner Index
//!
//! Per-owner list of range handles in creation order.
//!
//! The order is observable through `ranges_of` and is deliberately not
//! sorted by `start`: new ranges go to the tail, and a record keeps its
//! position for as long as it lives.

use super::arena::RangeArena;
use super::range::RangeId;
use shared_types::{Identity, TokenId};
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct OwnerIndex {
    lists: HashMap<Identity, Vec<RangeId>>,
}

impl OwnerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `range` at the tail of `owner`'s list.
    pub fn append(&mut self, owner: Identity, range: RangeId) {
        self.lists.entry(owner).or_default().push(range);
    }

    /// Remove `range` from `owner`'s list. Returns false if it was not there.
    pub fn remove(&mut self, owner: &Identity, range: RangeId) -> bool {
        let Some(list) = self.lists.get_mut(owner) else {
            return false;
        };
        let Some(pos) = list.iter().position(|r| *r == range) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.lists.remove(owner);
        }
        true
    }

    /// Handles in list order.
    pub fn handles(&self, owner: &Identity) -> &[RangeId] {
        self.lists.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(start, stop)` pairs in list order.
    pub fn list_of(&self, owner: &Identity, arena: &RangeArena) -> Vec<(TokenId, TokenId)> {
        self.handles(owner)
            .iter()
            .filter_map(|id| arena.get(*id))
            .map(|r| (r.start, r.stop))
            .collect()
    }

    /// Every owner currently holding at least one range.
    pub fn owners(&self) -> impl Iterator<Item = &Identity> {
        self.lists.keys()
    }

    /// Total number of handles across all owners.
    pub fn handle_count(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }
}
