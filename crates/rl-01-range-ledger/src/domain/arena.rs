//! # Range Arena
//!
//! Slot storage for range records. Handles stay valid until the record is
//! released; released slots are recycled.

use super::range::{RangeId, RangeRecord};

#[derive(Clone, Debug, Default)]
pub struct RangeArena {
    slots: Vec<Option<RangeRecord>>,
    free: Vec<u32>,
}

impl RangeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record and return its handle.
    pub fn alloc(&mut self, record: RangeRecord) -> RangeId {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize] = Some(record);
                RangeId(slot)
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Some(record));
                RangeId(slot)
            }
        }
    }

    /// Drop a record, returning it.
    pub fn release(&mut self, id: RangeId) -> Option<RangeRecord> {
        let record = self.slots.get_mut(id.0 as usize)?.take()?;
        self.free.push(id.0);
        Some(record)
    }

    pub fn get(&self, id: RangeId) -> Option<&RangeRecord> {
        self.slots.get(id.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: RangeId) -> Option<&mut RangeRecord> {
        self.slots.get_mut(id.0 as usize)?.as_mut()
    }

    pub fn contains(&self, id: RangeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
