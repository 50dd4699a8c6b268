//! Manually driven clock for deterministic lock-time behaviour.

use crate::ports::TimeSource;
use shared_types::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct ManualClock {
    time: AtomicU64,
}

impl ManualClock {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.time.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set(&self, time: Timestamp) {
        self.time.store(time, Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.time.load(Ordering::SeqCst)
    }
}
