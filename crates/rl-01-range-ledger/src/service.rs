//! # Ledger Service
//!
//! Serialized state machine wrapping `RangeLedger`.
//!
//! ## Mutation Pipeline
//!
//! ```text
//! write lock ─→ plan ─→ compliance (transfer) ─→ before hooks ─→ apply ─→ after hooks ─→ unlock
//!                 │            │                      │                       │
//!                 └─ Err       └─ Err                 └─ Err: revert ticket   └─ Err: restore state,
//!                                                                                revert ticket
//! ```
//!
//! `check_transfer` runs plan, compliance (check only) and the before hooks
//! under the read lock and stops there.
//!
//! The write lock is held for the whole pipeline, including the oracle call,
//! so mutations are totally ordered. Hooks and the oracle must not call back
//! into the service.

use crate::adapters::FileSnapshotStore;
use crate::config::LedgerConfig;
use crate::domain::{
    ComplianceGate, HookPipeline, LedgerHook, LedgerSnapshot, MintReceipt, RangeInfo, RangeLedger,
    TransferReceipt,
};
use crate::error::LedgerResult;
use crate::ports::{RangeLedgerApi, SnapshotStore, SystemTimeSource, TimeSource};
use parking_lot::RwLock;
use shared_types::{ComplianceOracle, Identity, Tag, Timestamp, TokenId};
use std::sync::Arc;
use tracing::{debug, info};

struct ServiceState {
    ledger: RangeLedger,
    hooks: HookPipeline,
}

pub struct LedgerService {
    state: RwLock<ServiceState>,
    gate: ComplianceGate<dyn ComplianceOracle>,
    clock: Arc<dyn TimeSource>,
    config: LedgerConfig,
}

impl LedgerService {
    pub fn new(
        config: LedgerConfig,
        oracle: Arc<dyn ComplianceOracle>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self::from_ledger(RangeLedger::new(config.max_tag_len), config, oracle, clock)
    }

    /// Default configuration and the system clock.
    pub fn with_oracle(oracle: Arc<dyn ComplianceOracle>) -> Self {
        Self::new(LedgerConfig::default(), oracle, Arc::new(SystemTimeSource))
    }

    /// Resume from a previously captured snapshot.
    pub fn from_snapshot(
        snapshot: LedgerSnapshot,
        config: LedgerConfig,
        oracle: Arc<dyn ComplianceOracle>,
        clock: Arc<dyn TimeSource>,
    ) -> LedgerResult<Self> {
        let ledger = RangeLedger::restore(snapshot, config.max_tag_len)?;
        Ok(Self::from_ledger(ledger, config, oracle, clock))
    }

    fn from_ledger(
        ledger: RangeLedger,
        config: LedgerConfig,
        oracle: Arc<dyn ComplianceOracle>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            state: RwLock::new(ServiceState {
                ledger,
                hooks: HookPipeline::new(),
            }),
            gate: ComplianceGate::new(oracle),
            clock,
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // =========================================================================
    // HOOKS
    // =========================================================================

    pub fn attach_hook(&self, name: impl Into<String>, hook: Arc<dyn LedgerHook>) {
        let name = name.into();
        debug!("[rl-01] Attaching hook '{}'", name);
        self.state.write().hooks.attach(name, hook);
    }

    pub fn detach_hook(&self, name: &str) -> bool {
        debug!("[rl-01] Detaching hook '{}'", name);
        self.state.write().hooks.detach(name)
    }

    pub fn hook_names(&self) -> Vec<String> {
        self.state.read().hooks.names().map(str::to_string).collect()
    }

    // =========================================================================
    // INSPECTION & PERSISTENCE
    // =========================================================================

    /// Every range, ascending by start.
    pub fn ranges(&self) -> Vec<RangeInfo> {
        self.state.read().ledger.ranges()
    }

    pub fn check_invariants(&self) -> Result<(), crate::domain::InvariantViolation> {
        self.state.read().ledger.check_invariants()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.state.read().ledger.snapshot()
    }

    /// Encode the current state and hand it to `store`.
    pub fn persist(&self, store: &dyn SnapshotStore) -> LedgerResult<()> {
        let bytes = self.snapshot().encode()?;
        store.save(&bytes)
    }

    /// Replace the ledger with the snapshot held by `store`. Returns false
    /// when the store is empty. Hooks stay attached.
    pub fn reload(&self, store: &dyn SnapshotStore) -> LedgerResult<bool> {
        let Some(bytes) = store.load()? else {
            return Ok(false);
        };
        let snapshot = LedgerSnapshot::decode(&bytes)?;
        let ledger = RangeLedger::restore(snapshot, self.config.max_tag_len)?;
        self.state.write().ledger = ledger;
        info!("[rl-01] Reloaded ledger state from snapshot");
        Ok(true)
    }

    /// File store at the configured snapshot path, if one is set.
    pub fn configured_store(&self) -> Option<FileSnapshotStore> {
        self.config.snapshot_path.clone().map(FileSnapshotStore::new)
    }
}

impl RangeLedgerApi for LedgerService {
    fn mint(
        &self,
        owner: Identity,
        amount: u64,
        lock_time: Timestamp,
        tag: Tag,
    ) -> LedgerResult<MintReceipt> {
        let mut guard = self.state.write();
        let ServiceState { ledger, hooks } = &mut *guard;

        let plan = ledger.plan_mint(owner, amount, lock_time, tag)?;
        let event = plan.event().with_profiles(|id| self.gate.profile(id));
        hooks.run_before(&event)?;

        let rollback = (!hooks.is_empty()).then(|| ledger.clone());
        let receipt = ledger.apply_mint(plan);
        if let Err(e) = hooks.run_after(&event) {
            if let Some(previous) = rollback {
                *ledger = previous;
            }
            return Err(e);
        }

        info!(
            "[rl-01] Minted {} tokens [{}, {}) to {}",
            amount, receipt.start, receipt.stop, owner
        );
        Ok(receipt)
    }

    fn transfer(
        &self,
        from: Identity,
        to: Identity,
        amount: u64,
    ) -> LedgerResult<TransferReceipt> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let ServiceState { ledger, hooks } = &mut *guard;

        let plan = ledger.plan_transfer(from, to, amount, now)?;
        let event = plan.event().with_profiles(|id| self.gate.profile(id));
        let ticket = self.gate.check_and_record(plan.check().clone())?;
        if let Err(e) = hooks.run_before(&event) {
            self.gate.revert(ticket);
            return Err(e);
        }

        let rollback = (!hooks.is_empty()).then(|| ledger.clone());
        let receipt = ledger.apply_transfer(plan);
        if let Err(e) = hooks.run_after(&event) {
            if let Some(previous) = rollback {
                *ledger = previous;
            }
            self.gate.revert(ticket);
            return Err(e);
        }
        self.gate.commit(ticket);

        info!(
            "[rl-01] Transferred {} tokens {} -> {}",
            amount, from, to
        );
        Ok(receipt)
    }

    fn check_transfer(&self, from: Identity, to: Identity, amount: u64) -> LedgerResult<()> {
        let now = self.clock.now();
        let guard = self.state.read();

        let plan = guard.ledger.plan_transfer(from, to, amount, now)?;
        self.gate.check(plan.check())?;
        let event = plan.check_event().with_profiles(|id| self.gate.profile(id));
        guard.hooks.run_before(&event)?;

        debug!("[rl-01] Transfer check passed {} -> {} ({} tokens)", from, to, amount);
        Ok(())
    }

    fn modify_range(&self, pointer: TokenId, lock_time: Timestamp, tag: Tag) -> LedgerResult<()> {
        self.state.write().ledger.modify_range(pointer, lock_time, tag)
    }

    fn modify_ranges(
        &self,
        start: TokenId,
        stop: TokenId,
        lock_time: Timestamp,
        tag: Tag,
    ) -> LedgerResult<()> {
        self.state
            .write()
            .ledger
            .modify_ranges(start, stop, lock_time, tag)
    }

    fn get_range(&self, pointer: TokenId) -> LedgerResult<RangeInfo> {
        self.state.read().ledger.get_range(pointer)
    }

    fn ranges_of(&self, owner: &Identity) -> Vec<(TokenId, TokenId)> {
        self.state.read().ledger.ranges_of(owner)
    }

    fn balance_of(&self, owner: &Identity) -> u64 {
        self.state.read().ledger.balance_of(owner)
    }

    fn total_supply(&self) -> u64 {
        self.state.read().ledger.total_supply()
    }
}
