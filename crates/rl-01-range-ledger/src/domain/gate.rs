//! # Compliance Gate
//!
//! Synchronous pre-mutation check for transfers.
//!
//! The gate is consulted exactly once per transfer, after the ledger has
//! validated balances and locks and before any structural change. A
//! successful check yields a `ComplianceTicket`; the caller either hands it to
//! `commit` once the transfer is applied or to `revert` when the transfer is
//! aborted, so the oracle's recorded state never disagrees with the ledger.
//! `check` answers the same question for a dry run and records nothing.

use crate::error::{LedgerError, LedgerResult};
use shared_types::{ComplianceError, ComplianceOracle, HolderProfile, Identity, TransferCheck};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ComplianceGate<O: ?Sized> {
    oracle: Arc<O>,
}

impl<O: ?Sized> Clone for ComplianceGate<O> {
    fn clone(&self) -> Self {
        Self {
            oracle: Arc::clone(&self.oracle),
        }
    }
}

impl<O: ComplianceOracle + ?Sized> ComplianceGate<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self { oracle }
    }

    /// Ask the oracle to approve and record `check`.
    pub fn check_and_record(&self, check: TransferCheck) -> LedgerResult<ComplianceTicket> {
        self.oracle
            .check_and_record(&check)
            .map_err(|e| denied(&check, e))?;
        debug!(
            "[rl-01] Compliance approved {} -> {} ({} tokens)",
            check.from, check.to, check.amount
        );
        Ok(ComplianceTicket { check })
    }

    /// Ask the oracle whether `check` would pass, recording nothing.
    pub fn check(&self, check: &TransferCheck) -> LedgerResult<()> {
        self.oracle.check(check).map_err(|e| denied(check, e))
    }

    pub fn profile(&self, identity: &Identity) -> Option<HolderProfile> {
        self.oracle.profile(identity)
    }

    /// The transfer was applied; the recorded effect stands.
    pub fn commit(&self, ticket: ComplianceTicket) {
        self.oracle.commit(&ticket.check);
    }

    /// Undo the oracle side effect of an aborted transfer.
    pub fn revert(&self, ticket: ComplianceTicket) {
        debug!(
            "[rl-01] Reverting compliance record {} -> {}",
            ticket.check.from, ticket.check.to
        );
        self.oracle.revert(&ticket.check);
    }
}

/// Proof that the oracle approved and recorded a transfer.
#[must_use = "a ticket must be committed or reverted"]
#[derive(Debug)]
pub struct ComplianceTicket {
    check: TransferCheck,
}

impl ComplianceTicket {
    pub fn check(&self) -> &TransferCheck {
        &self.check
    }
}

fn denied(check: &TransferCheck, error: ComplianceError) -> LedgerError {
    match error {
        ComplianceError::Denied(reason) => {
            warn!(
                "[rl-01] Compliance denied {} -> {}: {}",
                check.from, check.to, reason
            );
            LedgerError::ComplianceDenied { reason }
        }
        ComplianceError::Unavailable(reason) => {
            warn!("[rl-01] Compliance oracle unavailable: {}", reason);
            LedgerError::OracleUnavailable { reason }
        }
    }
}
