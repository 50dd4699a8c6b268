//! # Compliance Oracle Port
//!
//! Boundary between the ledger and the external compliance policy.
//!
//! The ledger calls `check_and_record` exactly once per transfer, before any
//! structural change. Once the transfer is applied it calls `commit`; if the
//! transfer is aborted instead, it calls `revert` with the same request so
//! that the oracle's recorded state (holder counters and the like) matches the
//! ledger again. Dry runs use `check`, which records nothing.

use crate::entities::Identity;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A transfer submitted for compliance review.
///
/// Balances are the holdings of each party *before* the transfer, which lets
/// the oracle tell whether the transfer adds or retires a holder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCheck {
    pub from: Identity,
    pub to: Identity,
    pub amount: u64,
    pub from_balance: u64,
    pub to_balance: u64,
}

impl TransferCheck {
    /// True when the sender gives away everything it holds.
    pub fn retires_sender(&self) -> bool {
        self.from_balance == self.amount
    }

    /// True when the receiver holds nothing yet.
    pub fn adds_receiver(&self) -> bool {
        self.to_balance == 0
    }
}

/// Registry attributes of a party, as reported to hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolderProfile {
    pub rating: u8,
    pub country: u16,
}

/// Why the oracle refused a transfer. Surfaced to callers unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DenialReason(String);

impl DenialReason {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DenialReason {
    fn from(reason: &str) -> Self {
        Self(reason.to_string())
    }
}

/// Oracle failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ComplianceError {
    /// Policy refused the transfer.
    #[error("{0}")]
    Denied(DenialReason),

    /// The oracle could not be consulted.
    #[error("Compliance oracle unavailable: {0}")]
    Unavailable(String),
}

impl ComplianceError {
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::Denied(DenialReason::new(reason))
    }
}

/// Compliance oracle - outbound port of the ledger.
pub trait ComplianceOracle: Send + Sync {
    /// Decide a transfer without recording anything.
    fn check(&self, check: &TransferCheck) -> Result<(), ComplianceError>;

    /// Check a transfer and, if permitted, record its effect on the policy state.
    fn check_and_record(&self, check: &TransferCheck) -> Result<(), ComplianceError>;

    /// The recorded transfer was applied and will not be reverted.
    fn commit(&self, check: &TransferCheck) {
        let _ = check;
    }

    /// Undo the effect recorded by a previous successful `check_and_record`.
    fn revert(&self, check: &TransferCheck);

    /// Rating and country of `identity`, when the oracle knows them.
    fn profile(&self, identity: &Identity) -> Option<HolderProfile> {
        let _ = identity;
        None
    }
}

/// Oracle that permits every transfer and records nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct PermissiveOracle;

impl ComplianceOracle for PermissiveOracle {
    fn check(&self, _check: &TransferCheck) -> Result<(), ComplianceError> {
        Ok(())
    }

    fn check_and_record(&self, _check: &TransferCheck) -> Result<(), ComplianceError> {
        Ok(())
    }

    fn revert(&self, _check: &TransferCheck) {}
}
