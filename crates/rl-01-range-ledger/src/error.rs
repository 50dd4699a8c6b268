//! Error types for the Range Ledger subsystem

use shared_types::{DenialReason, TokenId};
use thiserror::Error;

/// Range Ledger errors
///
/// Every variant is a local, synchronous failure. None is retried by the
/// ledger, and none leaves the Interval Store or Owner Index partially
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Zero amount on mint or transfer
    #[error("Invalid amount: must be greater than zero")]
    InvalidAmount,

    /// Minting would overflow the token-ID space
    #[error("Supply overflow: cannot mint {amount} on top of {total_supply}")]
    SupplyOverflow { amount: u64, total_supply: u64 },

    /// Token ID outside `[1, total_supply]`
    #[error("Token {id} out of bounds: total supply is {total_supply}")]
    OutOfBounds { id: TokenId, total_supply: u64 },

    /// Empty or inverted span
    #[error("Invalid span: start {start} must be below stop {stop}")]
    InvalidSpan { start: TokenId, stop: TokenId },

    /// Pointer is not the start of a range
    #[error("Invalid pointer: {pointer} is not a range boundary")]
    InvalidPointer { pointer: TokenId },

    /// Total holdings below the requested amount
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: u64, available: u64 },

    /// Enough tokens overall, not enough unlocked
    #[error("Tokens are time locked: required {required}, unlocked {unlocked}")]
    TimeLocked { required: u64, unlocked: u64 },

    /// Sender and receiver are the same identity
    #[error("Cannot send to self")]
    SelfTransfer,

    /// Tag exceeds the configured maximum length
    #[error("Tag too long: {len} bytes, max {max}")]
    TagTooLong { len: usize, max: usize },

    /// Compliance oracle refused the transfer
    #[error("{reason}")]
    ComplianceDenied { reason: DenialReason },

    /// Compliance oracle could not be consulted
    #[error("Compliance oracle unavailable: {reason}")]
    OracleUnavailable { reason: String },

    /// A registered hook vetoed the operation
    #[error("Hook '{hook}' rejected the operation: {reason}")]
    HookRejected { hook: String, reason: String },

    /// Persisted state failed to decode or violates the ledger invariants
    #[error("Corrupt snapshot: {reason}")]
    CorruptSnapshot { reason: String },

    /// A range handle no longer resolves; the ledger state is damaged
    #[error("Inconsistent ledger state: {reason}")]
    Inconsistent { reason: String },

    /// Snapshot storage failure
    #[error("Storage error: {reason}")]
    Storage { reason: String },
}

impl LedgerError {
    pub fn is_time_locked(&self) -> bool {
        matches!(self, Self::TimeLocked { .. })
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
