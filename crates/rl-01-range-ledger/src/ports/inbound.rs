//! # Inbound Port - RangeLedgerApi
//!
//! Primary driving port exposing the ledger.
//!
//! ## Authorization
//!
//! | Method | Caller |
//! |--------|--------|
//! | `mint` | issuer, after the N-of-M authorization check |
//! | `modify_range`, `modify_ranges` | issuer, after the N-of-M authorization check |
//! | `transfer`, `check_transfer` | holder (identity resolved by the registrar) |
//! | queries | anyone |
//!
//! The ledger performs no authorization itself.

use crate::domain::{MintReceipt, RangeInfo, TransferReceipt};
use crate::error::LedgerResult;
use shared_types::{Identity, Tag, Timestamp, TokenId};

/// Primary API for the Range Ledger subsystem.
///
/// Every mutation is atomic: it either completes (including the compliance
/// recording) or leaves the ledger unchanged.
///
/// # Example
///
/// ```rust,ignore
/// use rl_01_range_ledger::ports::RangeLedgerApi;
///
/// fn example(ledger: &impl RangeLedgerApi) {
///     ledger.mint(issuer, 10_000, 0, Tag::default())?;
///     ledger.transfer(issuer, investor, 2_500)?;
///     assert_eq!(ledger.ranges_of(&investor), vec![(1, 2501)]);
/// }
/// ```
pub trait RangeLedgerApi: Send + Sync {
    /// Issue `amount` new tokens to `owner` at the end of the token space.
    ///
    /// # Errors
    /// - `InvalidAmount`: zero amount
    /// - `SupplyOverflow`: token IDs would exceed `u64`
    /// - `TagTooLong`: tag above the configured maximum
    /// - `HookRejected`: a hook vetoed the mint
    fn mint(
        &self,
        owner: Identity,
        amount: u64,
        lock_time: Timestamp,
        tag: Tag,
    ) -> LedgerResult<MintReceipt>;

    /// Move `amount` tokens from `from` to `to`, lowest token IDs first,
    /// skipping ranges locked at the current time.
    ///
    /// # Errors
    /// - `InvalidAmount`, `SelfTransfer`
    /// - `InsufficientBalance`: sender holds fewer than `amount` tokens
    /// - `TimeLocked`: enough tokens, but not enough unlocked
    /// - `ComplianceDenied`, `OracleUnavailable`
    /// - `HookRejected`
    fn transfer(&self, from: Identity, to: Identity, amount: u64)
        -> LedgerResult<TransferReceipt>;

    /// Run every check `transfer` would run, including compliance and the
    /// before hooks, without moving tokens or recording anything.
    ///
    /// # Errors
    /// The same as `transfer`.
    fn check_transfer(&self, from: Identity, to: Identity, amount: u64) -> LedgerResult<()>;

    /// Re-tag the range beginning exactly at `pointer`.
    fn modify_range(&self, pointer: TokenId, lock_time: Timestamp, tag: Tag) -> LedgerResult<()>;

    /// Re-tag every token in `[start, stop)`.
    fn modify_ranges(
        &self,
        start: TokenId,
        stop: TokenId,
        lock_time: Timestamp,
        tag: Tag,
    ) -> LedgerResult<()>;

    /// The range containing token `pointer`.
    fn get_range(&self, pointer: TokenId) -> LedgerResult<RangeInfo>;

    /// `owner`'s ranges in Owner Index order.
    fn ranges_of(&self, owner: &Identity) -> Vec<(TokenId, TokenId)>;

    fn balance_of(&self, owner: &Identity) -> u64;

    fn total_supply(&self) -> u64;
}
