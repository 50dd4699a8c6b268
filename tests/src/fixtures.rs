//! Shared fixtures for scenarios and benchmarks.

use rl_01_range_ledger::{LedgerConfig, LedgerService, ManualClock};
use rl_02_compliance::InMemoryComplianceOracle;
use shared_types::{ComplianceOracle, Identity, PermissiveOracle, Tag};
use std::sync::Arc;

/// Start time of every fixture clock.
pub const GENESIS: u64 = 1_700_000_000;

/// Test account `n`. Account 0 is the issuer.
pub fn account(n: u8) -> Identity {
    Identity::repeat(n)
}

pub fn issuer() -> Identity {
    account(0)
}

pub fn tag(hex: &str) -> Tag {
    Tag::from_hex(hex).unwrap_or_default()
}

pub struct Harness {
    pub ledger: LedgerService,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn with_oracle(oracle: Arc<dyn ComplianceOracle>) -> Self {
        let clock = Arc::new(ManualClock::new(GENESIS));
        let ledger = LedgerService::new(LedgerConfig::default(), oracle, clock.clone());
        Self { ledger, clock }
    }

    /// No compliance restrictions.
    pub fn permissive() -> Self {
        Self::with_oracle(Arc::new(PermissiveOracle))
    }
}

/// Investor-limit oracle with accounts 1..=9 registered.
///
/// Odd accounts have rating 1, even accounts rating 2. Accounts 1..=4 are
/// in country 1, the rest in country 2.
pub fn registered_oracle() -> Arc<InMemoryComplianceOracle> {
    let oracle = Arc::new(InMemoryComplianceOracle::new(issuer()));
    for n in 1..=9u8 {
        let rating = if n % 2 == 1 { 1 } else { 2 };
        let country = if n <= 4 { 1 } else { 2 };
        oracle
            .register(account(n), rating, country)
            .expect("fixture ratings are within 1..=7");
    }
    oracle
}
