//! # Ledger + Investor-Limit Oracle
//!
//! The issuer mints 100000 tokens, sets a limit, then hands 1000 to account 1.
//! Accounts 1 and 3 share rating 1; account 2 has rating 2.

#[cfg(test)]
mod tests {
    use crate::fixtures::{account as a, issuer, registered_oracle, tag, Harness};
    use rl_01_range_ledger::{LedgerError, RangeLedgerApi};
    use rl_02_compliance::InMemoryComplianceOracle;
    use std::sync::Arc;

    fn setup(limits: [u64; 8]) -> (Harness, Arc<InMemoryComplianceOracle>) {
        let oracle = registered_oracle();
        let h = Harness::with_oracle(oracle.clone());
        h.ledger.mint(issuer(), 100_000, 0, tag("0x00")).unwrap();
        oracle.set_investor_limits(limits);
        h.ledger.transfer(issuer(), a(1), 1000).unwrap();
        (h, oracle)
    }

    fn denied(result: Result<impl Sized, LedgerError>) -> String {
        match result {
            Err(LedgerError::ComplianceDenied { reason }) => reason.to_string(),
            Err(other) => panic!("expected compliance denial, got {other}"),
            Ok(_) => panic!("expected compliance denial, transfer succeeded"),
        }
    }

    #[test]
    fn test_total_limit_blocks_issuer_to_new_investor() {
        let (h, _) = setup([1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            denied(h.ledger.transfer(issuer(), a(2), 1000)),
            "Total Investor Limit"
        );
    }

    #[test]
    fn test_total_limit_blocks_investor_to_new_investor() {
        let (h, _) = setup([1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            denied(h.ledger.transfer(a(1), a(2), 500)),
            "Total Investor Limit"
        );
    }

    #[test]
    fn test_total_limit_allows_existing_investor() {
        let (h, _) = setup([1, 0, 0, 0, 0, 0, 0, 0]);
        h.ledger.transfer(issuer(), a(1), 1000).unwrap();
        assert_eq!(h.ledger.balance_of(&a(1)), 2000);
    }

    #[test]
    fn test_total_limit_allows_full_balance_handover() {
        let (h, oracle) = setup([1, 0, 0, 0, 0, 0, 0, 0]);
        h.ledger.transfer(a(1), a(2), 1000).unwrap();
        assert_eq!(h.ledger.balance_of(&a(1)), 0);
        assert_eq!(oracle.holder_count(), 1);
    }

    #[test]
    fn test_rating_limit_blocks_issuer_to_investor() {
        let (h, _) = setup([0, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            denied(h.ledger.transfer(issuer(), a(3), 1000)),
            "Total Investor Limit: Rating"
        );
    }

    #[test]
    fn test_rating_limit_blocks_investor_to_investor() {
        let (h, _) = setup([0, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            denied(h.ledger.transfer(a(1), a(3), 500)),
            "Total Investor Limit: Rating"
        );
    }

    #[test]
    fn test_rating_limit_allows_existing_and_handover() {
        let (h, _) = setup([0, 1, 0, 0, 0, 0, 0, 0]);
        h.ledger.transfer(issuer(), a(1), 1000).unwrap();
        h.ledger.transfer(a(1), a(2), 2000).unwrap();
        assert_eq!(h.ledger.balance_of(&a(2)), 2000);
    }

    #[test]
    fn test_rating_limit_allows_other_rating() {
        let (h, oracle) = setup([0, 1, 0, 0, 0, 0, 0, 0]);
        h.ledger.transfer(a(1), a(2), 500).unwrap();
        assert_eq!(oracle.rating_count(1), 1);
        assert_eq!(oracle.rating_count(2), 1);
    }

    #[test]
    fn test_country_limit() {
        let (h, oracle) = setup([0; 8]);
        oracle.set_country_limit(1, 1);
        assert_eq!(
            denied(h.ledger.transfer(issuer(), a(2), 10)),
            "Total Investor Limit: Country"
        );
        // Account 5 is in country 2.
        h.ledger.transfer(issuer(), a(5), 10).unwrap();
    }

    #[test]
    fn test_unregistered_receiver() {
        let (h, _) = setup([0; 8]);
        assert_eq!(
            denied(h.ledger.transfer(a(1), a(42), 10)),
            "Address not registered"
        );
    }

    #[test]
    fn test_denial_is_atomic() {
        let (h, oracle) = setup([1, 0, 0, 0, 0, 0, 0, 0]);
        let before = h.ledger.snapshot();
        let holders = oracle.holder_count();

        assert!(h.ledger.transfer(a(1), a(2), 500).is_err());
        assert_eq!(h.ledger.snapshot(), before);
        assert_eq!(oracle.holder_count(), holders);
        h.ledger.check_invariants().unwrap();
    }

    #[test]
    fn test_ledger_errors_precede_compliance() {
        let (h, oracle) = setup([1, 0, 0, 0, 0, 0, 0, 0]);
        assert!(matches!(
            h.ledger.transfer(a(1), a(2), 5000),
            Err(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(oracle.holder_count(), 1);
    }
}
