//! # Hook Attach / Veto / Detach
//!
//! For each mutation kind and the transfer dry run: succeeds without the
//! hook, succeeds with an approving hook, fails once the hook starts vetoing,
//! succeeds after detach.

#[cfg(test)]
mod tests {
    use crate::fixtures::{account as a, issuer, registered_oracle, tag, Harness};
    use parking_lot::Mutex;
    use rl_01_range_ledger::{
        HookRejection, LedgerError, LedgerHook, LedgerService, MutationEvent, Party,
        RangeLedgerApi,
    };
    use shared_types::HolderProfile;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Records every event it sees; vetoes in the configured phase when
    /// switched off.
    struct Switch {
        allow: AtomicBool,
        veto_after: bool,
        seen: Mutex<Vec<MutationEvent>>,
    }

    impl Switch {
        fn new(veto_after: bool) -> Arc<Self> {
            Arc::new(Self {
                allow: AtomicBool::new(true),
                veto_after,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn set_return(&self, allow: bool) {
            self.allow.store(allow, Ordering::SeqCst);
        }

        fn decide(&self) -> Result<(), HookRejection> {
            if self.allow.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(HookRejection::new("module returned false"))
            }
        }
    }

    impl LedgerHook for Switch {
        fn before_mutation(&self, event: &MutationEvent) -> Result<(), HookRejection> {
            self.seen.lock().push(event.clone());
            if self.veto_after {
                return Ok(());
            }
            self.decide()
        }

        fn after_mutation(&self, _event: &MutationEvent) -> Result<(), HookRejection> {
            if self.veto_after {
                return self.decide();
            }
            Ok(())
        }
    }

    fn exercise(ledger: &LedgerService, hook: Arc<Switch>, op: impl Fn() -> Result<(), LedgerError>) {
        op().unwrap();
        ledger.attach_hook("module", hook.clone());
        op().unwrap();

        hook.set_return(false);
        let before = ledger.snapshot();
        assert!(matches!(op(), Err(LedgerError::HookRejected { ref hook, .. }) if hook == "module"));
        assert_eq!(ledger.snapshot(), before);

        assert!(ledger.detach_hook("module"));
        op().unwrap();
        ledger.check_invariants().unwrap();
    }

    #[test]
    fn test_transfer_hook_before() {
        let h = Harness::permissive();
        h.ledger.mint(issuer(), 100_000, 0, tag("0x00")).unwrap();
        let hook = Switch::new(false);
        exercise(&h.ledger, hook.clone(), || {
            h.ledger.transfer(issuer(), a(1), 1000).map(|_| ())
        });
        assert_eq!(h.ledger.balance_of(&a(1)), 3000);
        assert_eq!(
            hook.seen.lock()[0],
            MutationEvent::Transferred {
                from: Party::new(issuer()),
                to: Party::new(a(1)),
                amount: 1000
            }
        );
    }

    #[test]
    fn test_transfer_hook_after() {
        let h = Harness::permissive();
        h.ledger.mint(issuer(), 100_000, 0, tag("0x00")).unwrap();
        exercise(&h.ledger, Switch::new(true), || {
            h.ledger.transfer(issuer(), a(1), 1000).map(|_| ())
        });
        assert_eq!(h.ledger.balance_of(&a(1)), 3000);
    }

    #[test]
    fn test_mint_hook_reports_supply_change() {
        let h = Harness::permissive();
        let hook = Switch::new(false);
        exercise(&h.ledger, hook.clone(), || {
            h.ledger.mint(a(2), 1000, 0, tag("0x00")).map(|_| ())
        });
        assert_eq!(h.ledger.total_supply(), 3000);
        assert_eq!(
            hook.seen.lock()[0],
            MutationEvent::Minted {
                owner: Party::new(a(2)),
                amount: 1000,
                old_supply: 1000,
                new_supply: 2000
            }
        );
    }

    #[test]
    fn test_check_transfer_hook() {
        let h = Harness::permissive();
        h.ledger.mint(issuer(), 100_000, 0, tag("0x00")).unwrap();
        let hook = Switch::new(false);
        exercise(&h.ledger, hook.clone(), || {
            h.ledger.check_transfer(issuer(), a(1), 1000)
        });
        assert_eq!(h.ledger.balance_of(&a(1)), 0);
        assert_eq!(hook.seen.lock()[0].kind(), "check");
    }

    #[test]
    fn test_events_carry_registry_profiles() {
        let oracle = registered_oracle();
        let h = Harness::with_oracle(oracle);
        h.ledger.mint(issuer(), 10_000, 0, tag("0x00")).unwrap();
        let hook = Switch::new(false);
        h.ledger.attach_hook("module", hook.clone());

        h.ledger.transfer(issuer(), a(2), 10).unwrap();
        h.ledger.check_transfer(a(2), a(5), 5).unwrap();

        let seen = hook.seen.lock();
        assert_eq!(
            seen[0],
            MutationEvent::Transferred {
                from: Party::new(issuer()),
                to: Party {
                    identity: a(2),
                    profile: Some(HolderProfile {
                        rating: 2,
                        country: 1
                    }),
                },
                amount: 10
            }
        );
        let MutationEvent::Checked { from, to, amount } = &seen[1] else {
            panic!("expected a transfer check, got {:?}", seen[1]);
        };
        assert_eq!(*amount, 5);
        assert_eq!(from.profile.map(|p| p.rating), Some(2));
        assert_eq!(to.profile.map(|p| (p.rating, p.country)), Some((1, 2)));
    }

    #[test]
    fn test_after_veto_reverts_compliance_counts() {
        let oracle = registered_oracle();
        let h = Harness::with_oracle(oracle.clone());
        h.ledger.mint(issuer(), 10_000, 0, tag("0x00")).unwrap();

        let hook = Switch::new(true);
        hook.set_return(false);
        h.ledger.attach_hook("audit", hook);

        assert!(h.ledger.transfer(issuer(), a(1), 10).is_err());
        assert_eq!(oracle.holder_count(), 0);
        assert_eq!(h.ledger.balance_of(&a(1)), 0);
    }

    #[test]
    fn test_retagging_bypasses_hooks() {
        let h = Harness::permissive();
        h.ledger.mint(a(1), 1000, 0, tag("0x00")).unwrap();
        let hook = Switch::new(false);
        hook.set_return(false);
        h.ledger.attach_hook("module", hook.clone());

        h.ledger.modify_ranges(10, 20, 0, tag("0x01")).unwrap();
        h.ledger.modify_range(10, 0, tag("0x00")).unwrap();
        assert!(hook.seen.lock().is_empty());
        assert_eq!(h.ledger.ranges_of(&a(1)), vec![(1, 1001)]);
    }
}
