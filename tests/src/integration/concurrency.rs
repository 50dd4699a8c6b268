//! # Shared Service Under Contention
//!
//! Writers on several threads are serialized by the service lock.

#[cfg(test)]
mod tests {
    use crate::fixtures::{account as a, tag, Harness};
    use rl_01_range_ledger::RangeLedgerApi;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_parallel_transfers_conserve_supply() {
        let h = Arc::new(Harness::permissive());
        for n in 1..=4 {
            h.ledger.mint(a(n), 10_000, 0, tag("0x00")).unwrap();
        }

        let workers: Vec<_> = (1..=4u8)
            .map(|n| {
                let h = Arc::clone(&h);
                thread::spawn(move || {
                    let next = n % 4 + 1;
                    for _ in 0..200 {
                        // Insufficient balance is expected once a sender runs dry.
                        let _ = h.ledger.transfer(a(n), a(next), 37);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let held: u64 = (1..=4).map(|n| h.ledger.balance_of(&a(n))).sum();
        assert_eq!(held, 40_000);
        assert_eq!(h.ledger.total_supply(), 40_000);
        h.ledger.check_invariants().unwrap();
    }

    #[test]
    fn test_readers_see_consistent_supply() {
        let h = Arc::new(Harness::permissive());
        let writer = {
            let h = Arc::clone(&h);
            thread::spawn(move || {
                for _ in 0..500 {
                    h.ledger.mint(a(1), 2, 0, tag("0x00")).unwrap();
                }
            })
        };

        for _ in 0..500 {
            let supply = h.ledger.total_supply();
            assert_eq!(supply % 2, 0);
        }
        writer.join().unwrap();
        assert_eq!(h.ledger.ranges_of(&a(1)), vec![(1, 1001)]);
    }
}
