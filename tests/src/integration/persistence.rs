//! # File Snapshots
//!
//! State written through `FileSnapshotStore` resumes with identical ranges
//! and Owner Index order.

#[cfg(test)]
mod tests {
    use crate::fixtures::{account as a, tag, Harness, GENESIS};
    use rl_01_range_ledger::{
        FileSnapshotStore, LedgerConfig, LedgerError, LedgerService, LedgerSnapshot, ManualClock,
        RangeLedgerApi, SnapshotStore,
    };
    use shared_types::PermissiveOracle;
    use std::sync::Arc;

    fn busy_ledger() -> Harness {
        let h = Harness::permissive();
        h.ledger.mint(a(1), 10_000, 0, tag("0x01")).unwrap();
        h.ledger.modify_ranges(2_000, 4_000, GENESIS + 50, tag("0x1234")).unwrap();
        h.ledger.transfer(a(1), a(2), 2_500).unwrap();
        h.ledger.mint(a(3), 500, 0, tag("0x02")).unwrap();
        h
    }

    #[test]
    fn test_file_snapshot_resumes_identically() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("ledger.snap"));
        let h = busy_ledger();
        h.ledger.persist(&store).unwrap();

        let bytes = store.load().unwrap().unwrap();
        let resumed = LedgerService::from_snapshot(
            LedgerSnapshot::decode(&bytes).unwrap(),
            LedgerConfig::default(),
            Arc::new(PermissiveOracle),
            Arc::new(ManualClock::new(GENESIS)),
        )
        .unwrap();

        for n in 1..=3 {
            assert_eq!(resumed.ranges_of(&a(n)), h.ledger.ranges_of(&a(n)));
        }
        assert_eq!(resumed.ranges(), h.ledger.ranges());
        assert_eq!(resumed.total_supply(), 10_500);
    }

    #[test]
    fn test_configured_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = LedgerConfig {
            snapshot_path: Some(dir.path().join("nested/ledger.snap")),
            ..LedgerConfig::default()
        };
        let source = busy_ledger();
        let target = LedgerService::new(
            config,
            Arc::new(PermissiveOracle),
            Arc::new(ManualClock::new(GENESIS)),
        );
        let store = target.configured_store().unwrap();

        source.ledger.persist(&store).unwrap();
        assert!(target.reload(&store).unwrap());
        assert_eq!(target.snapshot(), source.ledger.snapshot());
    }

    #[test]
    fn test_corrupt_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("ledger.snap"));
        store.save(b"RLEDGER\x01garbage").unwrap();

        let h = busy_ledger();
        let before = h.ledger.snapshot();
        assert!(matches!(
            h.ledger.reload(&store),
            Err(LedgerError::CorruptSnapshot { .. })
        ));
        assert_eq!(h.ledger.snapshot(), before);
    }
}
